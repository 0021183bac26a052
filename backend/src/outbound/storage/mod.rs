//! File storage adapters.

mod local_avatar_store;

pub use local_avatar_store::LocalAvatarStore;
