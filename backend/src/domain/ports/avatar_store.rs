//! Port for avatar file storage.

use async_trait::async_trait;

use crate::domain::{AvatarFolder, AvatarUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by avatar storage adapters.
    pub enum AvatarStoreError {
        /// The backing store could not be written or read.
        Io { message: String } => "avatar storage failed: {message}",
        /// The requested file name is not one the store produces.
        InvalidName { name: String } => "invalid avatar file name: {name}",
    }
}

/// Stored avatar bytes ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAvatar {
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Durable storage for uploaded avatars.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Persist `upload` under `folder`, returning the public URL.
    async fn store(
        &self,
        folder: AvatarFolder,
        upload: &AvatarUpload,
    ) -> Result<String, AvatarStoreError>;

    /// Read a stored file back; `None` when it does not exist.
    async fn fetch(
        &self,
        folder: AvatarFolder,
        file_name: &str,
    ) -> Result<Option<StoredAvatar>, AvatarStoreError>;
}
