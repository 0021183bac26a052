//! Avatar storage in a capability-restricted local directory.
//!
//! Files live at `<root>/<folder>/<stem>-<fingerprint>.<ext>`, where the
//! fingerprint is the first 16 hex digits of the content's SHA-256. Uploading
//! identical bytes twice therefore reuses one file.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{AvatarStore, AvatarStoreError, StoredAvatar};
use crate::domain::{AvatarFolder, AvatarUpload};

const FINGERPRINT_LEN: usize = 16;
const FOLDERS: [AvatarFolder; 3] = [
    AvatarFolder::Admin,
    AvatarFolder::Customer,
    AvatarFolder::Employee,
];

/// [`AvatarStore`] writing into a sandboxed directory and publishing URLs
/// under a configurable base.
#[derive(Clone)]
pub struct LocalAvatarStore {
    root: Arc<Dir>,
    base_url: String,
}

impl LocalAvatarStore {
    /// Open (creating if needed) the avatar root and its folders.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(root: &Path, base_url: impl Into<String>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        for folder in FOLDERS {
            dir.create_dir_all(folder.as_str())?;
        }
        Ok(Self {
            root: Arc::new(dir),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url_for(&self, folder: AvatarFolder, file_name: &str) -> String {
        format!("{}/{}/{}", self.base_url, folder.as_str(), file_name)
    }
}

fn file_name_for(upload: &AvatarUpload) -> String {
    let digest = hex::encode(Sha256::digest(upload.content()));
    let fingerprint = digest.get(..FINGERPRINT_LEN).unwrap_or(&digest);
    format!("{}-{}.{}", upload.stem(), fingerprint, upload.extension())
}

fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Accept only names this store could have produced.
fn validate_name(name: &str) -> Result<&'static str, AvatarStoreError> {
    let invalid = || AvatarStoreError::invalid_name(name);
    let (stem, extension) = name.rsplit_once('.').ok_or_else(invalid)?;
    let stem_ok = !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !stem_ok {
        return Err(invalid());
    }
    content_type_for(extension).ok_or_else(invalid)
}

fn relative_path(folder: AvatarFolder, file_name: &str) -> PathBuf {
    Path::new(folder.as_str()).join(file_name)
}

fn io_error(error: &io::Error) -> AvatarStoreError {
    AvatarStoreError::io(error.to_string())
}

async fn blocking<T, F>(task: F) -> Result<T, AvatarStoreError>
where
    F: FnOnce() -> Result<T, AvatarStoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| AvatarStoreError::io(err.to_string()))?
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn store(
        &self,
        folder: AvatarFolder,
        upload: &AvatarUpload,
    ) -> Result<String, AvatarStoreError> {
        let file_name = file_name_for(upload);
        let path = relative_path(folder, &file_name);
        let root = Arc::clone(&self.root);
        let content = upload.content().to_vec();
        blocking(move || root.write(&path, content).map_err(|err| io_error(&err))).await?;
        debug!(folder = %folder, file = %file_name, "avatar stored");
        Ok(self.url_for(folder, &file_name))
    }

    async fn fetch(
        &self,
        folder: AvatarFolder,
        file_name: &str,
    ) -> Result<Option<StoredAvatar>, AvatarStoreError> {
        let content_type = validate_name(file_name)?;
        let path = relative_path(folder, file_name);
        let root = Arc::clone(&self.root);
        let content = blocking(move || match root.read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(&err)),
        })
        .await?;
        Ok(content.map(|content| StoredAvatar {
            content,
            content_type,
        }))
    }
}
