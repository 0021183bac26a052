//! Avatar uploads.

use std::fmt;

use super::Error;

/// Largest accepted avatar, in bytes.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Storage folder an avatar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarFolder {
    Admin,
    Customer,
    Employee,
}

impl AvatarFolder {
    /// Directory name under the avatar root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Employee => "employee",
        }
    }

    /// Inverse of [`AvatarFolder::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Self::Admin),
            "customer" => Some(Self::Customer),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for AvatarFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated image upload.
///
/// ## Invariants
/// - the file extension is one of png, jpg, jpeg, gif or webp;
/// - the content is non-empty and at most [`MAX_AVATAR_BYTES`].
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    stem: String,
    extension: String,
    content: Vec<u8>,
}

impl AvatarUpload {
    /// Validate an uploaded file by name and size.
    pub fn try_new(filename: &str, content: Vec<u8>) -> Result<Self, Error> {
        let (raw_stem, raw_extension) = filename
            .rsplit_once('.')
            .ok_or_else(|| Error::invalid_request("avatar file must have an image extension"))?;
        let extension = raw_extension.to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::invalid_request(format!(
                "avatar must be one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if content.is_empty() {
            return Err(Error::invalid_request("avatar file is empty"));
        }
        if content.len() > MAX_AVATAR_BYTES {
            return Err(Error::invalid_request("avatar file exceeds 5 MiB"));
        }
        Ok(Self {
            stem: sanitise_stem(raw_stem),
            extension,
            content,
        })
    }

    /// File name stem restricted to `[a-z0-9_-]`; never empty.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Lower-cased extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Raw file bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl fmt::Debug for AvatarUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarUpload")
            .field("stem", &self.stem)
            .field("extension", &self.extension)
            .field("len", &self.content.len())
            .finish()
    }
}

fn sanitise_stem(raw: &str) -> String {
    // Strip any client-side directory components first.
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(64)
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "avatar".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("portrait.PNG", "portrait", "png")]
    #[case("../../etc/passwd.jpg", "passwd", "jpg")]
    #[case("My Photo.webp", "my_photo", "webp")]
    #[case("....gif", "avatar", "gif")]
    fn names_are_sanitised(#[case] filename: &str, #[case] stem: &str, #[case] extension: &str) {
        let upload = AvatarUpload::try_new(filename, vec![1, 2, 3]).expect("valid upload");
        assert_eq!(upload.stem(), stem);
        assert_eq!(upload.extension(), extension);
    }

    #[rstest]
    #[case("notes.txt", vec![1])]
    #[case("noextension", vec![1])]
    #[case("empty.png", Vec::new())]
    #[case("huge.png", vec![0; MAX_AVATAR_BYTES + 1])]
    fn invalid_uploads_are_rejected(#[case] filename: &str, #[case] content: Vec<u8>) {
        assert!(AvatarUpload::try_new(filename, content).is_err());
    }

    #[rstest]
    fn folders_round_trip_by_name() {
        for folder in [AvatarFolder::Admin, AvatarFolder::Customer, AvatarFolder::Employee] {
            assert_eq!(AvatarFolder::from_name(folder.as_str()), Some(folder));
        }
        assert_eq!(AvatarFolder::from_name("sale"), None);
    }
}
