//! Multipart avatar uploads.

use std::io::Read;

use async_graphql::{Context, Upload};

use super::error::graphql_error;
use crate::domain::{AvatarUpload, Error, MAX_AVATAR_BYTES};

/// Read an uploaded file into a validated [`AvatarUpload`].
///
/// The spooled temp file is read on the blocking pool; oversized files are
/// rejected before any bytes are copied.
pub(crate) async fn read_avatar(ctx: &Context<'_>, upload: &Upload) -> async_graphql::Result<AvatarUpload> {
    let value = upload
        .value(ctx)
        .map_err(|err| graphql_error(Error::invalid_request(format!("invalid upload: {err}"))))?;
    let size = value
        .size()
        .map_err(|err| graphql_error(Error::invalid_request(format!("invalid upload: {err}"))))?;
    if usize::try_from(size).map_or(true, |size| size > MAX_AVATAR_BYTES) {
        return Err(graphql_error(Error::invalid_request(
            "avatar must be at most 5 MiB",
        )));
    }

    let filename = value.filename.clone();
    let content = tokio::task::spawn_blocking(move || {
        let mut content = Vec::new();
        value.into_read().read_to_end(&mut content).map(|_| content)
    })
    .await
    .map_err(|err| graphql_error(Error::internal(format!("upload reader failed: {err}"))))?
    .map_err(|err| graphql_error(Error::invalid_request(format!("invalid upload: {err}"))))?;

    AvatarUpload::try_new(&filename, content).map_err(graphql_error)
}
