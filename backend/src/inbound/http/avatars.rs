//! Serves stored avatars at `/avatars/{folder}/{file}`.

use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, get, web};

use super::ApiResult;
use super::state::HttpState;
use crate::domain::ports::AvatarStoreError;
use crate::domain::{AvatarFolder, Error};

const AVATAR_NOT_FOUND: &str = "Avatar not found";

#[get("/avatars/{folder}/{file}")]
pub async fn avatar(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (folder, file) = path.into_inner();
    let folder = AvatarFolder::from_name(&folder).ok_or_else(|| Error::not_found(AVATAR_NOT_FOUND))?;
    match state.avatars.fetch(folder, &file).await {
        Ok(Some(stored)) => Ok(HttpResponse::Ok()
            .content_type(stored.content_type)
            .insert_header((CACHE_CONTROL, "public, max-age=86400, immutable"))
            .body(stored.content)),
        Ok(None) | Err(AvatarStoreError::InvalidName { .. }) => Err(Error::not_found(AVATAR_NOT_FOUND)),
        Err(error) => Err(Error::internal(error.to_string())),
    }
}
