//! `access_token` cookie handling for login, registration and logout.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use async_graphql::Context;

use crate::domain::AccessToken;

/// Name of the cookie carrying the signed access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

const SET_COOKIE: &str = "set-cookie";

/// Cookie attributes taken from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSettings {
    pub domain: Option<String>,
    pub secure: bool,
}

impl CookieSettings {
    /// HttpOnly, `Path=/`, `SameSite=Lax` access-token cookie.
    pub fn access_cookie(&self, value: impl Into<String>, max_age_seconds: i64) -> Cookie<'static> {
        let mut builder = Cookie::build(ACCESS_TOKEN_COOKIE, value.into())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(Duration::seconds(max_age_seconds));
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.finish()
    }

    /// Empty cookie with `Max-Age=0`.
    pub fn expired_cookie(&self) -> Cookie<'static> {
        self.access_cookie(String::new(), 0)
    }
}

pub(crate) fn set_access_token(ctx: &Context<'_>, token: &AccessToken) -> async_graphql::Result<()> {
    let settings = ctx.data::<CookieSettings>()?;
    let cookie = settings.access_cookie(token.as_str(), token.max_age_seconds());
    ctx.append_http_header(SET_COOKIE, cookie.to_string());
    Ok(())
}

pub(crate) fn expire_access_token(ctx: &Context<'_>) -> async_graphql::Result<()> {
    let settings = ctx.data::<CookieSettings>()?;
    ctx.append_http_header(SET_COOKIE, settings.expired_cookie().to_string());
    Ok(())
}
