//! Caller identification for GraphQL requests.
//!
//! The access token travels in the `access_token` cookie or an
//! `Authorization: Bearer` header. Tokens that fail verification leave the
//! request anonymous; resolvers then decide whether that is acceptable.

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;
use tracing::debug;

use crate::domain::ports::TokenService;
use crate::inbound::graphql::{ACCESS_TOKEN_COOKIE, RequestUser};

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

/// Raw token from the cookie, falling back to the bearer header.
pub fn access_token(req: &HttpRequest) -> Option<String> {
    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .or_else(|| bearer_token(req))
}

/// Verify the request's token, if any.
pub fn request_user(req: &HttpRequest, tokens: &dyn TokenService) -> RequestUser {
    let Some(token) = access_token(req) else {
        return RequestUser::default();
    };
    match tokens.verify(&token) {
        Ok(user) => RequestUser(Some(user)),
        Err(error) => {
            debug!(%error, "ignoring invalid access token");
            RequestUser::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockTokenService, TokenServiceError};
    use crate::domain::{AuthenticatedUser, Role};
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        }
    }

    #[rstest]
    fn cookie_wins_over_bearer_header() {
        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"))
            .insert_header((AUTHORIZATION, "Bearer from-header"))
            .to_http_request();
        assert_eq!(access_token(&req).as_deref(), Some("from-cookie"));
    }

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer   abc ", Some("abc"))]
    #[case("Basic abc", None)]
    #[case("Bearer ", None)]
    fn bearer_header_is_parsed(#[case] header: &str, #[case] expected: Option<&str>) {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        assert_eq!(access_token(&req).as_deref(), expected);
    }

    #[rstest]
    fn valid_token_identifies_caller(user: AuthenticatedUser) {
        let expected = user.clone();
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .withf(|token| token == "good")
            .return_once(move |_| Ok(user));
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer good"))
            .to_http_request();

        assert_eq!(request_user(&req, &tokens).0, Some(expected));
    }

    #[rstest]
    fn invalid_token_is_anonymous() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .return_once(|_| Err(TokenServiceError::invalid("expired")));
        let req = TestRequest::default()
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, "stale"))
            .to_http_request();

        assert!(request_user(&req, &tokens).0.is_none());
    }

    #[rstest]
    fn missing_token_skips_verification() {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().never();
        assert!(request_user(&TestRequest::default().to_http_request(), &tokens).0.is_none());
    }
}
