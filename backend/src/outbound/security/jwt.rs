//! HS256 JSON Web Tokens for the `access_token` cookie.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{AccessToken, AuthenticatedUser, Role};

/// Claims carried by every token. `username` holds the login email.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl JwtTokenService {
    /// Build a service from the signing secret and the token lifetime.
    pub fn new(secret: &[u8], ttl_minutes: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_seconds: i64::from(ttl_minutes) * 60,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &AuthenticatedUser) -> Result<AccessToken, TokenServiceError> {
        let issued_at = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.email.clone(),
            role: user.role,
            iat: issued_at,
            exp: issued_at + self.ttl_seconds,
        };
        let encoded = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenServiceError::issue(err.to_string()))?;
        Ok(AccessToken::new(encoded, self.ttl_seconds))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenServiceError::invalid(err.to_string()))?;
        Ok(AuthenticatedUser {
            id: data.claims.sub,
            email: data.claims.username,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"a-test-secret-that-is-long-enough";

    #[fixture]
    fn service() -> JwtTokenService {
        JwtTokenService::new(SECRET, 60)
    }

    #[fixture]
    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            role: Role::Manager,
        }
    }

    #[rstest]
    fn issued_tokens_verify(service: JwtTokenService, user: AuthenticatedUser) {
        let token = service.issue(&user).expect("issued");
        assert_eq!(token.max_age_seconds(), 3600);
        assert_eq!(service.verify(token.as_str()).expect("verified"), user);
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_rejected(
        service: JwtTokenService,
        user: AuthenticatedUser,
    ) {
        let token = JwtTokenService::new(b"some-other-secret", 60)
            .issue(&user)
            .expect("issued");
        let err = service
            .verify(token.as_str())
            .expect_err("wrong secret");
        assert!(matches!(err, TokenServiceError::Invalid { .. }));
    }

    #[rstest]
    fn expired_tokens_are_rejected(service: JwtTokenService, user: AuthenticatedUser) {
        let past = Utc::now().timestamp() - 7200;
        let claims = Claims {
            sub: user.id,
            username: user.email,
            role: user.role,
            iat: past,
            exp: past + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encoded");

        assert!(service.verify(&token).is_err());
    }

    #[rstest]
    #[case("")]
    #[case("not.a.token")]
    fn garbage_is_rejected(service: JwtTokenService, #[case] token: &str) {
        assert!(service.verify(token).is_err());
    }
}
