//! Argon2id implementation of [`CredentialHasher`].

use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use rand::rngs::OsRng;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{Password, PasswordDigest};

/// Hashes with Argon2id default parameters and a fresh OS-random salt.
///
/// The PHC string stored in `hash` embeds the salt; `salt` keeps a copy so
/// rows carry both columns.
#[derive(Debug, Default, Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn hash_blocking(
        argon2: &Argon2<'_>,
        password: &Password,
    ) -> Result<PasswordDigest, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| CredentialHasherError::hash(err.to_string()))?;
        Ok(PasswordDigest {
            hash: hash.to_string(),
            salt: salt.as_str().to_owned(),
        })
    }

    fn verify_blocking(
        argon2: &Argon2<'_>,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError> {
        let parsed = PasswordHash::new(&digest.hash)
            .map_err(|err| CredentialHasherError::malformed_digest(err.to_string()))?;
        match argon2.verify_password(password.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::malformed_digest(err.to_string())),
        }
    }
}

/// Run a key-derivation step on the blocking pool.
async fn off_executor<T, F>(work: F) -> Result<T, CredentialHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| CredentialHasherError::worker(err.to_string()))?
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordDigest, CredentialHasherError> {
        let argon2 = self.argon2.clone();
        let password = password.clone();
        off_executor(move || Self::hash_blocking(&argon2, &password)).await
    }

    async fn verify(
        &self,
        password: &Password,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError> {
        let argon2 = self.argon2.clone();
        let password = password.clone();
        let digest = digest.clone();
        off_executor(move || Self::verify_blocking(&argon2, &password, &digest)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::new()
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("valid password")
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_against_the_original_password(hasher: Argon2CredentialHasher) {
        let digest = hasher.hash(&password("correct horse")).await.expect("hashed");

        assert!(digest.hash.starts_with("$argon2id$"));
        assert!(digest.hash.contains(&digest.salt));
        assert!(
            hasher
                .verify(&password("correct horse"), &digest)
                .await
                .expect("verified")
        );
        assert!(
            !hasher
                .verify(&password("wrong horse"), &digest)
                .await
                .expect("verified")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn each_hash_gets_its_own_salt(hasher: Argon2CredentialHasher) {
        let first = hasher.hash(&password("same password")).await.expect("hashed");
        let second = hasher.hash(&password("same password")).await.expect("hashed");
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.hash, second.hash);
    }

    #[rstest]
    #[case("")]
    #[case("plain-text")]
    #[tokio::test]
    async fn malformed_digests_are_errors(hasher: Argon2CredentialHasher, #[case] stored: &str) {
        let digest = PasswordDigest {
            hash: stored.into(),
            salt: String::new(),
        };
        let err = hasher
            .verify(&password("whatever1"), &digest)
            .await
            .expect_err("malformed digest");
        assert!(matches!(err, CredentialHasherError::MalformedDigest { .. }));
    }

    #[test]
    fn hashing_completes_on_a_single_threaded_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let hasher = Argon2CredentialHasher::new();
        let verified = runtime.block_on(async {
            let digest = hasher.hash(&password("single thread")).await?;
            hasher.verify(&password("single thread"), &digest).await
        });
        assert!(verified.expect("verified"));
    }
}
