//! Tests for the admin account service.

use std::sync::Arc;

use chrono::Utc;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    AvatarStoreError, MockAdminRepository, MockAvatarStore, MockCredentialHasher,
    MockTokenService, PersistenceError,
};
use crate::domain::{
    AccessToken, ErrorCode, PasswordDigest, Profile, ProfileUpdateInput, Registration,
    RegistrationInput, Role,
};

struct Mocks {
    admins: MockAdminRepository,
    hasher: MockCredentialHasher,
    tokens: MockTokenService,
    avatars: MockAvatarStore,
}

impl Mocks {
    fn into_service(self) -> AdminService {
        AdminService::new(
            Arc::new(self.admins),
            Arc::new(self.hasher),
            Arc::new(self.tokens),
            Arc::new(self.avatars),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        admins: MockAdminRepository::new(),
        hasher: MockCredentialHasher::new(),
        tokens: MockTokenService::new(),
        avatars: MockAvatarStore::new(),
    }
}

#[fixture]
fn stored_admin() -> Admin {
    let now = Utc::now();
    Admin {
        id: AdminId::random(),
        profile: Profile {
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            user_name: "Ada".into(),
            phone: None,
        },
        password: PasswordDigest {
            hash: "$argon2id$stored".into(),
            salt: "salt".into(),
        },
        avatar: DEFAULT_AVATAR_URL.into(),
        role: Role::Admin,
        created_at: now,
        updated_at: now,
    }
}

fn new_admin() -> NewAdmin {
    let registration = Registration::try_from_input(&RegistrationInput {
        email: "Ada@Example.com".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        password: "analytical-engine".into(),
        ..RegistrationInput::default()
    })
    .expect("valid registration");
    NewAdmin::try_new(registration, None).expect("valid role")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("ada@example.com", password).expect("valid credentials")
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_strips_secrets(mut mocks: Mocks) {
    mocks
        .admins
        .expect_find_by_email()
        .withf(|email| email == "ada@example.com")
        .times(1)
        .return_once(|_| Ok(None));
    mocks.hasher.expect_hash().times(1).return_once(|_| {
        Ok(PasswordDigest {
            hash: "hashed".into(),
            salt: "salt".into(),
        })
    });
    mocks
        .admins
        .expect_create()
        .withf(|admin| admin.password.hash == "hashed" && admin.role == Role::Admin)
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .tokens
        .expect_issue()
        .withf(|user| user.email == "ada@example.com" && user.role == Role::Admin)
        .times(1)
        .return_once(|_| Ok(AccessToken::new("jwt", 60)));

    let signed = mocks
        .into_service()
        .register(new_admin())
        .await
        .expect("registration succeeds");

    assert!(signed.account.password.is_stripped());
    assert_eq!(signed.account.avatar, DEFAULT_AVATAR_URL);
    assert_eq!(signed.token.as_str(), "jwt");
}

#[rstest]
#[tokio::test]
async fn register_rejects_duplicate_email(mut mocks: Mocks, stored_admin: Admin) {
    mocks
        .admins
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks.admins.expect_create().never();

    let err = mocks
        .into_service()
        .register(new_admin())
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Email already exists");
}

#[rstest]
#[tokio::test]
async fn login_reports_unknown_email(mut mocks: Mocks) {
    mocks
        .admins
        .expect_find_by_email()
        .return_once(|_| Ok(None));

    let err = mocks
        .into_service()
        .login(&credentials("whatever"))
        .await
        .expect_err("unknown email");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "No record found for this email");
}

#[rstest]
#[tokio::test]
async fn login_reports_wrong_password(mut mocks: Mocks, stored_admin: Admin) {
    mocks
        .admins
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks.hasher.expect_verify().return_once(|_, _| Ok(false));
    mocks.tokens.expect_issue().never();

    let err = mocks
        .into_service()
        .login(&credentials("wrong-password"))
        .await
        .expect_err("wrong password");
    assert_eq!(err.message(), "Invalid password");
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_valid_password(mut mocks: Mocks, stored_admin: Admin) {
    let id = *stored_admin.id.as_uuid();
    mocks
        .admins
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks.hasher.expect_verify().return_once(|_, _| Ok(true));
    mocks
        .tokens
        .expect_issue()
        .withf(move |user| user.id == id)
        .return_once(|_| Ok(AccessToken::new("jwt", 60)));

    let signed = mocks
        .into_service()
        .login(&credentials("analytical-engine"))
        .await
        .expect("login succeeds");
    assert!(signed.account.password.is_stripped());
}

#[rstest]
#[tokio::test]
async fn profile_of_missing_admin_is_not_found(mut mocks: Mocks) {
    mocks.admins.expect_find_by_id().return_once(|_| Ok(None));

    let err = mocks
        .into_service()
        .profile(&AdminId::random())
        .await
        .expect_err("missing admin");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "User not found");
}

#[rstest]
#[tokio::test]
async fn update_rejects_email_held_by_someone_else(mut mocks: Mocks, stored_admin: Admin) {
    let mut other = stored_admin.clone();
    other.id = AdminId::random();
    let id = stored_admin.id;
    mocks
        .admins
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks
        .admins
        .expect_find_by_email()
        .return_once(move |_| Ok(Some(other)));
    mocks.admins.expect_update().never();

    let update = ProfileUpdate::try_from_input(&ProfileUpdateInput {
        email: Some("taken@example.com".into()),
        ..ProfileUpdateInput::default()
    })
    .expect("valid update");
    let err = mocks
        .into_service()
        .update(&id, &update)
        .await
        .expect_err("email taken");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn delete_avatar_restores_default(mut mocks: Mocks, mut stored_admin: Admin) {
    stored_admin.avatar = "/avatars/admin/me-abc.png".into();
    let id = stored_admin.id;
    mocks
        .admins
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks
        .admins
        .expect_update()
        .withf(|admin| admin.avatar == DEFAULT_AVATAR_URL)
        .times(1)
        .return_once(|_| Ok(()));

    let removed = mocks
        .into_service()
        .delete_avatar(&id)
        .await
        .expect("avatar reset");
    assert!(removed);
}

fn png() -> AvatarUpload {
    AvatarUpload::try_new("me.png", b"\x89PNG".to_vec()).expect("valid upload")
}

#[rstest]
#[tokio::test]
async fn update_avatar_saves_stored_url(mut mocks: Mocks, stored_admin: Admin) {
    let id = stored_admin.id;
    mocks
        .admins
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks
        .avatars
        .expect_store()
        .withf(|folder, upload| *folder == AvatarFolder::Admin && upload.extension() == "png")
        .times(1)
        .return_once(|_, _| Ok("/avatars/admin/me-1234.png".to_owned()));
    mocks
        .admins
        .expect_update()
        .withf(|admin| admin.avatar == "/avatars/admin/me-1234.png")
        .times(1)
        .return_once(|_| Ok(()));

    let stored = mocks
        .into_service()
        .update_avatar(&id, &png())
        .await
        .expect("avatar stored");
    assert!(stored);
}

#[rstest]
#[tokio::test]
async fn avatar_storage_failure_leaves_record_untouched(mut mocks: Mocks, stored_admin: Admin) {
    let id = stored_admin.id;
    mocks
        .admins
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_admin)));
    mocks
        .avatars
        .expect_store()
        .return_once(|_, _| Err(AvatarStoreError::io("disk full")));
    mocks.admins.expect_update().never();

    let err = mocks
        .into_service()
        .update_avatar(&id, &png())
        .await
        .expect_err("storage down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn connection_failures_map_to_service_unavailable(mut mocks: Mocks) {
    mocks
        .admins
        .expect_list()
        .return_once(|| Err(PersistenceError::connection("pool exhausted")));

    let err = mocks.into_service().list().await.expect_err("db down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn delete_missing_admin_is_not_found(mut mocks: Mocks) {
    mocks.admins.expect_delete().return_once(|_| Ok(false));

    let err = mocks
        .into_service()
        .delete(&AdminId::random())
        .await
        .expect_err("missing admin");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
