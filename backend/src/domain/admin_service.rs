//! Back-office account service.
//!
//! Registration, login, profile management, avatars and deletion for
//! admins and managers. Every returned [`Admin`] has its secrets stripped.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{AdminRepository, AvatarStore, CredentialHasher, TokenService};
use crate::domain::service_support::{
    check_password, issue_token, map_avatar_error, map_hasher_error, map_persistence_error,
    signed_in,
};
use crate::domain::{
    Admin, AdminId, AvatarFolder, AvatarUpload, DEFAULT_AVATAR_URL, Error, LoginCredentials,
    NewAdmin, ProfileUpdate, SignedIn,
};

const USER_NOT_FOUND: &str = "User not found";

/// Admin account service.
#[derive(Clone)]
pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenService>,
    avatars: Arc<dyn AvatarStore>,
}

impl AdminService {
    /// Create a service over the given ports.
    pub fn new(
        admins: Arc<dyn AdminRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
        avatars: Arc<dyn AvatarStore>,
    ) -> Self {
        Self {
            admins,
            hasher,
            tokens,
            avatars,
        }
    }

    async fn require(&self, id: &AdminId) -> Result<Admin, Error> {
        self.admins
            .find_by_id(id)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn save(&self, admin: &Admin) -> Result<(), Error> {
        self.admins
            .update(admin)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))
    }

    async fn ensure_email_free(&self, email: &str, owner: &AdminId) -> Result<(), Error> {
        let holder = self
            .admins
            .find_by_email(email)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        match holder {
            Some(other) if &other.id != owner => Err(Error::conflict("Email already exists")),
            _ => Ok(()),
        }
    }

    /// Register a new admin and sign them in.
    pub async fn register(&self, new_admin: NewAdmin) -> Result<SignedIn<Admin>, Error> {
        let NewAdmin { registration, role } = new_admin;
        let (profile, password) = registration.into_parts();

        let existing = self
            .admins
            .find_by_email(&profile.email)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        if existing.is_some() {
            return Err(Error::conflict("Email already exists"));
        }

        let digest = self
            .hasher
            .hash(&password)
            .await
            .map_err(map_hasher_error)?;
        let now = Utc::now();
        let admin = Admin {
            id: AdminId::random(),
            profile,
            password: digest,
            avatar: DEFAULT_AVATAR_URL.to_owned(),
            role,
            created_at: now,
            updated_at: now,
        };
        self.admins
            .create(&admin)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        info!(admin_id = %admin.id, role = %admin.role, "admin registered");

        let token = issue_token(
            self.tokens.as_ref(),
            *admin.id.as_uuid(),
            &admin.profile.email,
            admin.role,
        )?;
        Ok(signed_in(admin.without_secrets(), token))
    }

    /// Verify credentials and sign the admin in.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn<Admin>, Error> {
        let admin = self
            .admins
            .find_by_email(credentials.email().as_ref())
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        check_password(
            self.hasher.as_ref(),
            credentials,
            admin.as_ref().map(|a| &a.password),
        )
        .await?;
        let admin = admin.ok_or_else(|| Error::invalid_request("No record found for this email"))?;
        let token = issue_token(
            self.tokens.as_ref(),
            *admin.id.as_uuid(),
            &admin.profile.email,
            admin.role,
        )?;
        Ok(signed_in(admin.without_secrets(), token))
    }

    /// Every admin.
    pub async fn list(&self) -> Result<Vec<Admin>, Error> {
        let admins = self
            .admins
            .list()
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        Ok(admins.into_iter().map(Admin::without_secrets).collect())
    }

    /// A single admin.
    pub async fn profile(&self, id: &AdminId) -> Result<Admin, Error> {
        self.require(id).await.map(Admin::without_secrets)
    }

    /// Apply a partial profile update.
    pub async fn update(&self, id: &AdminId, update: &ProfileUpdate) -> Result<Admin, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("update must change at least one field"));
        }
        let mut admin = self.require(id).await?;
        if let Some(email) = update.email() {
            self.ensure_email_free(email, &admin.id).await?;
        }
        update.apply(&mut admin.profile);
        admin.updated_at = Utc::now();
        self.save(&admin).await?;
        Ok(admin.without_secrets())
    }

    /// Store a new avatar and point the admin at it.
    pub async fn update_avatar(&self, id: &AdminId, upload: &AvatarUpload) -> Result<bool, Error> {
        let mut admin = self.require(id).await?;
        let url = self
            .avatars
            .store(AvatarFolder::Admin, upload)
            .await
            .map_err(map_avatar_error)?;
        admin.avatar = url;
        admin.updated_at = Utc::now();
        self.save(&admin).await?;
        Ok(true)
    }

    /// Reset the avatar to the default image.
    pub async fn delete_avatar(&self, id: &AdminId) -> Result<bool, Error> {
        let mut admin = self.require(id).await?;
        DEFAULT_AVATAR_URL.clone_into(&mut admin.avatar);
        admin.updated_at = Utc::now();
        self.save(&admin).await?;
        Ok(true)
    }

    /// Delete the admin account.
    pub async fn delete(&self, id: &AdminId) -> Result<bool, Error> {
        let deleted = self
            .admins
            .delete(id)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(admin_id = %id, "admin deleted");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
