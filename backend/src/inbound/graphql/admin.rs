//! Admin account resolvers.

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject, Upload};
use chrono::{DateTime, Utc};

use super::context::services;
use super::cookies::{expire_access_token, set_access_token};
use super::error::IntoGraphql;
use super::guard::PolicyGuard;
use super::types::{LoginInput, RoleKind, id};
use super::uploads::read_avatar;
use crate::domain::{
    Admin, AdminId, LoginCredentials, NewAdmin, PolicyHandler, ProfileUpdate, ProfileUpdateInput,
    Reach, Registration, RegistrationInput,
};

/// Back-office account without credential fields.
#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Admin")]
pub struct AdminObject {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub avatar: String,
    pub role: RoleKind,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Admin> for AdminObject {
    fn from(admin: Admin) -> Self {
        Self {
            id: id(admin.id),
            email: admin.profile.email,
            first_name: admin.profile.first_name,
            last_name: admin.profile.last_name,
            user_name: admin.profile.user_name,
            avatar: admin.avatar,
            role: admin.role.into(),
            phone: admin.profile.phone,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

#[derive(InputObject, Debug, Clone)]
pub struct CreateAdminInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: Option<String>,
    pub password: String,
    pub phone: Option<String>,
    /// Defaults to `ADMIN`.
    pub role: Option<RoleKind>,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct UpdateAdminInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub phone: Option<String>,
}

impl From<UpdateAdminInput> for ProfileUpdateInput {
    fn from(input: UpdateAdminInput) -> Self {
        Self {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            user_name: input.user_name,
            phone: input.phone,
        }
    }
}

#[derive(Default)]
pub struct AdminQuery;

#[Object]
impl AdminQuery {
    async fn get_admins(&self, ctx: &Context<'_>) -> Result<Vec<AdminObject>> {
        PolicyGuard::new(PolicyHandler::ReadAdmin).check(ctx, Reach::Every)?;
        let admins = services(ctx)?.admins.list().await.into_graphql()?;
        Ok(admins.into_iter().map(AdminObject::from).collect())
    }

    /// The signed-in admin.
    async fn get_admin_profile(&self, ctx: &Context<'_>) -> Result<AdminObject> {
        let user = PolicyGuard::new(PolicyHandler::ReadAdmin).check_own(ctx)?;
        let admin = services(ctx)?
            .admins
            .profile(&AdminId::from(user.id))
            .await
            .into_graphql()?;
        Ok(admin.into())
    }

    async fn get_admin_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<AdminObject> {
        let (_, id) = PolicyGuard::new(PolicyHandler::ReadAdmin).check_record(ctx, &id, AdminId::parse)?;
        let admin = services(ctx)?.admins.profile(&id).await.into_graphql()?;
        Ok(admin.into())
    }

    /// Expire the `access_token` cookie.
    async fn logout_admin(&self, ctx: &Context<'_>) -> Result<bool> {
        expire_access_token(ctx)?;
        Ok(true)
    }
}

#[derive(Default)]
pub struct AdminMutation;

#[Object]
impl AdminMutation {
    /// Register an admin and sign them in.
    async fn create_admin(&self, ctx: &Context<'_>, input: CreateAdminInput) -> Result<AdminObject> {
        let registration = Registration::try_from_input(&RegistrationInput {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            user_name: input.user_name,
            password: input.password,
            phone: input.phone,
        })
        .into_graphql()?;
        let new_admin = NewAdmin::try_new(registration, input.role.map(Into::into)).into_graphql()?;
        let signed_in = services(ctx)?.admins.register(new_admin).await.into_graphql()?;
        set_access_token(ctx, &signed_in.token)?;
        Ok(signed_in.account.into())
    }

    async fn login_admin(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AdminObject> {
        let credentials = LoginCredentials::try_from_parts(&input.email, &input.password).into_graphql()?;
        let signed_in = services(ctx)?.admins.login(&credentials).await.into_graphql()?;
        set_access_token(ctx, &signed_in.token)?;
        Ok(signed_in.account.into())
    }

    /// Replace an admin's avatar.
    async fn update_admin_avatar(&self, ctx: &Context<'_>, id: ID, avatar: Upload) -> Result<bool> {
        let (_, id) = PolicyGuard::new(PolicyHandler::UpdateAdmin).check_record(ctx, &id, AdminId::parse)?;
        let upload = read_avatar(ctx, &avatar).await?;
        services(ctx)?.admins.update_avatar(&id, &upload).await.into_graphql()
    }

    /// Reset an admin's avatar to the default image.
    async fn delete_admin_avatar(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (_, id) = PolicyGuard::new(PolicyHandler::UpdateAdmin).check_record(ctx, &id, AdminId::parse)?;
        services(ctx)?.admins.delete_avatar(&id).await.into_graphql()
    }

    async fn update_admin(&self, ctx: &Context<'_>, id: ID, input: UpdateAdminInput) -> Result<AdminObject> {
        let (_, id) = PolicyGuard::new(PolicyHandler::UpdateAdmin).check_record(ctx, &id, AdminId::parse)?;
        let update = ProfileUpdate::try_from_input(&input.into()).into_graphql()?;
        let admin = services(ctx)?.admins.update(&id, &update).await.into_graphql()?;
        Ok(admin.into())
    }

    /// Delete an admin; deleting yourself also signs you out.
    async fn delete_admin(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (user, id) = PolicyGuard::new(PolicyHandler::DeleteAdmin).check_record(ctx, &id, AdminId::parse)?;
        let deleted = services(ctx)?.admins.delete(&id).await.into_graphql()?;
        if user.owns(id.as_uuid()) {
            expire_access_token(ctx)?;
        }
        Ok(deleted)
    }
}
