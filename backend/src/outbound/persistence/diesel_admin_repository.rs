//! PostgreSQL-backed `AdminRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{AdminRepository, PersistenceError};
use crate::domain::{Admin, AdminId, PasswordDigest, Profile, Role};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::AdminRow;
use super::pool::DbPool;
use super::schema::admins;

#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn admin_to_row(admin: &Admin) -> AdminRow {
    AdminRow {
        id: *admin.id.as_uuid(),
        email: admin.profile.email.clone(),
        first_name: admin.profile.first_name.clone(),
        last_name: admin.profile.last_name.clone(),
        user_name: admin.profile.user_name.clone(),
        password: admin.password.hash.clone(),
        salt: admin.password.salt.clone(),
        avatar: admin.avatar.clone(),
        role: admin.role.as_str().to_owned(),
        phone: admin.profile.phone.clone(),
        created_at: admin.created_at,
        updated_at: admin.updated_at,
    }
}

fn row_to_admin(row: AdminRow) -> Result<Admin, PersistenceError> {
    let role: Role = row.role.parse().map_err(|_| {
        warn!(admin_id = %row.id, role = %row.role, "admin row carries an unknown role");
        PersistenceError::query(format!("unknown admin role: {}", row.role))
    })?;
    Ok(Admin {
        id: AdminId::from(row.id),
        profile: Profile {
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            user_name: row.user_name,
            phone: row.phone,
        },
        password: PasswordDigest {
            hash: row.password,
            salt: row.salt,
        },
        avatar: row.avatar,
        role,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn create(&self, admin: &Admin) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(admins::table)
            .values(&admin_to_row(admin))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &AdminId) -> Result<Option<Admin>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admins::table
            .find(*id.as_uuid())
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_admin).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admins::table
            .filter(admins::email.eq(email))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_admin).transpose()
    }

    async fn list(&self) -> Result<Vec<Admin>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AdminRow> = admins::table
            .order_by(admins::created_at)
            .select(AdminRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_admin).collect()
    }

    async fn update(&self, admin: &Admin) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(admins::table.find(*admin.id.as_uuid()))
            .set(&admin_to_row(admin))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PersistenceError::not_found("admin"));
        }
        Ok(())
    }

    async fn delete(&self, id: &AdminId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target: Uuid = *id.as_uuid();
        let deleted = diesel::delete(admins::table.find(target))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
