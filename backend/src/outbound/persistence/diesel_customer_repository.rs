//! PostgreSQL-backed `CustomerRepository`. Carts live in their own table
//! and are stitched onto customers after loading.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CustomerRepository, PersistenceError};
use crate::domain::{
    CartId, CartItem, Customer, CustomerId, PasswordDigest, ProductId, Profile,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CartRow, CustomerRow};
use super::pool::DbPool;
use super::schema::{carts, customers};

#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn customer_to_row(customer: &Customer) -> CustomerRow {
    CustomerRow {
        id: *customer.id.as_uuid(),
        email: customer.profile.email.clone(),
        first_name: customer.profile.first_name.clone(),
        last_name: customer.profile.last_name.clone(),
        user_name: customer.profile.user_name.clone(),
        password: customer.password.hash.clone(),
        salt: customer.password.salt.clone(),
        avatar: customer.avatar.clone(),
        phone: customer.profile.phone.clone(),
        address: customer.address.clone(),
        created_at: customer.created_at,
        updated_at: customer.updated_at,
    }
}

fn cart_to_row(item: &CartItem) -> CartRow {
    CartRow {
        id: *item.id.as_uuid(),
        customer_id: *item.customer_id.as_uuid(),
        product_id: *item.product_id.as_uuid(),
        quantity: item.quantity,
        created_at: item.created_at,
        updated_at: item.updated_at,
    }
}

fn row_to_cart(row: CartRow) -> CartItem {
    CartItem {
        id: CartId::from(row.id),
        customer_id: CustomerId::from(row.customer_id),
        product_id: ProductId::from(row.product_id),
        quantity: row.quantity,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_customer(row: CustomerRow, carts: Vec<CartItem>) -> Customer {
    Customer {
        id: CustomerId::from(row.id),
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
        address: row.address,
        carts,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Attach cart lines to their customers, preserving customer order.
fn assemble(rows: Vec<CustomerRow>, cart_rows: Vec<CartRow>) -> Vec<Customer> {
    let mut by_customer: HashMap<Uuid, Vec<CartItem>> = HashMap::new();
    for cart in cart_rows {
        by_customer
            .entry(cart.customer_id)
            .or_default()
            .push(row_to_cart(cart));
    }
    rows.into_iter()
        .map(|row| {
            let carts = by_customer.remove(&row.id).unwrap_or_default();
            row_to_customer(row, carts)
        })
        .collect()
}

async fn load_with_carts(
    conn: &mut AsyncPgConnection,
    rows: Vec<CustomerRow>,
) -> Result<Vec<Customer>, diesel::result::Error> {
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let cart_rows: Vec<CartRow> = carts::table
        .filter(carts::customer_id.eq_any(ids))
        .order_by(carts::created_at)
        .select(CartRow::as_select())
        .load(conn)
        .await?;
    Ok(assemble(rows, cart_rows))
}

async fn attach_carts(
    conn: &mut AsyncPgConnection,
    row: Option<CustomerRow>,
) -> Result<Option<Customer>, PersistenceError> {
    let Some(row) = row else {
        return Ok(None);
    };
    let customers = load_with_carts(conn, vec![row])
        .await
        .map_err(map_diesel_error)?;
    Ok(customers.into_iter().next())
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(customers::table)
            .values(&customer_to_row(customer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = customers::table
            .find(*id.as_uuid())
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        attach_carts(&mut conn, row).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = customers::table
            .filter(customers::email.eq(email))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        attach_carts(&mut conn, row).await
    }

    async fn list(&self) -> Result<Vec<Customer>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CustomerRow> = customers::table
            .order_by(customers::created_at)
            .select(CustomerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_with_carts(&mut conn, rows)
            .await
            .map_err(map_diesel_error)
    }

    async fn update(&self, customer: &Customer) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(customers::table.find(*customer.id.as_uuid()))
            .set(&customer_to_row(customer))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PersistenceError::not_found("customer"));
        }
        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = *id.as_uuid();
        let deleted = conn
            .transaction(|conn| {
                async move {
                    diesel::delete(carts::table.filter(carts::customer_id.eq(target)))
                        .execute(conn)
                        .await?;
                    diesel::delete(customers::table.find(target))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn add_cart_item(&self, item: &CartItem) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(carts::table)
            .values(&cart_to_row(item))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update_cart_item(&self, item: &CartItem) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(carts::table.find(*item.id.as_uuid()))
            .set(&cart_to_row(item))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PersistenceError::not_found("cart"));
        }
        Ok(())
    }
}
