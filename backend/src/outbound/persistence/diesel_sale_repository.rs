//! PostgreSQL-backed `SaleRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PersistenceError, SaleRepository};
use crate::domain::{EmployeeId, ProductId, Sale, SaleId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::SaleRow;
use super::pool::DbPool;
use super::schema::sales;

#[derive(Clone)]
pub struct DieselSaleRepository {
    pool: DbPool,
}

impl DieselSaleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        Self {
            id: *sale.id.as_uuid(),
            employee_id: *sale.employee_id.as_uuid(),
            product_id: *sale.product_id.as_uuid(),
            amount: sale.amount,
            quantity: sale.quantity,
            created_at: sale.created_at,
            updated_at: sale.updated_at,
        }
    }
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: SaleId::from(row.id),
            employee_id: EmployeeId::from(row.employee_id),
            product_id: ProductId::from(row.product_id),
            amount: row.amount,
            quantity: row.quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SaleRepository for DieselSaleRepository {
    async fn create(&self, sale: &Sale) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(sales::table)
            .values(&SaleRow::from(sale))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Sale>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = sales::table
            .find(*id.as_uuid())
            .select(SaleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Sale::from))
    }

    async fn list(&self) -> Result<Vec<Sale>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SaleRow> = sales::table
            .order_by(sales::created_at)
            .select(SaleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn list_by_employee(&self, id: &EmployeeId) -> Result<Vec<Sale>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SaleRow> = sales::table
            .filter(sales::employee_id.eq(*id.as_uuid()))
            .order_by(sales::created_at)
            .select(SaleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn list_by_product(&self, id: &ProductId) -> Result<Vec<Sale>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SaleRow> = sales::table
            .filter(sales::product_id.eq(*id.as_uuid()))
            .order_by(sales::created_at)
            .select(SaleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Sale::from).collect())
    }

    async fn update(&self, sale: &Sale) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(sales::table.find(*sale.id.as_uuid()))
            .set(&SaleRow::from(sale))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(PersistenceError::not_found("sale"));
        }
        Ok(())
    }

    async fn delete(&self, id: &SaleId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(sales::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
