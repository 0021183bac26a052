//! Sales ledger resolvers.
//!
//! Identifiers are forwarded raw so the sale service can report its own
//! "required" messages for blank ids.

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use super::context::services;
use super::error::IntoGraphql;
use super::guard::PolicyGuard;
use super::types::id;
use crate::domain::{NewSale, PolicyHandler, Reach, Sale, SaleInput, SaleUpdate};

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Sale")]
pub struct SaleObject {
    pub id: ID,
    pub employee_id: ID,
    pub product_id: ID,
    pub amount: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Sale> for SaleObject {
    fn from(sale: Sale) -> Self {
        Self {
            id: id(sale.id),
            employee_id: id(sale.employee_id),
            product_id: id(sale.product_id),
            amount: sale.amount,
            quantity: sale.quantity,
            created_at: sale.created_at,
            updated_at: sale.updated_at,
        }
    }
}

/// Sale payload; every field is optional on update.
#[derive(InputObject, Debug, Clone, Default)]
#[graphql(name = "SaleInput")]
pub struct SaleFields {
    pub employee_id: Option<ID>,
    pub product_id: Option<ID>,
    pub amount: Option<f64>,
    pub quantity: Option<i32>,
}

impl From<SaleFields> for SaleInput {
    fn from(fields: SaleFields) -> Self {
        Self {
            employee_id: fields.employee_id.map(|id| id.0),
            product_id: fields.product_id.map(|id| id.0),
            amount: fields.amount,
            quantity: fields.quantity,
        }
    }
}

fn sales(list: Vec<Sale>) -> Vec<SaleObject> {
    list.into_iter().map(SaleObject::from).collect()
}

#[derive(Default)]
pub struct SaleQuery;

#[Object]
impl SaleQuery {
    async fn get_sales(&self, ctx: &Context<'_>) -> Result<Vec<SaleObject>> {
        PolicyGuard::new(PolicyHandler::ReadSale).check(ctx, Reach::Every)?;
        Ok(sales(services(ctx)?.sales.list().await.into_graphql()?))
    }

    async fn get_sale(&self, ctx: &Context<'_>, id: ID) -> Result<SaleObject> {
        PolicyGuard::new(PolicyHandler::ReadSale).check(ctx, Reach::Some)?;
        let sale = services(ctx)?.sales.get(&id).await.into_graphql()?;
        Ok(sale.into())
    }

    async fn get_sales_by_employee(&self, ctx: &Context<'_>, employee_id: ID) -> Result<Vec<SaleObject>> {
        PolicyGuard::new(PolicyHandler::ReadSale).check(ctx, Reach::Every)?;
        Ok(sales(
            services(ctx)?
                .sales
                .list_by_employee(&employee_id)
                .await
                .into_graphql()?,
        ))
    }

    async fn get_sales_by_product(&self, ctx: &Context<'_>, product_id: ID) -> Result<Vec<SaleObject>> {
        PolicyGuard::new(PolicyHandler::ReadSale).check(ctx, Reach::Every)?;
        Ok(sales(
            services(ctx)?
                .sales
                .list_by_product(&product_id)
                .await
                .into_graphql()?,
        ))
    }
}

#[derive(Default)]
pub struct SaleMutation;

#[Object]
impl SaleMutation {
    async fn create_sale(&self, ctx: &Context<'_>, input: SaleFields) -> Result<SaleObject> {
        PolicyGuard::new(PolicyHandler::CreateSale).check(ctx, Reach::Some)?;
        let new_sale = NewSale::try_from_input(&input.into()).into_graphql()?;
        let sale = services(ctx)?.sales.create(new_sale).await.into_graphql()?;
        Ok(sale.into())
    }

    /// Partial update; absent fields keep their value.
    async fn update_sale(&self, ctx: &Context<'_>, id: ID, input: SaleFields) -> Result<SaleObject> {
        PolicyGuard::new(PolicyHandler::UpdateSale).check(ctx, Reach::Some)?;
        let update = SaleUpdate::try_from_input(&input.into()).into_graphql()?;
        let sale = services(ctx)?.sales.update(&id, &update).await.into_graphql()?;
        Ok(sale.into())
    }

    async fn delete_sale(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        PolicyGuard::new(PolicyHandler::DeleteSale).check(ctx, Reach::Some)?;
        services(ctx)?.sales.delete(&id).await.into_graphql()
    }
}
