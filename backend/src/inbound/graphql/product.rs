//! Product catalogue resolvers.

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject};
use chrono::{DateTime, Utc};

use super::context::services;
use super::error::IntoGraphql;
use super::guard::PolicyGuard;
use super::types::id;
use crate::domain::{NewProduct, PolicyHandler, Product, ProductId, ProductInput, ProductUpdate, Reach};

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Product")]
pub struct ProductObject {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductObject {
    fn from(product: Product) -> Self {
        Self {
            id: id(product.id),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image: product.image,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(InputObject, Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Defaults to 0.
    pub stock: Option<i32>,
    pub image: Option<String>,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

#[derive(Default)]
pub struct ProductQuery;

#[Object]
impl ProductQuery {
    async fn get_products(&self, ctx: &Context<'_>) -> Result<Vec<ProductObject>> {
        PolicyGuard::new(PolicyHandler::ReadProduct).check(ctx, Reach::Every)?;
        let products = services(ctx)?.products.list().await.into_graphql()?;
        Ok(products.into_iter().map(ProductObject::from).collect())
    }

    async fn get_product(&self, ctx: &Context<'_>, id: ID) -> Result<ProductObject> {
        let (_, id) = PolicyGuard::new(PolicyHandler::ReadProduct).check_record(ctx, &id, ProductId::parse)?;
        let product = services(ctx)?.products.get(&id).await.into_graphql()?;
        Ok(product.into())
    }
}

#[derive(Default)]
pub struct ProductMutation;

#[Object]
impl ProductMutation {
    async fn create_product(&self, ctx: &Context<'_>, input: CreateProductInput) -> Result<ProductObject> {
        PolicyGuard::new(PolicyHandler::CreateProduct).check(ctx, Reach::Some)?;
        let new_product = NewProduct::try_from_input(&ProductInput {
            name: Some(input.name),
            description: input.description,
            price: Some(input.price),
            stock: input.stock,
            image: input.image,
        })
        .into_graphql()?;
        let product = services(ctx)?.products.create(new_product).await.into_graphql()?;
        Ok(product.into())
    }

    async fn update_product(&self, ctx: &Context<'_>, id: ID, input: UpdateProductInput) -> Result<ProductObject> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateProduct).check_record(ctx, &id, ProductId::parse)?;
        let update = ProductUpdate::try_from_input(&ProductInput {
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            image: input.image,
        })
        .into_graphql()?;
        let product = services(ctx)?.products.update(&id, &update).await.into_graphql()?;
        Ok(product.into())
    }

    /// Fails while sales or carts still reference the product.
    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::DeleteProduct).check_record(ctx, &id, ProductId::parse)?;
        services(ctx)?.products.delete(&id).await.into_graphql()
    }
}
