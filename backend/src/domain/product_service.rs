//! Product catalogue service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::ProductRepository;
use crate::domain::service_support::{map_delete_error, map_persistence_error};
use crate::domain::{Error, NewProduct, Product, ProductId, ProductUpdate};

const PRODUCT_NOT_FOUND: &str = "Product not found";
const PRODUCT_REFERENCED: &str = "Product is still referenced by sales or carts";

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    fn map_error(error: crate::domain::ports::PersistenceError) -> Error {
        map_persistence_error(error, PRODUCT_NOT_FOUND)
    }

    pub async fn create(&self, new_product: NewProduct) -> Result<Product, Error> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::random(),
            name: new_product.name,
            description: new_product.description,
            price: new_product.price,
            stock: new_product.stock,
            image: new_product.image,
            created_at: now,
            updated_at: now,
        };
        self.products.create(&product).await.map_err(Self::map_error)?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub async fn list(&self) -> Result<Vec<Product>, Error> {
        self.products.list().await.map_err(Self::map_error)
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product, Error> {
        self.products
            .find_by_id(id)
            .await
            .map_err(Self::map_error)?
            .ok_or_else(|| Error::not_found(PRODUCT_NOT_FOUND))
    }

    pub async fn update(&self, id: &ProductId, update: &ProductUpdate) -> Result<Product, Error> {
        let mut product = self.get(id).await?;
        update.apply(&mut product);
        product.updated_at = Utc::now();
        self.products.update(&product).await.map_err(Self::map_error)?;
        Ok(product)
    }

    /// Remove a product. Products still referenced by sales or carts are
    /// rejected as an invalid request.
    pub async fn delete(&self, id: &ProductId) -> Result<bool, Error> {
        let deleted = self
            .products
            .delete(id)
            .await
            .map_err(|err| map_delete_error(err, PRODUCT_NOT_FOUND, PRODUCT_REFERENCED))?;
        if !deleted {
            return Err(Error::not_found(PRODUCT_NOT_FOUND));
        }
        info!(product_id = %id, "product deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockProductRepository, PersistenceError};
    use crate::domain::{ErrorCode, ProductInput};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let mut repo = MockProductRepository::new();
        repo.expect_create().times(1).return_once(|_| Ok(()));
        let new_product = NewProduct::try_from_input(&ProductInput {
            name: Some("Mug".into()),
            price: Some(7.0),
            ..ProductInput::default()
        })
        .expect("valid product");

        let product = ProductService::new(Arc::new(repo))
            .create(new_product)
            .await
            .expect("created");
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.name, "Mug");
    }

    #[rstest]
    #[tokio::test]
    async fn referenced_products_cannot_be_deleted() {
        let mut repo = MockProductRepository::new();
        repo.expect_delete()
            .return_once(|_| Err(PersistenceError::foreign_key_violation("sales_product_id_fkey")));

        let err = ProductService::new(Arc::new(repo))
            .delete(&ProductId::random())
            .await
            .expect_err("referenced product");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Product is still referenced by sales or carts");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_product_is_not_found() {
        let mut repo = MockProductRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = ProductService::new(Arc::new(repo))
            .get(&ProductId::random())
            .await
            .expect_err("missing");
        assert_eq!(err.message(), "Product not found");
    }
}
