//! Product and sale tables.

use async_trait::async_trait;

use crate::domain::ports::{PersistenceError, ProductRepository, SaleRepository};
use crate::domain::{EmployeeId, Product, ProductId, Sale, SaleId};

use super::{InMemoryStore, Tables, missing_reference, remove, replace};

fn check_sale_references(tables: &Tables, sale: &Sale) -> Result<(), PersistenceError> {
    if !tables.employees.iter().any(|row| row.id == sale.employee_id) {
        return Err(missing_reference("sales_employee_id_fkey"));
    }
    if !tables.products.iter().any(|row| row.id == sale.product_id) {
        return Err(missing_reference("sales_product_id_fkey"));
    }
    Ok(())
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: &Product) -> Result<(), PersistenceError> {
        self.tables.write().await.products.push(product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|row| row.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, PersistenceError> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn update(&self, product: &Product) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        replace(
            &mut tables.products,
            |row| row.id == product.id,
            product,
            "product",
        )
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.sales.iter().any(|sale| sale.product_id == *id) {
            return Err(missing_reference("sales_product_id_fkey"));
        }
        if tables
            .customers
            .iter()
            .flat_map(|customer| customer.carts.iter())
            .any(|cart| cart.product_id == *id)
        {
            return Err(missing_reference("carts_product_id_fkey"));
        }
        Ok(remove(&mut tables.products, |row| row.id == *id))
    }
}

#[async_trait]
impl SaleRepository for InMemoryStore {
    async fn create(&self, sale: &Sale) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        check_sale_references(&tables, sale)?;
        tables.sales.push(sale.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SaleId) -> Result<Option<Sale>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.sales.iter().find(|row| row.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Sale>, PersistenceError> {
        Ok(self.tables.read().await.sales.clone())
    }

    async fn list_by_employee(&self, id: &EmployeeId) -> Result<Vec<Sale>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sales
            .iter()
            .filter(|sale| sale.employee_id == *id)
            .cloned()
            .collect())
    }

    async fn list_by_product(&self, id: &ProductId) -> Result<Vec<Sale>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sales
            .iter()
            .filter(|sale| sale.product_id == *id)
            .cloned()
            .collect())
    }

    async fn update(&self, sale: &Sale) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        check_sale_references(&tables, sale)?;
        replace(&mut tables.sales, |row| row.id == sale.id, sale, "sale")
    }

    async fn delete(&self, id: &SaleId) -> Result<bool, PersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.sales, |row| row.id == *id))
    }
}
