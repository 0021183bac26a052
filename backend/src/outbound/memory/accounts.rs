//! Admin and customer tables.

use async_trait::async_trait;

use crate::domain::ports::{AdminRepository, CustomerRepository, PersistenceError};
use crate::domain::{Admin, AdminId, CartItem, Customer, CustomerId};

use super::{InMemoryStore, email_taken, missing_reference, remove, replace};

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn create(&self, admin: &Admin) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .admins
            .iter()
            .any(|row| row.profile.email == admin.profile.email)
        {
            return Err(email_taken("admins_email_key"));
        }
        tables.admins.push(admin.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AdminId) -> Result<Option<Admin>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|row| row.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .admins
            .iter()
            .find(|row| row.profile.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Admin>, PersistenceError> {
        Ok(self.tables.read().await.admins.clone())
    }

    async fn update(&self, admin: &Admin) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .admins
            .iter()
            .any(|row| row.id != admin.id && row.profile.email == admin.profile.email)
        {
            return Err(email_taken("admins_email_key"));
        }
        replace(&mut tables.admins, |row| row.id == admin.id, admin, "admin")
    }

    async fn delete(&self, id: &AdminId) -> Result<bool, PersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.admins, |row| row.id == *id))
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn create(&self, customer: &Customer) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .iter()
            .any(|row| row.profile.email == customer.profile.email)
        {
            return Err(email_taken("customers_email_key"));
        }
        let mut stored = customer.clone();
        stored.carts.clear();
        tables.customers.push(stored);
        Ok(())
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.iter().find(|row| row.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, PersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .customers
            .iter()
            .find(|row| row.profile.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, PersistenceError> {
        Ok(self.tables.read().await.customers.clone())
    }

    async fn update(&self, customer: &Customer) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if tables
            .customers
            .iter()
            .any(|row| row.id != customer.id && row.profile.email == customer.profile.email)
        {
            return Err(email_taken("customers_email_key"));
        }
        let slot = tables
            .customers
            .iter_mut()
            .find(|row| row.id == customer.id)
            .ok_or_else(|| PersistenceError::not_found("customer"))?;
        let carts = std::mem::take(&mut slot.carts);
        *slot = customer.clone();
        slot.carts = carts;
        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<bool, PersistenceError> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.customers, |row| row.id == *id))
    }

    async fn add_cart_item(&self, item: &CartItem) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.products.iter().any(|row| row.id == item.product_id) {
            return Err(missing_reference("carts_product_id_fkey"));
        }
        let customer = tables
            .customers
            .iter_mut()
            .find(|row| row.id == item.customer_id)
            .ok_or_else(|| missing_reference("carts_customer_id_fkey"))?;
        customer.carts.push(item.clone());
        Ok(())
    }

    async fn update_cart_item(&self, item: &CartItem) -> Result<(), PersistenceError> {
        let mut tables = self.tables.write().await;
        if !tables.products.iter().any(|row| row.id == item.product_id) {
            return Err(missing_reference("carts_product_id_fkey"));
        }
        let customer = tables
            .customers
            .iter_mut()
            .find(|row| row.id == item.customer_id)
            .ok_or_else(|| PersistenceError::not_found("cart"))?;
        replace(&mut customer.carts, |row| row.id == item.id, item, "cart")
    }
}
