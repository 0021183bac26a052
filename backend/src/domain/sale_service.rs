//! Sales ledger service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{PersistenceError, SaleRepository};
use crate::domain::sale::required_reference;
use crate::domain::service_support::map_persistence_error;
use crate::domain::{EmployeeId, Error, NewSale, ProductId, Sale, SaleId, SaleUpdate};

const SALE_NOT_FOUND: &str = "Sale not found";

/// Sales service. Identifier arguments are taken raw so that missing ids
/// produce the dedicated "required" messages.
#[derive(Clone)]
pub struct SaleService {
    sales: Arc<dyn SaleRepository>,
}

impl SaleService {
    pub fn new(sales: Arc<dyn SaleRepository>) -> Self {
        Self { sales }
    }

    fn map_error(error: PersistenceError) -> Error {
        map_persistence_error(error, SALE_NOT_FOUND)
    }

    fn sale_id(raw: &str) -> Result<SaleId, Error> {
        required_reference(Some(raw), "Sale id is required", SaleId::parse)
    }

    pub async fn create(&self, new_sale: NewSale) -> Result<Sale, Error> {
        let now = Utc::now();
        let sale = Sale {
            id: SaleId::random(),
            employee_id: new_sale.employee_id,
            product_id: new_sale.product_id,
            amount: new_sale.amount,
            quantity: new_sale.quantity,
            created_at: now,
            updated_at: now,
        };
        self.sales.create(&sale).await.map_err(Self::map_error)?;
        info!(sale_id = %sale.id, "sale recorded");
        Ok(sale)
    }

    pub async fn list(&self) -> Result<Vec<Sale>, Error> {
        self.sales.list().await.map_err(Self::map_error)
    }

    /// A single sale: 400 "Sale id is required" for blank ids, 404 "Sale not
    /// found" when absent.
    pub async fn get(&self, raw_id: &str) -> Result<Sale, Error> {
        let id = Self::sale_id(raw_id)?;
        self.find(&id).await
    }

    async fn find(&self, id: &SaleId) -> Result<Sale, Error> {
        self.sales
            .find_by_id(id)
            .await
            .map_err(Self::map_error)?
            .ok_or_else(|| Error::not_found(SALE_NOT_FOUND))
    }

    pub async fn list_by_employee(&self, raw_employee_id: &str) -> Result<Vec<Sale>, Error> {
        let id = required_reference(Some(raw_employee_id), "Employee Id required", EmployeeId::parse)?;
        self.sales.list_by_employee(&id).await.map_err(Self::map_error)
    }

    pub async fn list_by_product(&self, raw_product_id: &str) -> Result<Vec<Sale>, Error> {
        let id = required_reference(Some(raw_product_id), "Product Id required", ProductId::parse)?;
        self.sales.list_by_product(&id).await.map_err(Self::map_error)
    }

    pub async fn update(&self, raw_id: &str, update: &SaleUpdate) -> Result<Sale, Error> {
        let id = Self::sale_id(raw_id)?;
        let mut sale = self.find(&id).await?;
        update.apply(&mut sale);
        sale.updated_at = Utc::now();
        self.sales.update(&sale).await.map_err(Self::map_error)?;
        Ok(sale)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<bool, Error> {
        let id = Self::sale_id(raw_id)?;
        let deleted = self.sales.delete(&id).await.map_err(Self::map_error)?;
        if !deleted {
            return Err(Error::not_found(SALE_NOT_FOUND));
        }
        info!(sale_id = %id, "sale deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockSaleRepository;
    use crate::domain::{ErrorCode, SaleInput};
    use rstest::{fixture, rstest};

    #[fixture]
    fn sale() -> Sale {
        let now = Utc::now();
        Sale {
            id: SaleId::random(),
            employee_id: EmployeeId::random(),
            product_id: ProductId::random(),
            amount: 10.0,
            quantity: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(repo: MockSaleRepository) -> SaleService {
        SaleService::new(Arc::new(repo))
    }

    #[rstest]
    #[case("", ErrorCode::InvalidRequest, "Sale id is required")]
    #[case("  ", ErrorCode::InvalidRequest, "Sale id is required")]
    #[case("abc", ErrorCode::InvalidRequest, "Sale id must be a valid UUID")]
    #[tokio::test]
    async fn get_validates_id(#[case] raw: &str, #[case] code: ErrorCode, #[case] message: &str) {
        let mut repo = MockSaleRepository::new();
        repo.expect_find_by_id().never();

        let err = service(repo).get(raw).await.expect_err("invalid id");
        assert_eq!(err.code(), code);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[tokio::test]
    async fn get_missing_sale_is_not_found() {
        let mut repo = MockSaleRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(repo)
            .get(&SaleId::random().to_string())
            .await
            .expect_err("missing sale");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Sale not found");
    }

    #[rstest]
    #[case("", "Employee Id required")]
    #[tokio::test]
    async fn list_by_employee_requires_id(#[case] raw: &str, #[case] message: &str) {
        let err = service(MockSaleRepository::new())
            .list_by_employee(raw)
            .await
            .expect_err("missing id");
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[tokio::test]
    async fn list_by_product_requires_id() {
        let err = service(MockSaleRepository::new())
            .list_by_product(" ")
            .await
            .expect_err("missing id");
        assert_eq!(err.message(), "Product Id required");
    }

    #[rstest]
    #[tokio::test]
    async fn update_changes_supplied_fields(sale: Sale) {
        let id = sale.id;
        let mut repo = MockSaleRepository::new();
        repo.expect_find_by_id().return_once(move |_| Ok(Some(sale)));
        repo.expect_update()
            .withf(|sale| sale.quantity == 4)
            .times(1)
            .return_once(|_| Ok(()));

        let update = SaleUpdate::try_from_input(&SaleInput {
            quantity: Some(4),
            ..SaleInput::default()
        })
        .expect("valid update");
        let updated = service(repo)
            .update(&id.to_string(), &update)
            .await
            .expect("updated");
        assert!((updated.amount - 10.0).abs() < f64::EPSILON);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_missing_sale_is_not_found() {
        let mut repo = MockSaleRepository::new();
        repo.expect_delete().return_once(|_| Ok(false));

        let err = service(repo)
            .delete(&SaleId::random().to_string())
            .await
            .expect_err("missing sale");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
