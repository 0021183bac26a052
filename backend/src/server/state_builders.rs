//! Builders wiring repositories and services for the GraphQL schema.

use std::sync::Arc;

use tracing::{info, warn};

use dynasty::domain::ports::{
    AdminRepository, CredentialHasher, CustomerRepository, EmployeeRepository, ProductRepository,
    SaleRepository,
};
use dynasty::domain::{
    AdminService, CustomerService, EmployeeService, EventBus, ProductService, SaleService,
};
use dynasty::inbound::graphql::GraphqlServices;
use dynasty::outbound::memory::InMemoryStore;
use dynasty::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselCustomerRepository, DieselEmployeeRepository,
    DieselProductRepository, DieselSaleRepository,
};
use dynasty::outbound::security::Argon2CredentialHasher;

use super::ServerConfig;

/// One adapter per repository port.
struct Repositories {
    admins: Arc<dyn AdminRepository>,
    customers: Arc<dyn CustomerRepository>,
    employees: Arc<dyn EmployeeRepository>,
    products: Arc<dyn ProductRepository>,
    sales: Arc<dyn SaleRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            admins: Arc::new(DieselAdminRepository::new(pool.clone())),
            customers: Arc::new(DieselCustomerRepository::new(pool.clone())),
            employees: Arc::new(DieselEmployeeRepository::new(pool.clone())),
            products: Arc::new(DieselProductRepository::new(pool.clone())),
            sales: Arc::new(DieselSaleRepository::new(pool.clone())),
        }
    }

    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            admins: store.clone(),
            customers: store.clone(),
            employees: store.clone(),
            products: store.clone(),
            sales: store,
        }
    }
}

/// Build the services shared by every worker. Without a pool the records
/// live in memory and vanish on restart.
pub(super) fn build_services(config: &ServerConfig) -> GraphqlServices {
    let repositories = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            Repositories::diesel(pool)
        }
        None => {
            warn!("no database configured; records are kept in memory");
            Repositories::in_memory()
        }
    };
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2CredentialHasher::default());

    GraphqlServices {
        admins: AdminService::new(
            repositories.admins,
            hasher.clone(),
            config.tokens.clone(),
            config.avatars.clone(),
        ),
        customers: CustomerService::new(
            repositories.customers,
            hasher,
            config.tokens.clone(),
            config.avatars.clone(),
        ),
        employees: EmployeeService::new(
            repositories.employees,
            config.avatars.clone(),
            EventBus::default(),
        ),
        products: ProductService::new(repositories.products),
        sales: SaleService::new(repositories.sales),
    }
}
