//! GraphQL adapter.
//!
//! One query/mutation object per record family, merged into the schema
//! roots. Resolvers authorise through [`PolicyGuard`], call a domain service
//! and shape the result; domain errors surface through [`graphql_error`].

mod admin;
mod app;
mod context;
mod cookies;
mod customer;
mod employee;
mod error;
mod guard;
mod product;
mod sale;
mod types;
mod uploads;

use async_graphql::{MergedObject, Schema};

pub use self::admin::{AdminMutation, AdminObject, AdminQuery};
pub use self::app::AppQuery;
pub use self::context::{GraphqlServices, RequestUser};
pub use self::cookies::{ACCESS_TOKEN_COOKIE, CookieSettings};
pub use self::customer::{CartObject, CustomerMutation, CustomerObject, CustomerQuery};
pub use self::employee::{
    AttendanceObject, EmployeeMutation, EmployeeObject, EmployeeQuery, EmployeeSubscription,
};
pub use self::error::graphql_error;
pub use self::guard::PolicyGuard;
pub use self::product::{ProductMutation, ProductObject, ProductQuery};
pub use self::sale::{SaleMutation, SaleObject, SaleQuery};
pub use self::types::RoleKind;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    AppQuery,
    AdminQuery,
    CustomerQuery,
    EmployeeQuery,
    ProductQuery,
    SaleQuery,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AdminMutation,
    CustomerMutation,
    EmployeeMutation,
    ProductMutation,
    SaleMutation,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmployeeSubscription>;

/// Assemble the schema with its shared services and cookie policy.
pub fn build_schema(services: GraphqlServices, cookies: CookieSettings) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmployeeSubscription,
    )
    .data(services)
    .data(cookies)
    .finish()
}
