//! Data shared with resolvers through the schema and per-request context.

use async_graphql::Context;

use crate::domain::{
    AdminService, AuthenticatedUser, CustomerService, EmployeeService, ProductService, SaleService,
};

/// Services reachable from every resolver.
#[derive(Clone)]
pub struct GraphqlServices {
    pub admins: AdminService,
    pub customers: CustomerService,
    pub employees: EmployeeService,
    pub products: ProductService,
    pub sales: SaleService,
}

/// Caller attached to a single request; `None` for anonymous requests.
#[derive(Debug, Clone, Default)]
pub struct RequestUser(pub Option<AuthenticatedUser>);

pub(crate) fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a GraphqlServices> {
    ctx.data::<GraphqlServices>()
}

pub(crate) fn caller<'a>(ctx: &Context<'a>) -> Option<&'a AuthenticatedUser> {
    ctx.data_opt::<RequestUser>().and_then(|user| user.0.as_ref())
}
