//! Customer account and cart resolvers.

use async_graphql::{Context, ID, InputObject, Object, Result, SimpleObject, Upload};
use chrono::{DateTime, Utc};

use super::context::services;
use super::cookies::{expire_access_token, set_access_token};
use super::error::IntoGraphql;
use super::guard::PolicyGuard;
use super::types::{LoginInput, RoleKind, id};
use super::uploads::read_avatar;
use crate::domain::{
    CartId, CartItem, CartUpdate, Customer, CustomerId, CustomerUpdate, LoginCredentials,
    NewCartItem, PolicyHandler, ProfileUpdateInput, Reach, Registration, RegistrationInput,
};

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Cart")]
pub struct CartObject {
    pub id: ID,
    pub customer_id: ID,
    pub product_id: ID,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartItem> for CartObject {
    fn from(item: CartItem) -> Self {
        Self {
            id: id(item.id),
            customer_id: id(item.customer_id),
            product_id: id(item.product_id),
            quantity: item.quantity,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Shop customer with their cart lines.
#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Customer")]
pub struct CustomerObject {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub avatar: String,
    pub role: RoleKind,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub carts: Vec<CartObject>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerObject {
    fn from(customer: Customer) -> Self {
        Self {
            id: id(customer.id),
            email: customer.profile.email,
            first_name: customer.profile.first_name,
            last_name: customer.profile.last_name,
            user_name: customer.profile.user_name,
            avatar: customer.avatar,
            role: RoleKind::Customer,
            phone: customer.profile.phone,
            address: customer.address,
            carts: customer.carts.into_iter().map(CartObject::from).collect(),
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

#[derive(InputObject, Debug, Clone)]
pub struct CreateCustomerInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: Option<String>,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(InputObject, Debug, Clone)]
pub struct CartInput {
    pub product_id: ID,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct UpdateCartInput {
    pub product_id: Option<ID>,
    pub quantity: Option<i32>,
}

#[derive(Default)]
pub struct CustomerQuery;

#[Object]
impl CustomerQuery {
    async fn get_customers(&self, ctx: &Context<'_>) -> Result<Vec<CustomerObject>> {
        PolicyGuard::new(PolicyHandler::ReadCustomer).check(ctx, Reach::Every)?;
        let customers = services(ctx)?.customers.list().await.into_graphql()?;
        Ok(customers.into_iter().map(CustomerObject::from).collect())
    }

    /// The signed-in customer.
    async fn get_customer_profile(&self, ctx: &Context<'_>) -> Result<CustomerObject> {
        let user = PolicyGuard::new(PolicyHandler::ReadCustomer).check_own(ctx)?;
        let customer = services(ctx)?
            .customers
            .profile(&CustomerId::from(user.id))
            .await
            .into_graphql()?;
        Ok(customer.into())
    }

    async fn get_customer_by_id(&self, ctx: &Context<'_>, id: ID) -> Result<CustomerObject> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::ReadCustomer).check_record(ctx, &id, CustomerId::parse)?;
        let customer = services(ctx)?.customers.profile(&id).await.into_graphql()?;
        Ok(customer.into())
    }

    async fn logout_customer(&self, ctx: &Context<'_>) -> Result<bool> {
        expire_access_token(ctx)?;
        Ok(true)
    }
}

#[derive(Default)]
pub struct CustomerMutation;

#[Object]
impl CustomerMutation {
    /// Self-service sign-up; signs the new customer in.
    async fn create_customer(&self, ctx: &Context<'_>, input: CreateCustomerInput) -> Result<CustomerObject> {
        let registration = Registration::try_from_input(&RegistrationInput {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            user_name: input.user_name,
            password: input.password,
            phone: input.phone,
        })
        .into_graphql()?;
        let signed_in = services(ctx)?
            .customers
            .register(registration, input.address)
            .await
            .into_graphql()?;
        set_access_token(ctx, &signed_in.token)?;
        Ok(signed_in.account.into())
    }

    async fn login_customer(&self, ctx: &Context<'_>, input: LoginInput) -> Result<CustomerObject> {
        let credentials = LoginCredentials::try_from_parts(&input.email, &input.password).into_graphql()?;
        let signed_in = services(ctx)?.customers.login(&credentials).await.into_graphql()?;
        set_access_token(ctx, &signed_in.token)?;
        Ok(signed_in.account.into())
    }

    async fn update_customer_avatar(&self, ctx: &Context<'_>, id: ID, avatar: Upload) -> Result<bool> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateCustomer).check_record(ctx, &id, CustomerId::parse)?;
        let upload = read_avatar(ctx, &avatar).await?;
        services(ctx)?.customers.update_avatar(&id, &upload).await.into_graphql()
    }

    async fn delete_customer_avatar(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateCustomer).check_record(ctx, &id, CustomerId::parse)?;
        services(ctx)?.customers.delete_avatar(&id).await.into_graphql()
    }

    async fn update_customer(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateCustomerInput,
    ) -> Result<CustomerObject> {
        let (_, id) =
            PolicyGuard::new(PolicyHandler::UpdateCustomer).check_record(ctx, &id, CustomerId::parse)?;
        let profile = ProfileUpdateInput {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            user_name: input.user_name,
            phone: input.phone,
        };
        let update = CustomerUpdate::try_from_input(&profile, input.address.as_deref()).into_graphql()?;
        let customer = services(ctx)?.customers.update(&id, &update).await.into_graphql()?;
        Ok(customer.into())
    }

    /// Delete a customer and their cart; deleting yourself also signs you out.
    async fn delete_customer(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (user, id) =
            PolicyGuard::new(PolicyHandler::DeleteCustomer).check_record(ctx, &id, CustomerId::parse)?;
        let deleted = services(ctx)?.customers.delete(&id).await.into_graphql()?;
        if user.owns(id.as_uuid()) {
            expire_access_token(ctx)?;
        }
        Ok(deleted)
    }

    /// Add a line to the signed-in customer's cart.
    async fn add_to_cart(&self, ctx: &Context<'_>, input: CartInput) -> Result<CustomerObject> {
        let user = PolicyGuard::new(PolicyHandler::ManageCart).check_own(ctx)?;
        let item = NewCartItem::try_new(&input.product_id, input.quantity).into_graphql()?;
        let customer = services(ctx)?
            .customers
            .add_to_cart(&CustomerId::from(user.id), item)
            .await
            .into_graphql()?;
        Ok(customer.into())
    }

    async fn update_cart(&self, ctx: &Context<'_>, cart_id: ID, input: UpdateCartInput) -> Result<CustomerObject> {
        let user = PolicyGuard::new(PolicyHandler::ManageCart).check_own(ctx)?;
        let cart_id = CartId::parse(&cart_id).into_graphql()?;
        let update = CartUpdate::try_new(input.product_id.as_deref().map(String::as_str), input.quantity)
            .into_graphql()?;
        let customer = services(ctx)?
            .customers
            .update_cart(&CustomerId::from(user.id), &cart_id, update)
            .await
            .into_graphql()?;
        Ok(customer.into())
    }
}
