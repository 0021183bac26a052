//! Customer account and cart service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{AvatarStore, CredentialHasher, CustomerRepository, TokenService};
use crate::domain::service_support::{
    check_password, issue_token, map_avatar_error, map_hasher_error, map_persistence_error,
    signed_in,
};
use crate::domain::{
    AvatarFolder, AvatarUpload, CartId, CartItem, CartUpdate, Customer, CustomerId,
    CustomerUpdate, DEFAULT_AVATAR_URL, Error, LoginCredentials, NewCartItem, Registration,
    SignedIn,
};

const USER_NOT_FOUND: &str = "User not found";
const CART_NOT_FOUND: &str = "Cart not found";

/// Customer account service.
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenService>,
    avatars: Arc<dyn AvatarStore>,
}

impl CustomerService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenService>,
        avatars: Arc<dyn AvatarStore>,
    ) -> Self {
        Self {
            customers,
            hasher,
            tokens,
            avatars,
        }
    }

    async fn require(&self, id: &CustomerId) -> Result<Customer, Error> {
        self.customers
            .find_by_id(id)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn save(&self, customer: &Customer) -> Result<(), Error> {
        self.customers
            .update(customer)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))
    }

    async fn email_holder(&self, email: &str) -> Result<Option<Customer>, Error> {
        self.customers
            .find_by_email(email)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))
    }

    /// Register a customer and sign them in.
    pub async fn register(
        &self,
        registration: Registration,
        address: Option<String>,
    ) -> Result<SignedIn<Customer>, Error> {
        let (profile, password) = registration.into_parts();
        if self.email_holder(&profile.email).await?.is_some() {
            return Err(Error::conflict("Email already exists"));
        }

        let digest = self
            .hasher
            .hash(&password)
            .await
            .map_err(map_hasher_error)?;
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::random(),
            profile,
            password: digest,
            avatar: DEFAULT_AVATAR_URL.to_owned(),
            address,
            carts: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.customers
            .create(&customer)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        info!(customer_id = %customer.id, "customer registered");

        let token = issue_token(
            self.tokens.as_ref(),
            *customer.id.as_uuid(),
            &customer.profile.email,
            customer.role(),
        )?;
        Ok(signed_in(customer.without_secrets(), token))
    }

    /// Verify credentials and sign the customer in.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn<Customer>, Error> {
        let customer = self.email_holder(credentials.email().as_ref()).await?;
        check_password(
            self.hasher.as_ref(),
            credentials,
            customer.as_ref().map(|c| &c.password),
        )
        .await?;
        let customer =
            customer.ok_or_else(|| Error::invalid_request("No record found for this email"))?;
        let token = issue_token(
            self.tokens.as_ref(),
            *customer.id.as_uuid(),
            &customer.profile.email,
            customer.role(),
        )?;
        Ok(signed_in(customer.without_secrets(), token))
    }

    /// Every customer with their carts.
    pub async fn list(&self) -> Result<Vec<Customer>, Error> {
        let customers = self
            .customers
            .list()
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        Ok(customers.into_iter().map(Customer::without_secrets).collect())
    }

    /// A single customer with their carts.
    pub async fn profile(&self, id: &CustomerId) -> Result<Customer, Error> {
        self.require(id).await.map(Customer::without_secrets)
    }

    /// Apply a partial profile update.
    pub async fn update(&self, id: &CustomerId, update: &CustomerUpdate) -> Result<Customer, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("update must change at least one field"));
        }
        let mut customer = self.require(id).await?;
        if let Some(email) = update.profile.email() {
            let holder = self.email_holder(email).await?;
            if holder.is_some_and(|other| other.id != customer.id) {
                return Err(Error::conflict("Email already exists"));
            }
        }
        update.apply(&mut customer);
        customer.updated_at = Utc::now();
        self.save(&customer).await?;
        Ok(customer.without_secrets())
    }

    /// Store a new avatar and point the customer at it.
    pub async fn update_avatar(
        &self,
        id: &CustomerId,
        upload: &AvatarUpload,
    ) -> Result<bool, Error> {
        let mut customer = self.require(id).await?;
        customer.avatar = self
            .avatars
            .store(AvatarFolder::Customer, upload)
            .await
            .map_err(map_avatar_error)?;
        customer.updated_at = Utc::now();
        self.save(&customer).await?;
        Ok(true)
    }

    /// Reset the avatar to the default image.
    pub async fn delete_avatar(&self, id: &CustomerId) -> Result<bool, Error> {
        let mut customer = self.require(id).await?;
        DEFAULT_AVATAR_URL.clone_into(&mut customer.avatar);
        customer.updated_at = Utc::now();
        self.save(&customer).await?;
        Ok(true)
    }

    /// Delete the customer and their carts.
    pub async fn delete(&self, id: &CustomerId) -> Result<bool, Error> {
        let deleted = self
            .customers
            .delete(id)
            .await
            .map_err(|err| map_persistence_error(err, USER_NOT_FOUND))?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(customer_id = %id, "customer deleted");
        Ok(true)
    }

    /// Add a product line to the customer's cart.
    pub async fn add_to_cart(&self, id: &CustomerId, item: NewCartItem) -> Result<Customer, Error> {
        let customer = self.require(id).await?;
        let now = Utc::now();
        let line = CartItem {
            id: CartId::random(),
            customer_id: customer.id,
            product_id: item.product_id,
            quantity: item.quantity,
            created_at: now,
            updated_at: now,
        };
        self.customers
            .add_cart_item(&line)
            .await
            .map_err(|err| map_persistence_error(err, CART_NOT_FOUND))?;
        self.profile(id).await
    }

    /// Change one of the customer's cart lines. Lines owned by another
    /// customer are reported as missing.
    pub async fn update_cart(
        &self,
        id: &CustomerId,
        cart_id: &CartId,
        update: CartUpdate,
    ) -> Result<Customer, Error> {
        let customer = self.require(id).await?;
        let mut line = customer
            .carts
            .into_iter()
            .find(|line| &line.id == cart_id)
            .ok_or_else(|| Error::not_found(CART_NOT_FOUND))?;
        update.apply(&mut line);
        line.updated_at = Utc::now();
        self.customers
            .update_cart_item(&line)
            .await
            .map_err(|err| map_persistence_error(err, CART_NOT_FOUND))?;
        self.profile(id).await
    }
}
