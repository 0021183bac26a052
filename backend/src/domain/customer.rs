//! Customer accounts and their shopping carts.

use chrono::{DateTime, Utc};

use super::validation::{blank_to_none, positive_count};
use super::{
    CartId, CustomerId, Error, PasswordDigest, ProductId, Profile, ProfileUpdate,
    ProfileUpdateInput, Role,
};

/// Shop customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub profile: Profile,
    pub password: PasswordDigest,
    pub avatar: String,
    pub address: Option<String>,
    pub carts: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Customers always carry [`Role::Customer`].
    #[must_use]
    pub const fn role(&self) -> Role {
        Role::Customer
    }

    /// Copy with `password` and `salt` blanked.
    #[must_use]
    pub fn without_secrets(mut self) -> Self {
        self.password = PasswordDigest::default();
        self
    }
}

/// One product line in a customer's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer profile update: account fields plus the delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    pub profile: ProfileUpdate,
    pub address: Option<String>,
}

impl CustomerUpdate {
    /// Validate a raw update.
    pub fn try_from_input(input: &ProfileUpdateInput, address: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            profile: ProfileUpdate::try_from_input(input)?,
            address: blank_to_none(address),
        })
    }

    /// Whether no field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profile.is_empty() && self.address.is_none()
    }

    /// Overwrite the supplied fields of `customer`.
    pub fn apply(&self, customer: &mut Customer) {
        self.profile.apply(&mut customer.profile);
        if let Some(address) = &self.address {
            customer.address = Some(address.clone());
        }
    }
}

/// Validated cart line to add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

impl NewCartItem {
    /// Validate raw cart input; quantity defaults to one.
    pub fn try_new(product_id: &str, quantity: Option<i32>) -> Result<Self, Error> {
        Ok(Self {
            product_id: ProductId::parse(product_id)?,
            quantity: positive_count("quantity", quantity.unwrap_or(1))?,
        })
    }
}

/// Partial cart line update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartUpdate {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i32>,
}

impl CartUpdate {
    /// Validate a raw update, rejecting empty ones.
    pub fn try_new(product_id: Option<&str>, quantity: Option<i32>) -> Result<Self, Error> {
        let update = Self {
            product_id: product_id.map(ProductId::parse).transpose()?,
            quantity: quantity.map(|q| positive_count("quantity", q)).transpose()?,
        };
        if update.product_id.is_none() && update.quantity.is_none() {
            return Err(Error::invalid_request("cart update must change at least one field"));
        }
        Ok(update)
    }

    /// Overwrite the supplied fields of `item`.
    pub fn apply(&self, item: &mut CartItem) {
        if let Some(product_id) = self.product_id {
            item.product_id = product_id;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
    }
}
