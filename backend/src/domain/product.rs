//! Catalogue products.

use chrono::{DateTime, Utc};

use super::validation::{blank_to_none, non_negative_amount, non_negative_count, optional_text, required_text};
use super::{Error, ProductId};

/// Item offered for sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw product payload shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

/// Validated new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
}

impl NewProduct {
    /// Validate a create payload. Name and price are required; stock
    /// defaults to zero.
    pub fn try_from_input(input: &ProductInput) -> Result<Self, Error> {
        let price = input
            .price
            .ok_or_else(|| Error::invalid_request("price is required"))?;
        Ok(Self {
            name: required_text("name", input.name.as_deref().unwrap_or_default())?,
            description: blank_to_none(input.description.as_deref()),
            price: non_negative_amount("price", price)?,
            stock: non_negative_count("stock", input.stock.unwrap_or(0))?,
            image: blank_to_none(input.image.as_deref()),
        })
    }
}

/// Validated partial product update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    stock: Option<i32>,
    image: Option<String>,
}

impl ProductUpdate {
    /// Validate an update payload, rejecting one that changes nothing.
    pub fn try_from_input(input: &ProductInput) -> Result<Self, Error> {
        let update = Self {
            name: optional_text("name", input.name.as_deref())?,
            description: blank_to_none(input.description.as_deref()),
            price: input
                .price
                .map(|p| non_negative_amount("price", p))
                .transpose()?,
            stock: input
                .stock
                .map(|s| non_negative_count("stock", s))
                .transpose()?,
            image: blank_to_none(input.image.as_deref()),
        };
        if update == Self::default() {
            return Err(Error::invalid_request("update must change at least one field"));
        }
        Ok(update)
    }

    /// Overwrite the supplied fields of `product`.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if self.description.is_some() {
            product.description.clone_from(&self.description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if self.image.is_some() {
            product.image.clone_from(&self.image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input() -> ProductInput {
        ProductInput {
            name: Some("Espresso beans".into()),
            price: Some(12.5),
            ..ProductInput::default()
        }
    }

    #[rstest]
    fn stock_defaults_to_zero() {
        let product = NewProduct::try_from_input(&input()).expect("valid product");
        assert_eq!(product.stock, 0);
    }

    #[rstest]
    #[case(ProductInput { price: None, ..input() })]
    #[case(ProductInput { price: Some(f64::NAN), ..input() })]
    #[case(ProductInput { name: Some("  ".into()), ..input() })]
    #[case(ProductInput { stock: Some(-1), ..input() })]
    fn invalid_products_are_rejected(#[case] input: ProductInput) {
        assert!(NewProduct::try_from_input(&input).is_err());
    }

    #[rstest]
    fn update_changes_only_supplied_fields() {
        let now = Utc::now();
        let mut product = Product {
            id: ProductId::random(),
            name: "Tea".into(),
            description: Some("Green".into()),
            price: 3.0,
            stock: 10,
            image: None,
            created_at: now,
            updated_at: now,
        };
        let update = ProductUpdate::try_from_input(&ProductInput {
            stock: Some(4),
            ..ProductInput::default()
        })
        .expect("valid update");
        update.apply(&mut product);
        assert_eq!(product.stock, 4);
        assert_eq!(product.description.as_deref(), Some("Green"));
    }
}
