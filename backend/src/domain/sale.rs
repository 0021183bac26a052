//! Sales recorded by employees against products.

use chrono::{DateTime, Utc};

use super::validation::{non_negative_amount, positive_count};
use super::{EmployeeId, Error, ProductId, SaleId};

/// A completed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub id: SaleId,
    pub employee_id: EmployeeId,
    pub product_id: ProductId,
    pub amount: f64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw sale payload shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct SaleInput {
    pub employee_id: Option<String>,
    pub product_id: Option<String>,
    pub amount: Option<f64>,
    pub quantity: Option<i32>,
}

/// Validated new sale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewSale {
    pub employee_id: EmployeeId,
    pub product_id: ProductId,
    pub amount: f64,
    pub quantity: i32,
}

/// Parse a required reference, reporting `missing` when absent or blank.
pub(crate) fn required_reference<T>(
    raw: Option<&str>,
    missing: &'static str,
    parse: fn(&str) -> Result<T, Error>,
) -> Result<T, Error> {
    match raw {
        Some(value) if !value.trim().is_empty() => parse(value),
        _ => Err(Error::invalid_request(missing)),
    }
}

impl NewSale {
    /// Validate a create payload.
    pub fn try_from_input(input: &SaleInput) -> Result<Self, Error> {
        let amount = input
            .amount
            .ok_or_else(|| Error::invalid_request("amount is required"))?;
        let quantity = input
            .quantity
            .ok_or_else(|| Error::invalid_request("quantity is required"))?;
        Ok(Self {
            employee_id: required_reference(
                input.employee_id.as_deref(),
                "Employee Id required",
                EmployeeId::parse,
            )?,
            product_id: required_reference(
                input.product_id.as_deref(),
                "Product Id required",
                ProductId::parse,
            )?,
            amount: non_negative_amount("amount", amount)?,
            quantity: positive_count("quantity", quantity)?,
        })
    }
}

/// Validated partial sale update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SaleUpdate {
    employee_id: Option<EmployeeId>,
    product_id: Option<ProductId>,
    amount: Option<f64>,
    quantity: Option<i32>,
}

impl SaleUpdate {
    /// Validate an update payload, rejecting one that changes nothing.
    pub fn try_from_input(input: &SaleInput) -> Result<Self, Error> {
        let update = Self {
            employee_id: input.employee_id.as_deref().map(EmployeeId::parse).transpose()?,
            product_id: input.product_id.as_deref().map(ProductId::parse).transpose()?,
            amount: input
                .amount
                .map(|a| non_negative_amount("amount", a))
                .transpose()?,
            quantity: input
                .quantity
                .map(|q| positive_count("quantity", q))
                .transpose()?,
        };
        if update == Self::default() {
            return Err(Error::invalid_request("update must change at least one field"));
        }
        Ok(update)
    }

    /// Overwrite the supplied fields of `sale`.
    pub fn apply(&self, sale: &mut Sale) {
        if let Some(employee_id) = self.employee_id {
            sale.employee_id = employee_id;
        }
        if let Some(product_id) = self.product_id {
            sale.product_id = product_id;
        }
        if let Some(amount) = self.amount {
            sale.amount = amount;
        }
        if let Some(quantity) = self.quantity {
            sale.quantity = quantity;
        }
    }
}
