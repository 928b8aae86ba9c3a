use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::checkout::CheckoutTotals;
use crate::domain::aggregates::{Coupon, Product};
use crate::domain::selection::Selection;
use crate::resolver::Resolution;

#[derive(Debug, Deserialize)]
pub struct ViewProductRequest {
    pub product: Product,
    /// Defaults to the first option of every group.
    pub selection: Option<Selection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub selection: Selection,
    pub resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_label: Option<String>,
    pub quantity: u32,
    pub gallery: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub product: Product,
    #[serde(default)]
    pub selection: Selection,
}

#[derive(Debug, Deserialize)]
pub struct ClampRequest {
    pub requested: i64,
    pub stock: u32,
}

#[derive(Debug, Serialize)]
pub struct ClampResponse {
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product: Product,
    #[serde(default)]
    pub selection: Selection,
    #[validate(range(min = 1, max = 10000))]
    pub quantity: i64,
}

/// Sets the quantity of an existing line; 0 removes it. The product is
/// re-resolved so the new quantity is checked against current stock.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartRequest {
    pub product: Product,
    #[serde(default)]
    pub selection: Selection,
    #[validate(range(min = 0, max = 10000))]
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateRate {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 128))]
    pub session: String,
    #[validate(length(max = 64))]
    pub governorate: Option<String>,
    pub coupon: Option<Coupon>,
}

pub type CheckoutResponse = CheckoutTotals;
