//! Storefront pricing
//!
//! Price, stock and image resolution for products with variant groups, plus
//! the cart and checkout arithmetic that builds on it.
//!
//! ## Features
//! - Variant selection and resolution
//! - Quantity clamping and add-to-cart gating
//! - Variant-aware carts
//! - Coupons and governorate shipping rates
//! - Thin HTTP surface over all of the above

use thiserror::Error;

pub mod api;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod resolver;

pub use domain::aggregates::{Cart, CartItem, Coupon, DiscountType, Product, VariantGroup, VariantOption};
pub use domain::selection::{SelectedVariant, Selection};
pub use resolver::{check_purchase, clamp_quantity, resolve, CartPayload, IncompleteSelection, Resolution, ResolvedVariant};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Please select an option for '{group}'")]
    IncompleteSelection { group: String },

    #[error("Variant option '{value}' not found for group '{group}'")]
    UnknownOption { group: String, value: String },

    #[error("Variant group '{group}' not found for product")]
    UnknownGroup { group: String },

    #[error("Please enter a valid quantity")]
    InvalidQuantity,

    #[error("Only {available} units available, requested {requested}")]
    InsufficientStock { available: u32, requested: u32 },

    #[error("Product does not support variants")]
    UnexpectedVariants,

    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] domain::aggregates::ProductError),

    #[error(transparent)]
    Cart(#[from] domain::aggregates::CartError),

    #[error(transparent)]
    Coupon(#[from] domain::aggregates::CouponError),

    #[error("Currency mismatch")]
    CurrencyMismatch,

    #[error("Cart not found")]
    CartNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
