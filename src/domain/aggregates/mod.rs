//! Aggregates module
pub mod product;
pub mod cart;
pub mod coupon;

pub use product::{Product, ProductError, VariantGroup, VariantOption};
pub use cart::{Cart, CartError, CartItem};
pub use coupon::{Coupon, CouponError, DiscountType};
