//! Storefront domain: catalog products, selections, carts and coupons.
pub mod aggregates;
pub mod events;
pub mod selection;
pub mod value_objects;
