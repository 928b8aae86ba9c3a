//! Cart Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::selection::SelectedVariant;
use crate::domain::value_objects::{Money, Quantity};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    id: String,
    session_id: Option<String>,
    items: Vec<CartItem>,
    subtotal: Money,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

/// A cart line. Identity is the product plus its normalized variant choices.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    pub selected_variants: Vec<SelectedVariant>,
    #[serde(with = "rust_decimal::serde::float")]
    pub variant_price_adjustment: Decimal,
    pub variant_image_url: String,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, quantity: u32, unit_price: Money, mut selected_variants: Vec<SelectedVariant>) -> Self {
        selected_variants.sort();
        Self {
            product_id: product_id.into(), name: name.into(), quantity: Quantity::new(quantity), unit_price,
            selected_variants, variant_price_adjustment: Decimal::ZERO, variant_image_url: String::new(),
        }
    }
    pub fn with_variant_details(mut self, adjustment: Decimal, image_url: impl Into<String>) -> Self {
        self.variant_price_adjustment = adjustment;
        self.variant_image_url = image_url.into();
        self
    }
    pub fn line_total(&self) -> Money { self.unit_price.multiply(self.quantity.value()) }
    fn same_line(&self, product_id: &str, variants: &[SelectedVariant]) -> bool {
        self.product_id == product_id && self.selected_variants == variants
    }
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(), session_id: None,
            items: vec![], subtotal: Money::zero(currency), currency: currency.to_string(),
            created_at: Utc::now(), updated_at: Utc::now(), events: vec![],
        }
    }

    pub fn for_session(session_id: impl Into<String>, currency: &str) -> Self {
        let mut cart = Self::new(currency);
        cart.session_id = Some(session_id.into());
        cart
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn subtotal(&self) -> &Money { &self.subtotal }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Quantity already held for this product and variant combination.
    pub fn quantity_of(&self, product_id: &str, variants: &[SelectedVariant]) -> u32 {
        let mut variants = variants.to_vec();
        variants.sort();
        self.items.iter().find(|i| i.same_line(product_id, &variants)).map_or(0, |i| i.quantity.value())
    }

    /// Adds a line, merging with an identical one. The merged quantity may not
    /// exceed `available`; a merge refreshes price and variant details.
    pub fn add_item(&mut self, item: CartItem, available: u32) -> Result<(), CartError> {
        if item.unit_price.currency() != self.currency { return Err(CartError::CurrencyMismatch); }
        let added = item.quantity.value();
        let product_id = item.product_id.clone();
        if let Some(existing) = self.items.iter_mut().find(|i| i.same_line(&item.product_id, &item.selected_variants)) {
            let merged = existing.quantity.add(added);
            if merged.value() > available {
                return Err(CartError::ExceedsStock { available, in_cart: existing.quantity.value() });
            }
            existing.quantity = merged;
            existing.unit_price = item.unit_price;
            existing.variant_price_adjustment = item.variant_price_adjustment;
            existing.variant_image_url = item.variant_image_url;
        } else {
            if added > available {
                return Err(CartError::ExceedsStock { available, in_cart: 0 });
            }
            self.items.push(item);
        }
        self.raise_event(DomainEvent::Cart(CartEvent::ItemAdded { cart_id: self.id.clone(), product_id, quantity: added }));
        self.recalculate();
        Ok(())
    }

    /// Sets a line's quantity, removing the line at 0. A non-zero quantity may
    /// not exceed `available`.
    pub fn update_quantity(&mut self, product_id: &str, variants: &[SelectedVariant], quantity: u32, available: u32) -> Result<(), CartError> {
        let mut variants = variants.to_vec();
        variants.sort();
        let item = self.items.iter_mut().find(|i| i.same_line(product_id, &variants)).ok_or(CartError::ItemNotFound)?;
        if quantity == 0 {
            self.items.retain(|i| !i.same_line(product_id, &variants));
            self.raise_event(DomainEvent::Cart(CartEvent::ItemRemoved { cart_id: self.id.clone(), product_id: product_id.to_string() }));
        } else {
            if quantity > available {
                return Err(CartError::ExceedsStock { available, in_cart: 0 });
            }
            item.quantity = Quantity::new(quantity);
            self.raise_event(DomainEvent::Cart(CartEvent::QuantityChanged { cart_id: self.id.clone(), product_id: product_id.to_string(), quantity }));
        }
        self.recalculate();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str, variants: &[SelectedVariant]) -> Result<(), CartError> {
        self.update_quantity(product_id, variants, 0, 0)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.raise_event(DomainEvent::Cart(CartEvent::Cleared { cart_id: self.id.clone() }));
        self.recalculate();
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }

    fn recalculate(&mut self) {
        self.subtotal = self.items.iter().fold(Money::zero(&self.currency), |acc, i| acc.add(&i.line_total()).unwrap_or(acc));
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { ItemNotFound, CurrencyMismatch, ExceedsStock { available: u32, in_cart: u32 } }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound => write!(f, "Item not found"),
            Self::CurrencyMismatch => write!(f, "Currency mismatch"),
            Self::ExceedsStock { available, in_cart } => {
                write!(f, "Would exceed available stock. Max allowed: {}", available.saturating_sub(*in_cart))
            }
        }
    }
}
