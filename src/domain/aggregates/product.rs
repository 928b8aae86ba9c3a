//! Product Aggregate
//!
//! Read-only view of a catalog product as delivered by the backend, including
//! its variant groups. Variant stock is tracked per option value, never per
//! combination.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use crate::resolver::ResolvedVariant;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, alias = "_id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    base_price: Decimal,
    #[serde(rename = "stock", default)]
    base_stock: u32,
    #[serde(rename = "imageUrl", default)]
    base_image_url: String,
    #[serde(default)]
    image_urls: Vec<String>,
    #[serde(rename = "variants", default)]
    variant_groups: Vec<VariantGroup>,
    #[serde(default)]
    is_on_flash_sale: bool,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    flash_sale_price: Option<Decimal>,
    #[serde(default)]
    flash_sale_end_date: Option<DateTime<Utc>>,
}

/// A named axis of customization, e.g. "Color".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<VariantOption>,
}

/// One concrete value within a group, with its own price delta, stock and image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    pub value: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price_adjustment: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub image_url: String,
}

impl VariantGroup {
    pub fn new(name: impl Into<String>, options: Vec<VariantOption>) -> Self {
        Self { name: name.into(), options }
    }
    pub fn option(&self, value: &str) -> Option<&VariantOption> { self.options.iter().find(|o| o.value == value) }
    pub fn first_option(&self) -> Option<&VariantOption> { self.options.first() }
}

impl VariantOption {
    pub fn new(value: impl Into<String>, price_adjustment: Decimal, stock: u32) -> Self {
        Self { value: value.into(), price_adjustment, stock, image_url: String::new() }
    }
    pub fn with_image(mut self, url: impl Into<String>) -> Self { self.image_url = url.into(); self }
}

impl Product {
    pub fn new(name: impl Into<String>, base_price: Decimal, base_stock: u32, base_image_url: impl Into<String>) -> Self {
        Self {
            id: String::new(), name: name.into(), base_price, base_stock, base_image_url: base_image_url.into(),
            image_urls: vec![], variant_groups: vec![], is_on_flash_sale: false, flash_sale_price: None,
            flash_sale_end_date: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self { self.id = id.into(); self }
    pub fn with_variant_group(mut self, group: VariantGroup) -> Self { self.variant_groups.push(group); self }
    pub fn with_image_urls(mut self, urls: Vec<String>) -> Self { self.image_urls = urls; self }
    pub fn with_flash_sale(mut self, price: Decimal, ends_at: DateTime<Utc>) -> Self {
        self.is_on_flash_sale = true;
        self.flash_sale_price = Some(price);
        self.flash_sale_end_date = Some(ends_at);
        self
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn base_price(&self) -> Decimal { self.base_price }
    pub fn base_stock(&self) -> u32 { self.base_stock }
    pub fn base_image_url(&self) -> &str { &self.base_image_url }
    pub fn variant_groups(&self) -> &[VariantGroup] { &self.variant_groups }
    pub fn has_variants(&self) -> bool { !self.variant_groups.is_empty() }
    pub fn variant_group(&self, name: &str) -> Option<&VariantGroup> { self.variant_groups.iter().find(|g| g.name == name) }

    /// Flash sale price while the sale is running, base price otherwise.
    /// A sale without an end date never counts as running.
    pub fn effective_base_price(&self, now: DateTime<Utc>) -> Decimal {
        match (self.is_on_flash_sale, self.flash_sale_price, self.flash_sale_end_date) {
            (true, Some(price), Some(ends_at)) if ends_at > now => price,
            _ => self.base_price,
        }
    }

    /// Price charged per unit for a resolved combination at `now`.
    pub fn unit_price(&self, resolved: &ResolvedVariant, now: DateTime<Utc>) -> Decimal {
        self.effective_base_price(now) + resolved.price_adjustment()
    }

    /// Unique image URLs: main image, extra images, then option images in declared order.
    pub fn gallery_image_urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(self.base_image_url.as_str())
            .chain(self.image_urls.iter().map(String::as_str))
            .chain(self.variant_groups.iter().flat_map(|g| g.options.iter().map(|o| o.image_url.as_str())))
            .filter(|url| !url.is_empty() && seen.insert(*url))
            .map(str::to_string)
            .collect()
    }

    /// Structural checks on variant data received from the backend.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.base_price.is_sign_negative() { return Err(ProductError::NegativePrice); }
        let mut groups = HashSet::new();
        for group in &self.variant_groups {
            if !groups.insert(group.name.as_str()) { return Err(ProductError::DuplicateGroup(group.name.clone())); }
            if group.options.is_empty() { return Err(ProductError::EmptyGroup(group.name.clone())); }
            let mut values = HashSet::new();
            for option in &group.options {
                if !values.insert(option.value.as_str()) {
                    return Err(ProductError::DuplicateOption { group: group.name.clone(), value: option.value.clone() });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductError { NegativePrice, DuplicateGroup(String), EmptyGroup(String), DuplicateOption { group: String, value: String } }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativePrice => write!(f, "Price cannot be negative"),
            Self::DuplicateGroup(g) => write!(f, "Duplicate variant group '{g}'"),
            Self::EmptyGroup(g) => write!(f, "Variant group '{g}' has no options"),
            Self::DuplicateOption { group, value } => write!(f, "Duplicate option '{value}' in group '{group}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tshirt() -> Product {
        Product::new("T-Shirt", Decimal::new(200, 0), 0, "/img/main.jpg")
            .with_image_urls(vec!["/img/back.jpg".into(), "/img/main.jpg".into()])
            .with_variant_group(VariantGroup::new("Color", vec![
                VariantOption::new("Red", Decimal::ZERO, 3).with_image("/img/red.jpg"),
                VariantOption::new("Blue", Decimal::new(5, 0), 0),
            ]))
            .with_variant_group(VariantGroup::new("Size", vec![
                VariantOption::new("S", Decimal::ZERO, 10),
                VariantOption::new("M", Decimal::new(2, 0), 1).with_image("/img/red.jpg"),
            ]))
    }

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "_id": "p1", "name": "Mug", "price": 99.5, "stock": 4, "imageUrl": "/m.jpg",
            "variants": [{ "name": "Color", "options": [{ "value": "Red", "priceAdjustment": 2.5, "stock": 3 }] }]
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id(), "p1");
        assert_eq!(p.base_price(), Decimal::new(995, 1));
        let red = p.variant_group("Color").unwrap().option("Red").unwrap();
        assert_eq!(red.price_adjustment, Decimal::new(25, 1));
        assert_eq!(red.image_url, "");
    }

    #[test]
    fn test_gallery_is_unique_and_ordered() {
        assert_eq!(tshirt().gallery_image_urls(), vec!["/img/main.jpg", "/img/back.jpg", "/img/red.jpg"]);
    }

    #[test]
    fn test_flash_sale_only_while_running() {
        let now = Utc::now();
        let running = tshirt().with_flash_sale(Decimal::new(150, 0), now + Duration::hours(1));
        assert_eq!(running.effective_base_price(now), Decimal::new(150, 0));
        let ended = tshirt().with_flash_sale(Decimal::new(150, 0), now - Duration::hours(1));
        assert_eq!(ended.effective_base_price(now), Decimal::new(200, 0));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        assert!(tshirt().validate().is_ok());
        let dup = tshirt().with_variant_group(VariantGroup::new("Size", vec![VariantOption::new("L", Decimal::ZERO, 1)]));
        assert_eq!(dup.validate(), Err(ProductError::DuplicateGroup("Size".into())));
        let empty = tshirt().with_variant_group(VariantGroup::new("Fit", vec![]));
        assert_eq!(empty.validate(), Err(ProductError::EmptyGroup("Fit".into())));
    }
}
