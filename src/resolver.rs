//! Variant resolution.
//!
//! Folds a [`Selection`] over a product's variant groups into the effective
//! price, image and stock of the chosen combination. Everything here is pure:
//! no I/O, no shared state, same inputs give the same output.
//!
//! Stock of a combination is the minimum of the chosen options' own stock
//! counters. The catalog does not track stock per combination, so the minimum
//! is the figure that can never oversell.

use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::aggregates::Product;
use crate::domain::selection::{SelectedVariant, Selection};
use crate::{Result, StorefrontError};

/// Net effect of a complete selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariant {
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    price_adjustment: Decimal,
    stock: u32,
    image_url: String,
    is_complete: bool,
}

/// Why a selection could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteSelection {
    group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    is_complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Resolution {
    Resolved(ResolvedVariant),
    Incomplete(IncompleteSelection),
}

impl ResolvedVariant {
    pub fn price(&self) -> Decimal { self.price }
    pub fn price_adjustment(&self) -> Decimal { self.price_adjustment }
    pub fn stock(&self) -> u32 { self.stock }
    pub fn image_url(&self) -> &str { &self.image_url }
    pub fn is_complete(&self) -> bool { self.is_complete }
    pub fn is_available(&self) -> bool { self.stock > 0 }

    pub fn stock_label(&self) -> String {
        if self.is_available() { format!("In Stock: {}", self.stock) } else { "Out of Stock".to_string() }
    }
}

impl IncompleteSelection {
    fn missing(group: &str) -> Self { Self { group: group.to_string(), value: None, is_complete: false } }
    fn unknown(group: &str, value: &str) -> Self {
        Self { group: group.to_string(), value: Some(value.to_string()), is_complete: false }
    }

    pub fn group(&self) -> &str { &self.group }
    /// The rejected value, when one was chosen but matches no option.
    pub fn value(&self) -> Option<&str> { self.value.as_deref() }
}

impl From<IncompleteSelection> for StorefrontError {
    fn from(e: IncompleteSelection) -> Self {
        match e.value {
            Some(value) => StorefrontError::UnknownOption { group: e.group, value },
            None => StorefrontError::IncompleteSelection { group: e.group },
        }
    }
}

impl Resolution {
    pub fn is_complete(&self) -> bool { matches!(self, Self::Resolved(_)) }

    pub fn resolved(&self) -> Option<&ResolvedVariant> {
        match self {
            Self::Resolved(r) => Some(r),
            Self::Incomplete(_) => None,
        }
    }

    pub fn into_result(self) -> std::result::Result<ResolvedVariant, IncompleteSelection> {
        match self {
            Self::Resolved(r) => Ok(r),
            Self::Incomplete(i) => Err(i),
        }
    }
}

/// Resolves `selection` against `product`.
///
/// Products without variant groups resolve to their base figures whatever the
/// selection holds. Otherwise every group must have a chosen value matching
/// one of its options; the first group that fails stops the fold.
pub fn resolve(product: &Product, selection: &Selection) -> Resolution {
    if !product.has_variants() {
        return Resolution::Resolved(ResolvedVariant {
            price: product.base_price(),
            price_adjustment: Decimal::ZERO,
            stock: product.base_stock(),
            image_url: product.base_image_url().to_string(),
            is_complete: true,
        });
    }

    let mut adjustment = Decimal::ZERO;
    let mut stock: Option<u32> = None;
    let mut image: Option<&str> = None;

    for group in product.variant_groups() {
        let Some(chosen) = selection.get(&group.name) else {
            tracing::debug!(group = %group.name, "selection does not cover variant group");
            return Resolution::Incomplete(IncompleteSelection::missing(&group.name));
        };
        let Some(option) = group.option(chosen) else {
            tracing::debug!(group = %group.name, value = chosen, "selected value matches no option");
            return Resolution::Incomplete(IncompleteSelection::unknown(&group.name, chosen));
        };
        adjustment += option.price_adjustment;
        stock = Some(stock.map_or(option.stock, |s| s.min(option.stock)));
        // later groups override earlier ones
        if !option.image_url.is_empty() {
            image = Some(option.image_url.as_str());
        }
    }

    Resolution::Resolved(ResolvedVariant {
        price: product.base_price() + adjustment,
        price_adjustment: adjustment,
        stock: stock.unwrap_or(0),
        image_url: image.unwrap_or(product.base_image_url()).to_string(),
        is_complete: true,
    })
}

/// Clamps a requested quantity into `[1, stock]`, or 0 when nothing is in stock.
pub fn clamp_quantity(requested: i64, resolved: &ResolvedVariant) -> u32 {
    clamp_to_stock(requested, resolved.stock())
}

pub(crate) fn clamp_to_stock(requested: i64, stock: u32) -> u32 {
    if stock == 0 {
        return 0;
    }
    requested.clamp(1, i64::from(stock)) as u32
}

/// Gate for "add to cart" and "buy now": the selection must be complete and
/// the requested quantity must be between 1 and the available stock.
pub fn check_purchase(resolution: &Resolution, requested: i64) -> Result<u32> {
    let resolved = match resolution {
        Resolution::Resolved(r) => r,
        Resolution::Incomplete(i) => return Err(i.clone().into()),
    };
    if requested < 1 {
        return Err(StorefrontError::InvalidQuantity);
    }
    let available = resolved.stock();
    if requested > i64::from(available) {
        return Err(StorefrontError::InsufficientStock { available, requested: requested.min(i64::from(u32::MAX)) as u32 });
    }
    Ok(requested as u32)
}

/// Body sent to the cart collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub product_id: String,
    pub quantity: u32,
    pub selected_variant: Option<Vec<SelectedVariant>>,
}

/// Builds the cart submission for a purchase that passed [`check_purchase`].
///
/// `resolve` ignores choices for groups the product does not declare; a cart
/// line may not carry them, since they would become part of its identity.
pub fn cart_payload(product: &Product, quantity: u32, selection: &Selection) -> Result<CartPayload> {
    let selected_variant = if product.has_variants() {
        if let Some(group) = selection.groups().find(|g| product.variant_group(g).is_none()) {
            return Err(StorefrontError::UnknownGroup { group: group.to_string() });
        }
        Some(selection.to_selected_variants())
    } else if !selection.is_empty() {
        return Err(StorefrontError::UnexpectedVariants);
    } else {
        None
    };
    Ok(CartPayload { product_id: product.id().to_string(), quantity, selected_variant })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{VariantGroup, VariantOption};

    fn base() -> Decimal { Decimal::new(100, 0) }

    fn shirt() -> Product {
        Product::new("Shirt", base(), 7, "/base.jpg")
            .with_id("p1")
            .with_variant_group(VariantGroup::new("Color", vec![
                VariantOption::new("Red", Decimal::ZERO, 3).with_image("/red.jpg"),
                VariantOption::new("Blue", Decimal::new(5, 0), 0).with_image("/blue.jpg"),
            ]))
            .with_variant_group(VariantGroup::new("Size", vec![
                VariantOption::new("S", Decimal::ZERO, 10),
                VariantOption::new("M", Decimal::new(2, 0), 1).with_image("/m.jpg"),
            ]))
    }

    fn resolved(stock: u32) -> ResolvedVariant {
        ResolvedVariant { price: base(), price_adjustment: Decimal::ZERO, stock, image_url: String::new(), is_complete: true }
    }

    #[test]
    fn test_no_variants_ignores_selection() {
        let p = Product::new("Mug", base(), 4, "/mug.jpg");
        let r = resolve(&p, &Selection::new().with("Color", "Nope")).into_result().unwrap();
        assert_eq!(r.price(), base());
        assert_eq!(r.stock(), 4);
        assert_eq!(r.image_url(), "/mug.jpg");
        assert!(r.is_complete());
    }

    #[test]
    fn test_blue_medium_is_complete_but_out_of_stock() {
        let sel = Selection::new().with("Color", "Blue").with("Size", "M");
        let resolution = resolve(&shirt(), &sel);
        let r = resolution.resolved().unwrap();
        assert_eq!(r.price(), Decimal::new(107, 0));
        assert_eq!(r.stock(), 0);
        assert!(r.is_complete());
        assert!(matches!(check_purchase(&resolution, 1), Err(StorefrontError::InsufficientStock { available: 0, requested: 1 })));
    }

    #[test]
    fn test_stock_is_minimum_of_options() {
        let r = resolve(&shirt(), &Selection::new().with("Color", "Red").with("Size", "S")).into_result().unwrap();
        assert_eq!(r.stock(), 3);
        assert_eq!(r.price(), base());
    }

    #[test]
    fn test_last_group_image_wins() {
        let r = resolve(&shirt(), &Selection::new().with("Color", "Red").with("Size", "M")).into_result().unwrap();
        assert_eq!(r.image_url(), "/m.jpg");
        let r = resolve(&shirt(), &Selection::new().with("Color", "Red").with("Size", "S")).into_result().unwrap();
        assert_eq!(r.image_url(), "/red.jpg");
    }

    #[test]
    fn test_falls_back_to_base_image() {
        let p = Product::new("Cap", base(), 0, "/cap.jpg")
            .with_variant_group(VariantGroup::new("Size", vec![VariantOption::new("One", Decimal::ZERO, 2)]));
        let r = resolve(&p, &Selection::defaults_for(&p)).into_result().unwrap();
        assert_eq!(r.image_url(), "/cap.jpg");
    }

    #[test]
    fn test_missing_group_is_incomplete() {
        let resolution = resolve(&shirt(), &Selection::new().with("Color", "Red"));
        assert!(!resolution.is_complete());
        let err = resolution.into_result().unwrap_err();
        assert_eq!(err.group(), "Size");
        assert_eq!(err.value(), None);
    }

    #[test]
    fn test_unknown_value_is_incomplete() {
        let err = resolve(&shirt(), &Selection::new().with("Color", "Green").with("Size", "S")).into_result().unwrap_err();
        assert_eq!(err.group(), "Color");
        assert_eq!(err.value(), Some("Green"));
    }

    #[test]
    fn test_incomplete_serializes_flag() {
        let json = serde_json::to_value(resolve(&shirt(), &Selection::new())).unwrap();
        assert_eq!(json["isComplete"], false);
        assert_eq!(json["group"], "Color");
    }

    #[test]
    fn test_extra_groups_are_ignored_by_resolve() {
        let sel = Selection::new().with("Color", "Red").with("Size", "S").with("Material", "Bogus");
        let r = resolve(&shirt(), &sel).into_result().unwrap();
        assert_eq!(r.stock(), 3);
        assert_eq!(r.price(), base());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let sel = Selection::defaults_for(&shirt());
        assert_eq!(resolve(&shirt(), &sel), resolve(&shirt(), &sel));
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(0, &resolved(5)), 1);
        assert_eq!(clamp_quantity(-3, &resolved(5)), 1);
        assert_eq!(clamp_quantity(10, &resolved(5)), 5);
        assert_eq!(clamp_quantity(3, &resolved(0)), 0);
        assert_eq!(clamp_quantity(4, &resolved(5)), 4);
    }

    #[test]
    fn test_check_purchase_blocks_incomplete_and_invalid() {
        let incomplete = resolve(&shirt(), &Selection::new().with("Color", "Red"));
        assert!(matches!(check_purchase(&incomplete, 1), Err(StorefrontError::IncompleteSelection { .. })));
        let ok = resolve(&shirt(), &Selection::new().with("Color", "Red").with("Size", "S"));
        assert!(matches!(check_purchase(&ok, 0), Err(StorefrontError::InvalidQuantity)));
        assert_eq!(check_purchase(&ok, 3).unwrap(), 3);
        assert!(matches!(check_purchase(&ok, 4), Err(StorefrontError::InsufficientStock { available: 3, requested: 4 })));
    }

    #[test]
    fn test_cart_payload() {
        let sel = Selection::new().with("Size", "S").with("Color", "Red");
        let payload = cart_payload(&shirt(), 2, &sel).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["selectedVariant"][0]["name"], "Color");

        let mug = Product::new("Mug", base(), 4, "");
        assert_eq!(cart_payload(&mug, 1, &Selection::new()).unwrap().selected_variant, None);
        assert!(matches!(cart_payload(&mug, 1, &sel), Err(StorefrontError::UnexpectedVariants)));
    }

    #[test]
    fn test_cart_payload_rejects_foreign_group() {
        let sel = Selection::new().with("Color", "Red").with("Size", "S").with("Material", "Bogus");
        let resolution = resolve(&shirt(), &sel);
        assert_eq!(check_purchase(&resolution, 1).unwrap(), 1);
        let err = cart_payload(&shirt(), 1, &sel).unwrap_err();
        assert!(matches!(err, StorefrontError::UnknownGroup { ref group } if group == "Material"));
        assert_eq!(err.to_string(), "Variant group 'Material' not found for product");
    }
}
