//! Checkout totals: shipping by governorate and coupon discounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use crate::domain::aggregates::Coupon;
use crate::domain::value_objects::Money;
use crate::{Result, StorefrontError};

const DEFAULT_RATES: &[(&str, i64)] = &[
    ("Cairo", 50), ("Giza", 50), ("Qalyubia", 50),
    ("Alexandria", 75), ("Dakahlia", 75), ("Gharbia", 75), ("Menoufia", 75), ("Sharqia", 75),
    ("El-Beheira", 75), ("Damietta", 75), ("Ismailia", 75), ("Suez", 75), ("Port Said", 75),
    ("Kafr el-Sheikh", 75),
    ("Beni Suef", 100), ("Faiyum", 100), ("Minya", 100), ("Asyut", 100), ("Sohag", 100),
    ("Qena", 100), ("Luxor", 100), ("Aswan", 100),
    ("Red Sea", 150), ("Matrouh", 150), ("New Valley", 150), ("North Sinai", 150), ("South Sinai", 150),
];

/// Flat shipping rate per governorate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShippingRates(BTreeMap<String, Decimal>);

impl Default for ShippingRates {
    fn default() -> Self {
        Self(DEFAULT_RATES.iter().map(|(name, rate)| (name.to_string(), Decimal::from(*rate))).collect())
    }
}

impl ShippingRates {
    pub fn new(rates: BTreeMap<String, Decimal>) -> Self { Self(rates) }

    /// Unknown or missing governorates ship for free.
    pub fn rate_for(&self, governorate: Option<&str>) -> Decimal {
        governorate.and_then(|g| self.0.get(g)).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn governorates(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(name, rate)| (name.as_str(), *rate))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl CheckoutTotals {
    /// `total = subtotal - discount + shipping`. An unredeemable coupon is an
    /// error; a coupon below its minimum order amount simply grants nothing.
    pub fn compute(subtotal: &Money, shipping_rate: Decimal, coupon: Option<&Coupon>, now: DateTime<Utc>) -> Result<Self> {
        let currency = subtotal.currency();
        let discount = match coupon {
            Some(c) => {
                c.check_redeemable(now)?;
                Money::new(c.discount_for(subtotal.amount()), currency)
            }
            None => Money::zero(currency),
        };
        let shipping = Money::new(shipping_rate, currency);
        let total = subtotal.saturating_sub(&discount)
            .and_then(|net| net.add(&shipping))
            .map_err(|_| StorefrontError::CurrencyMismatch)?;
        Ok(Self {
            subtotal: subtotal.clone(),
            discount,
            shipping,
            total,
            coupon_code: coupon.map(|c| c.code().to_string()),
        })
    }
}
