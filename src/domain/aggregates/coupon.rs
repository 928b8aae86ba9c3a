//! Coupon Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use crate::domain::events::{CouponEvent, DomainEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType { Percentage, FixedAmount }

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(deserialize_with = "normalized_code")]
    code: String,
    discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    discount_value: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    min_order_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    max_discount_amount: Option<Decimal>,
    /// 0 means unlimited.
    #[serde(default = "default_usage_limit")]
    usage_limit: u32,
    #[serde(default)]
    times_used: u32,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(skip)]
    events: Vec<DomainEvent>,
}

fn default_usage_limit() -> u32 { 1 }
fn normalized_code<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(String::deserialize(d)?.trim().to_uppercase())
}
fn default_active() -> bool { true }

impl Coupon {
    pub fn create(code: &str, discount_type: DiscountType, discount_value: Decimal) -> Result<Self, CouponError> {
        let coupon = Self {
            code: code.trim().to_uppercase(), discount_type, discount_value, min_order_amount: Decimal::ZERO, max_discount_amount: None,
            usage_limit: default_usage_limit(), times_used: 0, expires_at: None, is_active: true, events: vec![],
        };
        coupon.validate()?;
        Ok(coupon)
    }

    pub fn with_min_order(mut self, amount: Decimal) -> Self { self.min_order_amount = amount; self }
    pub fn with_max_discount(mut self, amount: Decimal) -> Self { self.max_discount_amount = Some(amount); self }
    pub fn with_usage_limit(mut self, limit: u32) -> Self { self.usage_limit = limit; self }
    pub fn with_expiry(mut self, at: DateTime<Utc>) -> Self { self.expires_at = Some(at); self }
    pub fn deactivate(&mut self) { self.is_active = false; }

    pub fn code(&self) -> &str { &self.code }
    pub fn discount_type(&self) -> DiscountType { self.discount_type }
    pub fn times_used(&self) -> u32 { self.times_used }

    pub fn validate(&self) -> Result<(), CouponError> {
        if self.code.is_empty() { return Err(CouponError::EmptyCode); }
        if self.discount_value.is_sign_negative() { return Err(CouponError::InvalidValue); }
        if self.discount_type == DiscountType::Percentage && self.discount_value > Decimal::ONE_HUNDRED {
            return Err(CouponError::InvalidValue);
        }
        Ok(())
    }

    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), CouponError> {
        if !self.is_active { return Err(CouponError::Inactive); }
        if self.expires_at.is_some_and(|at| now > at) { return Err(CouponError::Expired); }
        if self.usage_limit != 0 && self.times_used >= self.usage_limit { return Err(CouponError::UsageLimitReached); }
        Ok(())
    }

    /// Discount granted on `subtotal`; zero below the minimum order amount,
    /// never more than the subtotal itself.
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal < self.min_order_amount { return Decimal::ZERO; }
        let discount = match self.discount_type {
            DiscountType::Percentage => {
                let pct = subtotal * self.discount_value / Decimal::ONE_HUNDRED;
                self.max_discount_amount.filter(|cap| !cap.is_zero()).map_or(pct, |cap| pct.min(cap))
            }
            DiscountType::FixedAmount => self.discount_value,
        };
        discount.min(subtotal)
    }

    pub fn redeem(&mut self, now: DateTime<Utc>) -> Result<(), CouponError> {
        self.check_redeemable(now)?;
        self.times_used += 1;
        self.events.push(DomainEvent::Coupon(CouponEvent::Redeemed { code: self.code.clone(), times_used: self.times_used }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CouponError { EmptyCode, InvalidValue, Inactive, Expired, UsageLimitReached }
impl std::error::Error for CouponError {}
impl std::fmt::Display for CouponError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "Coupon code is required"),
            Self::InvalidValue => write!(f, "Percentage discount value must be between 0 and 100"),
            Self::Inactive => write!(f, "Coupon is inactive"),
            Self::Expired => write!(f, "Coupon has expired"),
            Self::UsageLimitReached => write!(f, "Coupon has reached its usage limit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_code_normalized() {
        let c = Coupon::create("  summer10 ", DiscountType::Percentage, Decimal::new(10, 0)).unwrap();
        assert_eq!(c.code(), "SUMMER10");
    }

    #[test]
    fn test_deserialized_code_normalized_and_validated() {
        let c: Coupon = serde_json::from_str(r#"{"code":" save10 ","discountType":"fixed_amount","discountValue":10}"#).unwrap();
        assert_eq!(c.code(), "SAVE10");
        assert_eq!(c.validate(), Ok(()));
        let blank: Coupon = serde_json::from_str(r#"{"code":"  ","discountType":"fixed_amount","discountValue":10}"#).unwrap();
        assert_eq!(blank.validate(), Err(CouponError::EmptyCode));
        let over: Coupon = serde_json::from_str(r#"{"code":"x","discountType":"percentage","discountValue":150}"#).unwrap();
        assert_eq!(over.validate(), Err(CouponError::InvalidValue));
    }

    #[test]
    fn test_percentage_out_of_range() {
        assert_eq!(Coupon::create("X", DiscountType::Percentage, Decimal::new(150, 0)).unwrap_err(), CouponError::InvalidValue);
    }

    #[test]
    fn test_percentage_capped() {
        let c = Coupon::create("X", DiscountType::Percentage, Decimal::new(20, 0)).unwrap().with_max_discount(Decimal::new(30, 0));
        assert_eq!(c.discount_for(Decimal::new(100, 0)), Decimal::new(20, 0));
        assert_eq!(c.discount_for(Decimal::new(500, 0)), Decimal::new(30, 0));
    }

    #[test]
    fn test_fixed_never_exceeds_subtotal_and_respects_minimum() {
        let c = Coupon::create("X", DiscountType::FixedAmount, Decimal::new(50, 0)).unwrap().with_min_order(Decimal::new(40, 0));
        assert_eq!(c.discount_for(Decimal::new(30, 0)), Decimal::ZERO);
        assert_eq!(c.discount_for(Decimal::new(45, 0)), Decimal::new(45, 0));
        assert_eq!(c.discount_for(Decimal::new(80, 0)), Decimal::new(50, 0));
    }

    #[test]
    fn test_redeem_until_limit() {
        let now = Utc::now();
        let mut c = Coupon::create("X", DiscountType::FixedAmount, Decimal::TEN).unwrap().with_usage_limit(2);
        c.redeem(now).unwrap();
        c.redeem(now).unwrap();
        assert_eq!(c.redeem(now), Err(CouponError::UsageLimitReached));
        assert_eq!(c.take_events().len(), 2);
    }

    #[test]
    fn test_unlimited_expired_and_inactive() {
        let now = Utc::now();
        let mut c = Coupon::create("X", DiscountType::FixedAmount, Decimal::TEN).unwrap().with_usage_limit(0);
        for _ in 0..5 { c.redeem(now).unwrap(); }
        let expired = c.clone().with_expiry(now - Duration::days(1));
        assert_eq!(expired.check_redeemable(now), Err(CouponError::Expired));
        c.deactivate();
        assert_eq!(c.check_redeemable(now), Err(CouponError::Inactive));
    }
}
