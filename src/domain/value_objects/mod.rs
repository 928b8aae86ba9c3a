//! Value Objects for storefront pricing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
    pub fn egp(amount: Decimal) -> Self { Self::new(amount, "EGP") }
    pub fn zero(currency: &str) -> Self { Self::new(Decimal::ZERO, currency) }
    pub fn amount(&self) -> Decimal { self.amount }
    pub fn currency(&self) -> &str { &self.currency }
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }
    /// Subtracts `other`, flooring at zero.
    pub fn saturating_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency { return Err(MoneyError::CurrencyMismatch); }
        Ok(Money::new((self.amount - other.amount).max(Decimal::ZERO), &self.currency))
    }
    pub fn multiply(&self, qty: u32) -> Money { Money::new(self.amount * Decimal::from(qty), &self.currency) }
    pub fn is_zero(&self) -> bool { self.amount.is_zero() }
}

impl Default for Money { fn default() -> Self { Self::zero("EGP") } }

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency, self.amount.round_dp(2))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { CurrencyMismatch }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Currency mismatch") }
}

/// Quantity value object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_money_add() {
        let a = Money::egp(Decimal::new(100, 0));
        let b = Money::egp(Decimal::new(50, 0));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150, 0));
    }
    #[test]
    fn test_money_currency_mismatch() {
        let a = Money::egp(Decimal::ONE);
        let b = Money::new(Decimal::ONE, "USD");
        assert_eq!(a.add(&b), Err(MoneyError::CurrencyMismatch));
    }
    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let a = Money::egp(Decimal::new(10, 0));
        let b = Money::egp(Decimal::new(25, 0));
        assert!(a.saturating_sub(&b).unwrap().is_zero());
    }
    #[test]
    fn test_display() { assert_eq!(Money::egp(Decimal::new(505, 1)).to_string(), "EGP50.50"); }
    #[test]
    fn test_quantity() {
        let q = Quantity::new(3);
        assert_eq!(q.add(2).value(), 5);
        assert_eq!(Quantity::new(u32::MAX).add(1).value(), u32::MAX);
    }
}
