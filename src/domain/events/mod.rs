//! Domain events

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Cart(CartEvent),
    Coupon(CouponEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    ItemAdded { cart_id: String, product_id: String, quantity: u32 },
    QuantityChanged { cart_id: String, product_id: String, quantity: u32 },
    ItemRemoved { cart_id: String, product_id: String },
    Cleared { cart_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CouponEvent {
    Redeemed { code: String, times_used: u32 },
}
