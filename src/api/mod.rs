//! HTTP surface over the resolver, carts and checkout.
//!
//! Carts live in process memory keyed by session id; products and coupons
//! arrive inline in each request as delivered by the catalog backend.

pub mod dto;
pub mod errors;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::checkout::{CheckoutTotals, ShippingRates};
use crate::config::Config;
use crate::domain::aggregates::{Cart, CartItem};
use crate::domain::selection::Selection;
use crate::domain::value_objects::Money;
use crate::resolver::{self, Resolution};
use crate::{Result, StorefrontError};
use dto::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub shipping: Arc<ShippingRates>,
    pub carts: Arc<RwLock<HashMap<String, Cart>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config), shipping: Arc::new(ShippingRates::default()), carts: Arc::default() }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-pricing"})) }))
        .route("/api/v1/products/view", post(view_product))
        .route("/api/v1/variants/resolve", post(resolve_variant))
        .route("/api/v1/variants/clamp", post(clamp_quantity))
        .route("/api/v1/cart/:session", get(get_cart).post(add_to_cart).put(update_cart).delete(clear_cart))
        .route("/api/v1/shipping/governorates", get(list_governorates))
        .route("/api/v1/checkout/totals", post(checkout_totals))
        .with_state(state)
}

async fn view_product(Json(r): Json<ViewProductRequest>) -> Result<Json<ProductView>> {
    r.product.validate()?;
    let selection = r.selection.unwrap_or_else(|| Selection::defaults_for(&r.product));
    let resolution = resolver::resolve(&r.product, &selection);
    let (stock_label, quantity) = match &resolution {
        Resolution::Resolved(v) => (Some(v.stock_label()), resolver::clamp_quantity(1, v)),
        Resolution::Incomplete(_) => (None, 0),
    };
    Ok(Json(ProductView { gallery: r.product.gallery_image_urls(), selection, resolution, stock_label, quantity }))
}

async fn resolve_variant(Json(r): Json<ResolveRequest>) -> Result<Json<Resolution>> {
    r.product.validate()?;
    Ok(Json(resolver::resolve(&r.product, &r.selection)))
}

async fn clamp_quantity(Json(r): Json<ClampRequest>) -> Json<ClampResponse> {
    Json(ClampResponse { quantity: resolver::clamp_to_stock(r.requested, r.stock) })
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<Json<Cart>> {
    s.carts.read().await.get(&session).cloned().map(Json).ok_or(StorefrontError::CartNotFound)
}

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<Cart>)> {
    r.validate()?;
    r.product.validate()?;
    let resolution = resolver::resolve(&r.product, &r.selection);
    let quantity = resolver::check_purchase(&resolution, r.quantity).map_err(|e| {
        tracing::warn!(product_id = r.product.id(), error = %e, "add to cart blocked");
        e
    })?;
    let payload = resolver::cart_payload(&r.product, quantity, &r.selection)?;
    let resolved = resolution.into_result().map_err(StorefrontError::from)?;

    let currency = s.config.currency.clone();
    let unit_price = Money::new(r.product.unit_price(&resolved, Utc::now()), &currency);
    let item = CartItem::new(payload.product_id, r.product.name(), payload.quantity, unit_price, payload.selected_variant.unwrap_or_default())
        .with_variant_details(resolved.price_adjustment(), resolved.image_url());

    let mut carts = s.carts.write().await;
    let cart = carts.entry(session.clone()).or_insert_with(|| Cart::for_session(&session, &currency));
    cart.add_item(item, resolved.stock()).map_err(|e| {
        tracing::warn!(session = %session, error = %e, "cart addition rejected");
        StorefrontError::from(e)
    })?;
    for event in cart.take_events() {
        tracing::info!(?event, "cart event");
    }
    Ok((StatusCode::CREATED, Json(cart.clone())))
}

async fn update_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<UpdateCartRequest>) -> Result<Json<Cart>> {
    r.validate()?;
    r.product.validate()?;
    let variants = resolver::cart_payload(&r.product, 0, &r.selection)?.selected_variant.unwrap_or_default();

    let mut carts = s.carts.write().await;
    let cart = carts.get_mut(&session).ok_or(StorefrontError::CartNotFound)?;
    let previous = cart.quantity_of(r.product.id(), &variants);
    if r.quantity == 0 {
        cart.remove_item(r.product.id(), &variants)?;
    } else {
        let resolution = resolver::resolve(&r.product, &r.selection);
        let quantity = resolver::check_purchase(&resolution, r.quantity)?;
        let resolved = resolution.into_result().map_err(StorefrontError::from)?;
        cart.update_quantity(r.product.id(), &variants, quantity, resolved.stock())?;
    }
    tracing::info!(session = %session, product_id = r.product.id(), previous, quantity = r.quantity, "cart line updated");
    for event in cart.take_events() {
        tracing::info!(?event, "cart event");
    }
    Ok(Json(cart.clone()))
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> Result<StatusCode> {
    let mut carts = s.carts.write().await;
    let cart = carts.get_mut(&session).ok_or(StorefrontError::CartNotFound)?;
    cart.clear();
    for event in cart.take_events() {
        tracing::info!(?event, "cart event");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_governorates(State(s): State<AppState>) -> Json<Vec<GovernorateRate>> {
    Json(s.shipping.governorates().map(|(name, rate)| GovernorateRate { name: name.to_string(), rate }).collect())
}

async fn checkout_totals(State(s): State<AppState>, Json(r): Json<CheckoutRequest>) -> Result<Json<CheckoutResponse>> {
    r.validate()?;
    let carts = s.carts.read().await;
    let cart = carts.get(&r.session).ok_or(StorefrontError::CartNotFound)?;
    if let Some(coupon) = &r.coupon {
        coupon.validate()?;
    }
    let rate = s.shipping.rate_for(r.governorate.as_deref());
    let totals = CheckoutTotals::compute(cart.subtotal(), rate, r.coupon.as_ref(), Utc::now())?;
    Ok(Json(totals))
}
