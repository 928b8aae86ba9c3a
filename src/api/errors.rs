use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::aggregates::CartError;
use crate::StorefrontError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": code, "message": message.into() }))).into_response()
}

impl From<validator::ValidationErrors> for StorefrontError {
    fn from(e: validator::ValidationErrors) -> Self { StorefrontError::Validation(e.to_string()) }
}

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            StorefrontError::IncompleteSelection { .. } | StorefrontError::UnknownOption { .. } => {
                (StatusCode::BAD_REQUEST, "incomplete_selection")
            }
            StorefrontError::InvalidQuantity => (StatusCode::BAD_REQUEST, "invalid_quantity"),
            StorefrontError::InsufficientStock { .. } | StorefrontError::Cart(CartError::ExceedsStock { .. }) => {
                (StatusCode::BAD_REQUEST, "insufficient_stock")
            }
            StorefrontError::UnexpectedVariants => (StatusCode::BAD_REQUEST, "unexpected_variants"),
            StorefrontError::UnknownGroup { .. } => (StatusCode::BAD_REQUEST, "unknown_group"),
            StorefrontError::InvalidProduct(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_product"),
            StorefrontError::Cart(CartError::ItemNotFound) | StorefrontError::CartNotFound => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            StorefrontError::Cart(CartError::CurrencyMismatch) | StorefrontError::CurrencyMismatch => {
                (StatusCode::UNPROCESSABLE_ENTITY, "currency_mismatch")
            }
            StorefrontError::Coupon(_) => (StatusCode::BAD_REQUEST, "invalid_coupon"),
            StorefrontError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        };
        json_error(status, code, self.to_string())
    }
}
