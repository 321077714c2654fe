use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::checkout_service::CheckoutService;
use crate::domain::checkout::{CartItemInput, CheckoutInput};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartItemRequest {
    pub id: i64,
    pub quantity: i32,
    /// Unit price; number or decimal string, e.g. 500 or "9.99"
    #[schema(value_type = f64)]
    pub price: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Payment method: "cash" or "mpesa"
    pub method: String,
    /// Total amount; must equal the sum of the cart subtotals
    #[schema(value_type = f64)]
    pub amount: Value,
    pub cart: Vec<CartItemRequest>,
    /// Payer phone; required for mpesa, e.g. "0712345678"
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_request_id: Option<String>,
    pub message: String,
}

// ── Handler ──────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Creates the order together with its items and payment record; for
/// asynchronous methods a pending provider transaction is registered in the
/// same database transaction. Either every record becomes visible or none.
/// The provider itself is contacted later, via POST /payments/initiate.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created", body = CheckoutResponse),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn create_checkout(
    service: web::Data<CheckoutService>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = CheckoutInput {
        method: body.method,
        amount: body.amount,
        phone: body.phone,
        cart: body
            .cart
            .into_iter()
            .map(|item| CartItemInput {
                product_id: item.id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
    };

    let service = service.into_inner();
    let record = web::block(move || service.create_checkout(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        success: true,
        order_id: record.order_id,
        transaction_id: record.transaction_id,
        checkout_request_id: record.checkout_request_id,
        message: "Order created".to_string(),
    }))
}
