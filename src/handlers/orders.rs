use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::checkout_service::CheckoutService;
use crate::errors::AppError;

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: i64,
    pub quantity: i32,
    /// Decimal amount as a string, e.g. "1000.00"
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub amount: String,
    pub method: String,
    pub status: String,
    pub transaction_id: String,
    pub mpesa_receipt: Option<String>,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub total: String,
    pub status: String,
    pub payment_status: String,
    pub checkout_request_id: Option<String>,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    pub payment: Option<PaymentResponse>,
}

// ── Handler ──────────────────────────────────────────────────────────────────

/// GET /orders/{id}
///
/// Returns the order with its items and payment record.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<CheckoutService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let service = service.into_inner();
    let order = web::block(move || service.find_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let Some(order) = order else {
        return Err(AppError::NotFound);
    };

    Ok(HttpResponse::Ok().json(OrderResponse {
        id: order.id,
        total: order.total.to_string(),
        status: order.status,
        payment_status: order.payment_status,
        checkout_request_id: order.checkout_request_id,
        created_at: order.created_at.to_rfc3339(),
        items: order
            .items
            .into_iter()
            .map(|item| OrderItemResponse {
                id: item.id,
                product_id: item.product_id,
                quantity: item.quantity,
                subtotal: item.subtotal.to_string(),
            })
            .collect(),
        payment: order.payment.map(|p| PaymentResponse {
            amount: p.amount.to_string(),
            method: p.method,
            status: p.status,
            transaction_id: p.transaction_id,
            mpesa_receipt: p.mpesa_receipt,
            failure_reason: p.failure_reason,
        }),
    }))
}
