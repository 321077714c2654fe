use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What the checkout transaction hands back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct CheckoutRecord {
    pub order_id: Uuid,
    pub transaction_id: String,
    pub checkout_request_id: Option<String>,
}

/// Stored details needed to push a payment request to the provider.
#[derive(Debug, Clone)]
pub struct InitiationDetails {
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub phone: String,
    pub checkout_request_id: String,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PaymentView {
    pub amount: BigDecimal,
    pub method: String,
    pub status: String,
    pub transaction_id: String,
    pub mpesa_receipt: Option<String>,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub total: BigDecimal,
    pub status: String,
    pub payment_status: String,
    pub checkout_request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
    pub payment: Option<PaymentView>,
}
