//! Checkout planning: turns a validated request into the exact set of
//! records the store writes in one atomic unit, including the state machine
//! decisions for the chosen payment method.

use bigdecimal::BigDecimal;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::errors::DomainError;
use super::normalize;

pub const ORDER_PENDING: &str = "pending";
pub const ORDER_PROCESSING: &str = "processing";
pub const ORDER_COMPLETED: &str = "completed";
pub const ORDER_FAILED: &str = "failed";

pub const PAYMENT_UNPAID: &str = "unpaid";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_FAILED: &str = "failed";

pub const RECORD_PENDING: &str = "pending";
pub const RECORD_INITIATED: &str = "initiated";
pub const RECORD_COMPLETED: &str = "completed";
pub const RECORD_FAILED: &str = "failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Mpesa,
}

impl PaymentMethod {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "mpesa" | "mobile-money" => Ok(PaymentMethod::Mpesa),
            other => Err(DomainError::Validation(format!(
                "unsupported payment method '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Mpesa => "mpesa",
        }
    }

    /// Methods confirmed out of band by a provider callback.
    pub fn is_asynchronous(&self) -> bool {
        matches!(self, PaymentMethod::Mpesa)
    }
}

/// Raw checkout request, as received by the HTTP layer. Amounts stay as JSON
/// values here so the normalizer owns all money parsing.
#[derive(Debug, Clone)]
pub struct CheckoutInput {
    pub method: String,
    pub amount: Value,
    pub phone: Option<String>,
    pub cart: Vec<CartItemInput>,
}

#[derive(Debug, Clone)]
pub struct CartItemInput {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Value,
}

#[derive(Debug, Clone)]
pub struct PlannedItem {
    pub product_id: i64,
    pub quantity: i32,
    pub subtotal: BigDecimal,
}

/// Everything needed to register the pending provider transaction alongside
/// the order. The correlation token is generated locally, before the
/// provider is ever contacted, so a provider outage never blocks order
/// durability.
#[derive(Debug, Clone)]
pub struct PushPlan {
    pub phone: String,
    pub amount: BigDecimal,
    pub checkout_request_id: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutPlan {
    pub order_id: Uuid,
    pub method: PaymentMethod,
    pub total: BigDecimal,
    pub order_status: &'static str,
    pub payment_state: &'static str,
    pub transaction_id: String,
    pub phone: Option<String>,
    pub items: Vec<PlannedItem>,
    pub push: Option<PushPlan>,
}

/// Validate a checkout request and decide the initial state of every record.
///
/// Cash settles out of band: order `pending`, payment `pending`, no pending
/// provider transaction. Asynchronous methods: order `processing`, payment
/// `initiated`, plus a pending provider transaction carrying a fresh
/// correlation token.
pub fn plan_checkout(input: &CheckoutInput) -> Result<CheckoutPlan, DomainError> {
    let method = PaymentMethod::parse(&input.method)?;
    let declared = normalize::parse_positive_amount(&input.amount, "amount")?;

    if input.cart.is_empty() {
        return Err(DomainError::validation("cart must not be empty"));
    }

    let mut total = BigDecimal::from(0);
    let mut items = Vec::with_capacity(input.cart.len());
    for item in &input.cart {
        if item.quantity <= 0 {
            return Err(DomainError::Validation(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }
        let price = normalize::parse_price(&item.price, "price")?;
        let subtotal = price * BigDecimal::from(item.quantity);
        total += subtotal.clone();
        items.push(PlannedItem {
            product_id: item.product_id,
            quantity: item.quantity,
            subtotal,
        });
    }

    if total != declared {
        return Err(DomainError::Validation(format!(
            "amount {declared} does not match cart total {total}"
        )));
    }

    let phone = match method {
        PaymentMethod::Mpesa => {
            let raw = input
                .phone
                .as_deref()
                .ok_or_else(|| DomainError::validation("phone number is required"))?;
            Some(normalize::normalize_phone(raw)?)
        }
        PaymentMethod::Cash => input
            .phone
            .as_deref()
            .map(normalize::digits_only)
            .filter(|p| !p.is_empty()),
    };

    let order_id = Uuid::new_v4();
    let now = Utc::now();
    let transaction_id = format!(
        "TXN-{}-{}",
        now.format("%Y%m%d%H%M%S"),
        order_id.simple()
    );

    let (order_status, payment_state, push) = if method.is_asynchronous() {
        let push = PushPlan {
            // phone presence was established above for asynchronous methods
            phone: phone.clone().unwrap_or_default(),
            amount: total.clone(),
            checkout_request_id: format!(
                "ws_CO_{}_{}",
                now.format("%d%m%Y%H%M%S"),
                order_id.simple()
            ),
        };
        (ORDER_PROCESSING, RECORD_INITIATED, Some(push))
    } else {
        (ORDER_PENDING, RECORD_PENDING, None)
    };

    Ok(CheckoutPlan {
        order_id,
        method,
        total,
        order_status,
        payment_state,
        transaction_id,
        phone,
        items,
        push,
    })
}
