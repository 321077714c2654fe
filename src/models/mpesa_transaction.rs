use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::mpesa_transactions;

/// Pending provider transaction for an asynchronous payment. The row is
/// created together with its order and mutated exactly once more, by the
/// reconciler, under a `FOR UPDATE` lock on `checkout_request_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = mpesa_transactions)]
#[diesel(belongs_to(crate::models::order::Order))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MpesaTransaction {
    pub id: Uuid,
    pub order_id: Uuid,
    pub phone: String,
    pub amount: BigDecimal,
    pub status: String,
    pub checkout_request_id: String,
    pub merchant_request_id: Option<String>,
    pub mpesa_receipt: Option<String>,
    pub transaction_date: Option<String>,
    pub result_desc: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = mpesa_transactions)]
pub struct NewMpesaTransaction {
    pub id: Uuid,
    pub order_id: Uuid,
    pub phone: String,
    pub amount: BigDecimal,
    pub status: String,
    pub checkout_request_id: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = mpesa_transactions)]
pub struct MpesaTransactionSettle {
    pub status: String,
    pub merchant_request_id: Option<String>,
    pub mpesa_receipt: Option<String>,
    pub transaction_date: Option<String>,
    pub result_desc: Option<String>,
    pub updated_at: DateTime<Utc>,
}
