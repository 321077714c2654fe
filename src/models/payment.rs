use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::payments;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = payments)]
#[diesel(belongs_to(crate::models::order::Order))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub method: String,
    pub phone: Option<String>,
    pub status: String,
    pub transaction_id: String,
    pub mpesa_receipt: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: BigDecimal,
    pub method: String,
    pub phone: Option<String>,
    pub status: String,
    pub transaction_id: String,
}

/// Terminal transition applied by the reconciler. `None` fields are left
/// untouched rather than nulled out.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = payments)]
pub struct PaymentSettle {
    pub status: String,
    pub mpesa_receipt: Option<String>,
    pub failure_reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}
