use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::checkout::CheckoutPlan;
use super::errors::DomainError;
use super::order::{CheckoutRecord, InitiationDetails, OrderView};
use super::reconcile::{ProviderResult, ReconcileOutcome};

/// Durable order aggregate. Every method is one atomic unit of work: either
/// all records it touches become visible together or none do.
pub trait OrderStore: Send + Sync + 'static {
    /// Persist order + items + payment record and, for asynchronous
    /// methods, the pending provider transaction, in one transaction.
    fn create_checkout(&self, plan: CheckoutPlan) -> Result<CheckoutRecord, DomainError>;

    /// Amount, phone and correlation token for the provider push. `None` if
    /// the order does not exist or has no pending provider transaction.
    fn load_initiation(&self, order_id: Uuid) -> Result<Option<InitiationDetails>, DomainError>;

    fn find_order(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Apply a provider callback exactly once: lock the pending transaction
    /// by correlation token, decide, and move order, payment and pending
    /// transaction to their terminal state together (or not at all).
    fn reconcile(&self, result: ProviderResult) -> Result<ReconcileOutcome, DomainError>;
}

#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone)]
pub struct PushRequest {
    pub amount: BigDecimal,
    pub phone: String,
    pub account_reference: String,
    pub description: String,
}

/// Black-box client for the external payment provider. Shortcode, passkey
/// and callback URL are the implementation's configuration concern.
///
/// Neither call is retried automatically: a failure is surfaced to the
/// caller and the pending transaction stays `initiated` for out-of-band
/// follow-up.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn authenticate(&self) -> Result<AccessToken, DomainError>;

    /// Ask the provider to push a payment prompt to the payer's phone.
    /// Returns the provider's raw acknowledgment payload; the business
    /// outcome only arrives later, via the callback.
    async fn stk_push(
        &self,
        request: &PushRequest,
        token: &AccessToken,
    ) -> Result<serde_json::Value, DomainError>;
}
