use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::domain::checkout::{self, CheckoutInput};
use crate::domain::errors::DomainError;
use crate::domain::order::{CheckoutRecord, InitiationDetails, OrderView};
use crate::domain::ports::{OrderStore, PaymentGateway, PushRequest};
use crate::domain::reconcile::{ProviderResult, ReconcileOutcome};

/// The transaction coordinator: validates and plans a checkout, hands the
/// plan to the store as one atomic unit, drives the provider push, and
/// reconciles the provider's callback exactly once.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn OrderStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { store, gateway }
    }

    pub fn create_checkout(&self, input: CheckoutInput) -> Result<CheckoutRecord, DomainError> {
        let plan = checkout::plan_checkout(&input)?;
        self.store.create_checkout(plan)
    }

    pub fn prepare_initiation(&self, order_id: Uuid) -> Result<InitiationDetails, DomainError> {
        self.store
            .load_initiation(order_id)?
            .ok_or(DomainError::NotFound)
    }

    /// Authenticate and push the payment request to the provider. Writes
    /// nothing locally: the pending transaction was registered at checkout
    /// and only the provider's callback may advance it. A failure here
    /// (including a timeout) leaves everything `initiated` for out-of-band
    /// follow-up.
    pub async fn initiate_push(
        &self,
        details: &InitiationDetails,
    ) -> Result<Value, DomainError> {
        let token = self.gateway.authenticate().await?;
        let request = PushRequest {
            amount: details.amount.clone(),
            phone: details.phone.clone(),
            account_reference: details.order_id.to_string(),
            description: "Order payment".to_string(),
        };
        self.gateway.stk_push(&request, &token).await
    }

    /// Reconcile a provider callback. Business outcomes (including a stale
    /// token or a tampered amount) are Ok values: the caller acknowledges
    /// receipt to the provider no matter what, and only infrastructure
    /// failures propagate as errors.
    pub fn handle_callback(
        &self,
        result: ProviderResult,
    ) -> Result<ReconcileOutcome, DomainError> {
        let token = result.checkout_request_id.clone();
        let outcome = self.store.reconcile(result)?;

        match &outcome {
            ReconcileOutcome::Completed { receipt, .. } => {
                log::info!(
                    "payment completed for checkout request {token} (receipt {:?})",
                    receipt
                );
            }
            ReconcileOutcome::Failed { reason } => {
                log::info!("payment failed for checkout request {token}: {reason}");
            }
            ReconcileOutcome::AlreadyTerminal { status } => {
                log::info!(
                    "duplicate callback for checkout request {token} ignored (already {status})"
                );
            }
            ReconcileOutcome::NotFound => {
                log::warn!("callback for unknown checkout request {token}");
            }
            ReconcileOutcome::AmountMismatch { expected, got } => {
                log::error!(
                    "amount mismatch for checkout request {token}: recorded {expected}, callback reported {got:?}; order left untouched"
                );
            }
        }

        Ok(outcome)
    }

    pub fn find_order(&self, order_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        self.store.find_order(order_id)
    }
}
