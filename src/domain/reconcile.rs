//! Callback reconciliation decision logic. Pure: the store locks the
//! pending transaction row and applies whatever this module decides, so the
//! idempotency and tamper-detection rules are testable without a database.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use serde_json::Value;

use super::checkout::RECORD_INITIATED;
use super::normalize;

/// Metadata item names the provider uses in its callback payload.
const META_AMOUNT: &str = "Amount";
const META_RECEIPT: &str = "MpesaReceiptNumber";
const META_TRANSACTION_DATE: &str = "TransactionDate";

/// `ResultCode` value the provider sends for a successful payment.
pub const RESULT_SUCCESS: i64 = 0;

/// A provider callback, flattened out of its transport envelope.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    pub checkout_request_id: String,
    pub merchant_request_id: Option<String>,
    pub result_code: i64,
    pub result_desc: String,
    pub metadata: CallbackMetadata,
}

/// Name → value lookup over the callback's `{Name, Value}` item list.
#[derive(Debug, Clone, Default)]
pub struct CallbackMetadata(HashMap<String, Value>);

impl CallbackMetadata {
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        CallbackMetadata(items.into_iter().collect())
    }

    pub fn amount(&self) -> Option<BigDecimal> {
        let value = self.0.get(META_AMOUNT)?;
        normalize::parse_amount(value, META_AMOUNT).ok()
    }

    pub fn receipt(&self) -> Option<String> {
        self.text(META_RECEIPT)
    }

    pub fn transaction_date(&self) -> Option<String> {
        self.text(META_TRANSACTION_DATE)
    }

    fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// What a reconciliation attempt did (or declined to do). The store commits
/// `Completed`/`Failed` to all three records in the same transaction; every
/// other outcome leaves the data untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// No pending transaction matches the correlation token: stale or forged
    /// callback.
    NotFound,
    /// The transaction already reached a terminal state. Repeat deliveries
    /// land here and must not re-apply side effects.
    AlreadyTerminal { status: String },
    /// The callback reports an amount different from the amount recorded at
    /// checkout. Left for a human to investigate.
    AmountMismatch {
        expected: BigDecimal,
        got: Option<BigDecimal>,
    },
    Completed {
        receipt: Option<String>,
        transaction_date: Option<String>,
        result_desc: String,
    },
    Failed { reason: String },
}

/// Decide the fate of a locked pending transaction.
///
/// Order of checks matters: terminal state first (idempotent replay), then
/// amount integrity, then the provider's verdict. The amount check runs
/// whenever the callback carries an `Amount` item; failure callbacks without
/// metadata skip it.
pub fn decide(
    pending_status: &str,
    recorded_amount: &BigDecimal,
    result: &ProviderResult,
) -> ReconcileOutcome {
    if pending_status != RECORD_INITIATED {
        return ReconcileOutcome::AlreadyTerminal {
            status: pending_status.to_string(),
        };
    }

    let reported = result.metadata.amount();
    let success = result.result_code == RESULT_SUCCESS;

    if let Some(got) = &reported {
        if got != recorded_amount {
            return ReconcileOutcome::AmountMismatch {
                expected: recorded_amount.clone(),
                got: reported,
            };
        }
    } else if success {
        // A success callback without an amount is as suspect as a wrong one.
        return ReconcileOutcome::AmountMismatch {
            expected: recorded_amount.clone(),
            got: None,
        };
    }

    if success {
        ReconcileOutcome::Completed {
            receipt: result.metadata.receipt(),
            transaction_date: result.metadata.transaction_date(),
            result_desc: result.result_desc.clone(),
        }
    } else {
        ReconcileOutcome::Failed {
            reason: result.result_desc.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::checkout::{RECORD_COMPLETED, RECORD_FAILED};

    use super::*;

    fn success_result(amount: Value) -> ProviderResult {
        ProviderResult {
            checkout_request_id: "ws_CO_07082026120000_abc".into(),
            merchant_request_id: Some("29115-34620561-1".into()),
            result_code: RESULT_SUCCESS,
            result_desc: "The service request is processed successfully.".into(),
            metadata: CallbackMetadata::from_items([
                ("Amount".to_string(), amount),
                ("MpesaReceiptNumber".to_string(), json!("NLJ7RT61SV")),
                ("TransactionDate".to_string(), json!(20260807123456u64)),
            ]),
        }
    }

    fn failure_result() -> ProviderResult {
        ProviderResult {
            checkout_request_id: "ws_CO_07082026120000_abc".into(),
            merchant_request_id: None,
            result_code: 1032,
            result_desc: "Request cancelled by user".into(),
            metadata: CallbackMetadata::default(),
        }
    }

    #[test]
    fn matching_success_completes_with_receipt_and_date() {
        let outcome = decide(
            RECORD_INITIATED,
            &BigDecimal::from(1000),
            &success_result(json!(1000)),
        );
        assert_eq!(
            outcome,
            ReconcileOutcome::Completed {
                receipt: Some("NLJ7RT61SV".into()),
                transaction_date: Some("20260807123456".into()),
                result_desc: "The service request is processed successfully.".into(),
            }
        );
    }

    #[test]
    fn string_amount_in_metadata_still_matches() {
        let outcome = decide(
            RECORD_INITIATED,
            &BigDecimal::from(1000),
            &success_result(json!("1000")),
        );
        assert!(matches!(outcome, ReconcileOutcome::Completed { .. }));
    }

    #[test]
    fn mismatched_amount_blocks_completion() {
        let outcome = decide(
            RECORD_INITIATED,
            &BigDecimal::from(1000),
            &success_result(json!(999)),
        );
        assert_eq!(
            outcome,
            ReconcileOutcome::AmountMismatch {
                expected: BigDecimal::from(1000),
                got: Some(BigDecimal::from(999)),
            }
        );
    }

    #[test]
    fn success_without_amount_is_a_mismatch() {
        let mut result = success_result(json!(1000));
        result.metadata = CallbackMetadata::default();
        let outcome = decide(RECORD_INITIATED, &BigDecimal::from(1000), &result);
        assert!(matches!(
            outcome,
            ReconcileOutcome::AmountMismatch { got: None, .. }
        ));
    }

    #[test]
    fn failure_code_marks_everything_failed() {
        let outcome = decide(RECORD_INITIATED, &BigDecimal::from(1000), &failure_result());
        assert_eq!(
            outcome,
            ReconcileOutcome::Failed {
                reason: "Request cancelled by user".into(),
            }
        );
    }

    #[test]
    fn failure_with_wrong_amount_is_still_a_mismatch() {
        let mut result = failure_result();
        result.metadata = CallbackMetadata::from_items([("Amount".to_string(), json!(5))]);
        let outcome = decide(RECORD_INITIATED, &BigDecimal::from(1000), &result);
        assert!(matches!(outcome, ReconcileOutcome::AmountMismatch { .. }));
    }

    #[test]
    fn completed_transaction_is_terminal() {
        let outcome = decide(
            RECORD_COMPLETED,
            &BigDecimal::from(1000),
            &success_result(json!(1000)),
        );
        assert_eq!(
            outcome,
            ReconcileOutcome::AlreadyTerminal {
                status: RECORD_COMPLETED.into(),
            }
        );
    }

    #[test]
    fn failed_transaction_never_flips_to_completed() {
        let outcome = decide(
            RECORD_FAILED,
            &BigDecimal::from(1000),
            &success_result(json!(1000)),
        );
        assert_eq!(
            outcome,
            ReconcileOutcome::AlreadyTerminal {
                status: RECORD_FAILED.into(),
            }
        );
    }

    #[test]
    fn scale_differences_do_not_trip_the_amount_check() {
        let outcome = decide(
            RECORD_INITIATED,
            &"1000.00".parse().unwrap(),
            &success_result(json!(1000)),
        );
        assert!(matches!(outcome, ReconcileOutcome::Completed { .. }));
    }
}
