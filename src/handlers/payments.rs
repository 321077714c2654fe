use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::checkout_service::CheckoutService;
use crate::domain::reconcile::{CallbackMetadata, ProviderResult};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitiatePaymentRequest {
    pub order_id: Uuid,
}

/// Daraja STK callback envelope. Field names follow the provider's wire
/// format, not ours.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: CallbackBody,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: Option<String>,
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
    /// Present on successful payments only.
    #[serde(rename = "CallbackMetadata")]
    pub callback_metadata: Option<CallbackMetadataDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CallbackMetadataDto {
    #[serde(rename = "Item")]
    pub item: Vec<MetadataItemDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetadataItemDto {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    #[schema(value_type = Option<String>)]
    pub value: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CallbackAck {
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDescription")]
    pub result_description: String,
}

fn received_ack() -> CallbackAck {
    CallbackAck {
        result_code: 0,
        result_description: "Callback received successfully".to_string(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /payments/initiate
///
/// Pushes the payment prompt for an existing order to the provider, using
/// the amount and phone stored at checkout. Writes nothing locally; the
/// pending transaction advances only when the provider's callback arrives.
#[utoipa::path(
    post,
    path = "/payments/initiate",
    request_body = InitiatePaymentRequest,
    responses(
        (status = 200, description = "Provider acknowledgment, verbatim"),
        (status = 404, description = "Order has no pending provider transaction"),
        (status = 502, description = "Provider authentication or push failed"),
    ),
    tag = "payments"
)]
pub async fn initiate_payment(
    service: web::Data<CheckoutService>,
    body: web::Json<InitiatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = body.order_id;

    let svc = service.clone().into_inner();
    let details = web::block(move || svc.prepare_initiation(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let ack = service.initiate_push(&details).await?;
    Ok(HttpResponse::Ok().json(ack))
}

/// POST /payments/callback
///
/// The provider's asynchronous payment result. The response is always the
/// success-shaped acknowledgment: the provider only needs to know the
/// callback was received, and reporting a business failure as a transport
/// failure would only trigger its redelivery and alerting machinery.
/// Internal failures are logged and likewise acknowledged.
#[utoipa::path(
    post,
    path = "/payments/callback",
    request_body = CallbackEnvelope,
    responses(
        (status = 200, description = "Callback received", body = CallbackAck),
        (status = 400, description = "Structurally malformed callback"),
    ),
    tag = "payments"
)]
pub async fn mpesa_callback(
    service: web::Data<CheckoutService>,
    body: web::Json<CallbackEnvelope>,
) -> HttpResponse {
    let stk = body.into_inner().body.stk_callback;
    let metadata = CallbackMetadata::from_items(
        stk.callback_metadata
            .map(|m| m.item)
            .unwrap_or_default()
            .into_iter()
            .map(|item| (item.name, item.value.unwrap_or(Value::Null))),
    );
    let result = ProviderResult {
        checkout_request_id: stk.checkout_request_id,
        merchant_request_id: stk.merchant_request_id,
        result_code: stk.result_code,
        result_desc: stk.result_desc,
        metadata,
    };

    let service = service.into_inner();
    match web::block(move || service.handle_callback(result)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => log::error!("callback reconciliation failed: {e}"),
        Err(e) => log::error!("callback reconciliation task failed: {e}"),
    }

    HttpResponse::Ok().json(received_ack())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn daraja_success_envelope_deserializes() {
        let payload = json!({
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "29115-34620561-1",
                    "CheckoutRequestID": "ws_CO_07082026120000_abc",
                    "ResultCode": 0,
                    "ResultDesc": "The service request is processed successfully.",
                    "CallbackMetadata": {
                        "Item": [
                            { "Name": "Amount", "Value": 1000.0 },
                            { "Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV" },
                            { "Name": "TransactionDate", "Value": 20260807123456u64 },
                            { "Name": "PhoneNumber", "Value": 254712345678u64 }
                        ]
                    }
                }
            }
        });

        let envelope: CallbackEnvelope = serde_json::from_value(payload).unwrap();
        let stk = envelope.body.stk_callback;
        assert_eq!(stk.checkout_request_id, "ws_CO_07082026120000_abc");
        assert_eq!(stk.result_code, 0);
        assert_eq!(stk.callback_metadata.unwrap().item.len(), 4);
    }

    #[test]
    fn failure_envelope_without_metadata_deserializes() {
        let payload = json!({
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "29115-34620561-1",
                    "CheckoutRequestID": "ws_CO_07082026120000_abc",
                    "ResultCode": 1032,
                    "ResultDesc": "Request cancelled by user"
                }
            }
        });

        let envelope: CallbackEnvelope = serde_json::from_value(payload).unwrap();
        assert!(envelope.body.stk_callback.callback_metadata.is_none());
    }

    #[test]
    fn envelope_without_checkout_request_id_is_rejected() {
        let payload = json!({
            "Body": {
                "stkCallback": {
                    "ResultCode": 0,
                    "ResultDesc": "ok"
                }
            }
        });
        assert!(serde_json::from_value::<CallbackEnvelope>(payload).is_err());
    }

    #[test]
    fn ack_serializes_with_provider_field_names() {
        let ack = serde_json::to_value(received_ack()).unwrap();
        assert_eq!(
            ack,
            json!({
                "ResultCode": 0,
                "ResultDescription": "Callback received successfully"
            })
        );
    }
}
