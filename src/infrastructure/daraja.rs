//! Reqwest client for the Daraja (M-Pesa) API: OAuth token fetch and STK
//! push. The coordinator never talks to the provider directly; it goes
//! through the `PaymentGateway` port so tests can substitute a stub.

use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::DomainError;
use crate::domain::ports::{AccessToken, PaymentGateway, PushRequest};

const DEFAULT_BASE_URL: &str = "https://sandbox.safaricom.co.ke";

#[derive(Debug, Clone)]
pub struct MpesaConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub shortcode: String,
    pub passkey: String,
    pub callback_url: String,
    pub base_url: String,
}

impl MpesaConfig {
    /// Read the provider credentials from the environment. Reads:
    /// `MPESA_CONSUMER_KEY`, `MPESA_CONSUMER_SECRET`, `MPESA_SHORTCODE`,
    /// `MPESA_PASSKEY`, `MPESA_CALLBACK_URL`, and optionally
    /// `MPESA_BASE_URL` (defaults to the sandbox).
    pub fn from_env() -> Result<Self, std::env::VarError> {
        Ok(Self {
            consumer_key: std::env::var("MPESA_CONSUMER_KEY")?,
            consumer_secret: std::env::var("MPESA_CONSUMER_SECRET")?,
            shortcode: std::env::var("MPESA_SHORTCODE")?,
            passkey: std::env::var("MPESA_PASSKEY")?,
            callback_url: std::env::var("MPESA_CALLBACK_URL")?,
            base_url: std::env::var("MPESA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Point the client at a different API host (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

pub struct DarajaGateway {
    config: MpesaConfig,
    http: reqwest::Client,
}

impl DarajaGateway {
    pub fn new(config: MpesaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// `base64(shortcode + passkey + timestamp)`, as the STK push endpoint
    /// expects it.
    fn push_password(&self, timestamp: &str) -> String {
        BASE64_STANDARD.encode(format!(
            "{}{}{}",
            self.config.shortcode, self.config.passkey, timestamp
        ))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[async_trait]
impl PaymentGateway for DarajaGateway {
    async fn authenticate(&self) -> Result<AccessToken, DomainError> {
        let url = format!(
            "{}/oauth/v1/generate?grant_type=client_credentials",
            self.config.base_url
        );
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await
            .map_err(|e| DomainError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Auth(format!("malformed token response: {e}")))?;
        Ok(AccessToken(token.access_token))
    }

    async fn stk_push(
        &self,
        request: &PushRequest,
        token: &AccessToken,
    ) -> Result<Value, DomainError> {
        let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
        let body = json!({
            "BusinessShortCode": self.config.shortcode,
            "Password": self.push_password(&timestamp),
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": request.amount.to_string(),
            "PartyA": request.phone,
            "PartyB": self.config.shortcode,
            "PhoneNumber": request.phone,
            "CallBackURL": self.config.callback_url,
            "AccountReference": request.account_reference,
            "TransactionDesc": request.description,
        });

        let response = self
            .http
            .post(format!(
                "{}/mpesa/stkpush/v1/processrequest",
                self.config.base_url
            ))
            .bearer_auth(&token.0)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Gateway(e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| DomainError::Gateway(e.to_string()))?;

        // The raw body is kept in the error so a rejected push can be
        // diagnosed from the provider's own words.
        if !status.is_success() {
            return Err(DomainError::Gateway(format!("{status}: {payload}")));
        }

        serde_json::from_str(&payload)
            .map_err(|e| DomainError::Gateway(format!("malformed push response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;

    fn config() -> MpesaConfig {
        MpesaConfig {
            consumer_key: "key".into(),
            consumer_secret: "secret".into(),
            shortcode: "174379".into(),
            passkey: "passkey".into(),
            callback_url: "https://example.com/payments/callback".into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    #[test]
    fn push_password_is_base64_of_shortcode_passkey_timestamp() {
        let gateway = DarajaGateway::new(config());
        let encoded = gateway.push_password("20260807123456");
        let decoded = BASE64_STANDARD.decode(encoded).expect("valid base64");
        assert_eq!(decoded, b"174379passkey20260807123456");
    }

    #[test]
    fn with_base_url_overrides_the_host() {
        let config = config().with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_gateway_error_without_retry() {
        // Nothing listens on this port; the call must fail fast with a
        // Gateway error rather than inventing a terminal state.
        let gateway = DarajaGateway::new(config().with_base_url("http://127.0.0.1:1"));
        let request = PushRequest {
            amount: BigDecimal::from(1000),
            phone: "254712345678".into(),
            account_reference: "order-1".into(),
            description: "Order payment".into(),
        };
        let err = gateway
            .stk_push(&request, &AccessToken("token".into()))
            .await
            .expect_err("push must fail");
        assert!(matches!(err, DomainError::Gateway(_)));
    }
}
