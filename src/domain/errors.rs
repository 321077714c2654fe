use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Order not found")]
    NotFound,
    #[error("callback amount {got:?} does not match recorded amount {expected}")]
    AmountMismatch {
        expected: BigDecimal,
        got: Option<BigDecimal>,
    },
    #[error("Provider authentication failed: {0}")]
    Auth(String),
    #[error("Provider request failed: {0}")]
    Gateway(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}
