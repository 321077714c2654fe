use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Order not found")]
    NotFound,

    #[error("Payment provider error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound => AppError::NotFound,
            DomainError::Auth(msg) | DomainError::Gateway(msg) => AppError::Gateway(msg),
            DomainError::AmountMismatch { expected, got } => AppError::Internal(format!(
                "callback amount {got:?} does not match recorded amount {expected}"
            )),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "message": self.to_string()
            })),
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "message": self.to_string()
            })),
            AppError::Gateway(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "success": false,
                "message": self.to_string()
            })),
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "message": "Internal server error"
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use bigdecimal::BigDecimal;

    use super::*;

    #[test]
    fn validation_returns_400() {
        let resp = AppError::Validation("phone number is required".into()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn gateway_returns_502() {
        let resp = AppError::Gateway("provider down".into()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_returns_500() {
        let resp = AppError::Internal("something went wrong".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn domain_validation_maps_to_400_shape() {
        let app: AppError = DomainError::validation("cart must not be empty").into();
        assert!(matches!(app, AppError::Validation(_)));
        assert_eq!(app.to_string(), "cart must not be empty");
    }

    #[test]
    fn domain_auth_and_gateway_map_to_gateway() {
        let auth: AppError = DomainError::Auth("bad credentials".into()).into();
        assert!(matches!(auth, AppError::Gateway(_)));
        let gw: AppError = DomainError::Gateway("503".into()).into();
        assert!(matches!(gw, AppError::Gateway(_)));
    }

    #[test]
    fn amount_mismatch_maps_to_internal() {
        let app: AppError = DomainError::AmountMismatch {
            expected: BigDecimal::from(1000),
            got: Some(BigDecimal::from(999)),
        }
        .into();
        assert!(matches!(app, AppError::Internal(_)));
    }
}
