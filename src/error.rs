//! Request-level error taxonomy
//!
//! Every failure a caller can observe maps to exactly one variant here.
//! Side-index failures never reach this type; see `catalog::index`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no bearer credential supplied")]
    AuthMissing,
    #[error("credential rejected: {0}")]
    AuthInvalid(String),
    #[error("Missing Origin header")]
    MissingOrigin,
    #[error("{0}")]
    StorageUnavailable(String),
    #[error("Couldn't issue upload session: {0}")]
    SessionIssuanceFailed(String),
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::AuthMissing | CatalogError::AuthInvalid(_) => StatusCode::UNAUTHORIZED,
            CatalogError::MissingOrigin => StatusCode::BAD_REQUEST,
            CatalogError::StorageUnavailable(_) | CatalogError::SessionIssuanceFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Auth failures carry no detail back to the caller
        let body = match self {
            CatalogError::AuthMissing | CatalogError::AuthInvalid(_) => "Unauthorized".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(body)
    }
}
