//! HTTP error response conversion.
//!
//! The dispatcher and handlers are the single point where internal error
//! kinds become external signals. Authentication failures collapse to a
//! uniform 401 so a caller can never learn which credential field was
//! wrong; only "tenant unknown" (404) is distinguished from
//! "unauthorized".

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kehila_core::error::KehilaError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling.
    pub code: String,
}

/// Wrapper type for [`KehilaError`] to implement `IntoResponse`.
/// Necessary because of Rust's orphan rules — we can't implement
/// `IntoResponse` (external trait) for `KehilaError` (type from
/// `kehila-core`).
#[derive(Debug)]
pub struct HttpError(pub KehilaError);

impl From<KehilaError> for HttpError {
    fn from(err: KehilaError) -> Self {
        HttpError(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let err = &self.0;

        let (status, error, code) = match err {
            // Unknown and suspended tenants are indistinguishable from
            // the outside.
            KehilaError::TenantNotFound { .. } | KehilaError::TenantSuspended { .. } => {
                (StatusCode::NOT_FOUND, "tenant unknown", "tenant_unknown")
            }

            // One uniform rejection for every authentication failure.
            KehilaError::InvalidCredentials
            | KehilaError::SessionInvalid
            | KehilaError::TokenInvalid(_)
            | KehilaError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
            }

            // Distinct so the client can trigger a provisioning flow.
            KehilaError::UserNotProvisioned { .. } => (
                StatusCode::FORBIDDEN,
                "user not provisioned",
                "user_not_provisioned",
            ),

            // Never reveals which role would have been required.
            KehilaError::Forbidden => (StatusCode::FORBIDDEN, "access denied", "forbidden"),

            // Transient; the client may retry with backoff.
            KehilaError::StoreUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service unavailable",
                "store_unavailable",
            ),

            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error",
                "internal",
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %err, status = %status, "request failed");
        } else {
            tracing::warn!(error = %err, status = %status, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: KehilaError) -> StatusCode {
        HttpError(err).into_response().status()
    }

    #[test]
    fn tenant_errors_map_to_not_found() {
        assert_eq!(
            status_of(KehilaError::TenantNotFound { slug: "x".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(KehilaError::TenantSuspended { slug: "x".into() }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn auth_failures_collapse_to_uniform_unauthorized() {
        for err in [
            KehilaError::InvalidCredentials,
            KehilaError::SessionInvalid,
            KehilaError::TokenInvalid("bad".into()),
            KehilaError::MissingCredentials,
        ] {
            assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn store_failure_is_retryable_service_error() {
        assert_eq!(
            status_of(KehilaError::StoreUnavailable("deadline".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn forbidden_and_not_provisioned_are_distinct_403s() {
        assert_eq!(status_of(KehilaError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(KehilaError::UserNotProvisioned {
                subject: "s".into()
            }),
            StatusCode::FORBIDDEN
        );
    }
}
