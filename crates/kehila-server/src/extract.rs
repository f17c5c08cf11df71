//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kehila_core::error::KehilaError;
use kehila_core::models::identity::Identity;

use crate::error::HttpError;

/// The identity the dispatcher attached to this request.
///
/// Only available on routes behind the dispatcher middleware; extraction
/// fails with 401 otherwise.
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(HttpError(KehilaError::MissingCredentials))
    }
}
