//! Request dispatcher middleware.
//!
//! The single per-request entry point for protected routes: extracts the
//! tenant claim and credential artifacts, resolves the tenant, validates
//! the artifacts, and attaches the resulting [`Identity`] to the request
//! extensions. A request that fails any step is rejected here, before any
//! handler runs. Downstream handlers must scope data access by the
//! attached identity's `tenant_id`, never by a client-supplied value.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kehila_auth::validator::CredentialArtifacts;
use kehila_core::error::KehilaError;
use surrealdb::Connection;
use tracing::warn;
use uuid::Uuid;

use crate::error::HttpError;
use crate::state::AppState;

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "kehila_session";

/// Tenant claim: first URL path segment (`/{tenant}/api/...`), with the
/// `homeID` and `tenant` headers as fallbacks for legacy clients.
fn tenant_slug(request: &Request) -> Option<String> {
    let from_path = request
        .uri()
        .path()
        .split('/')
        .find(|segment| !segment.is_empty())
        .filter(|segment| *segment != "api")
        .map(str::to_string);

    from_path.or_else(|| {
        let headers = request.headers();
        header_value(headers, "homeID").or_else(|| header_value(headers, "tenant"))
    })
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Pull the session token from the `x-session-token` header or the
/// session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = header_value(headers, "x-session-token") {
        return Some(token);
    }

    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Gather every credential artifact present on the request.
fn extract_artifacts(headers: &HeaderMap) -> CredentialArtifacts {
    let bearer = header_value(headers, "authorization")
        .and_then(|h| h.strip_prefix("Bearer ").map(str::to_string));

    CredentialArtifacts {
        bearer,
        session: session_token(headers),
        external: header_value(headers, "x-id-token"),
    }
}

/// Dispatcher middleware for protected routes.
pub async fn dispatch<C: Connection>(
    State(state): State<AppState<C>>,
    mut request: Request,
    next: Next,
) -> Response {
    // A request with no tenant claim cannot be routed anywhere.
    let slug = match tenant_slug(&request) {
        Some(slug) => slug,
        None => {
            return HttpError(KehilaError::TenantNotFound { slug: String::new() }).into_response();
        }
    };

    let tenant = match state.registry.resolve(&slug).await {
        Ok(tenant) => tenant,
        Err(err) => return HttpError(err).into_response(),
    };

    let artifacts = extract_artifacts(request.headers());
    let identity = match state.validator.resolve(tenant.id, &artifacts).await {
        Ok(identity) => identity,
        Err(err) => return HttpError(err).into_response(),
    };

    // The x-user-id header is an advisory hint only; when present it must
    // agree with the validated identity.
    if let Some(hint) = header_value(request.headers(), "x-user-id") {
        let matches = hint
            .parse::<Uuid>()
            .is_ok_and(|hinted| hinted == identity.user_id);
        if !matches {
            warn!(tenant = %tenant.slug, user_id = %identity.user_id, "x-user-id hint mismatch");
            return HttpError(KehilaError::SessionInvalid).into_response();
        }
    }

    request.extensions_mut().insert(identity);

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(path: &str) -> Request {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[test]
    fn tenant_from_first_path_segment() {
        assert_eq!(
            tenant_slug(&request("/beresheet/api/auth/session")),
            Some("beresheet".into())
        );
    }

    #[test]
    fn tenant_falls_back_to_headers() {
        let mut req = request("/api/whoami");
        req.headers_mut()
            .insert("homeID", "neve-shalom".parse().unwrap());
        assert_eq!(tenant_slug(&req), Some("neve-shalom".into()));

        let mut req = request("/api/whoami");
        req.headers_mut().insert("tenant", "givat".parse().unwrap());
        assert_eq!(tenant_slug(&req), Some("givat".into()));
    }

    #[test]
    fn no_tenant_claim_yields_none() {
        assert_eq!(tenant_slug(&request("/api/whoami")), None);
        assert_eq!(tenant_slug(&request("/")), None);
    }

    #[test]
    fn session_token_from_header_or_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session-token", "from-header".parse().unwrap());
        assert_eq!(session_token(&headers), Some("from-header".into()));

        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            "theme=dark; kehila_session=from-cookie".parse().unwrap(),
        );
        assert_eq!(session_token(&headers), Some("from-cookie".into()));

        // Header wins over cookie.
        headers.insert("x-session-token", "from-header".parse().unwrap());
        assert_eq!(session_token(&headers), Some("from-header".into()));
    }

    #[test]
    fn artifacts_collects_all_kinds() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer some-jwt".parse().unwrap());
        headers.insert("x-session-token", "sess".parse().unwrap());
        headers.insert("x-id-token", "provider".parse().unwrap());

        let artifacts = extract_artifacts(&headers);
        assert_eq!(artifacts.bearer.as_deref(), Some("some-jwt"));
        assert_eq!(artifacts.session.as_deref(), Some("sess"));
        assert_eq!(artifacts.external.as_deref(), Some("provider"));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcjpwdw==".parse().unwrap());
        assert!(extract_artifacts(&headers).bearer.is_none());
    }
}
