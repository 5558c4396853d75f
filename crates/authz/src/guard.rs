//! Request guard for routes that require a logged-in member.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use libris_http::AppError;

use crate::token::{MemberId, TokenAuthority};

/// Member resolved from the `Authorization` header.
///
/// The header carries the raw token; a `Bearer ` prefix is tolerated. Any
/// failure rejects with 401 before the handler (or its body extractor) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMember(pub MemberId);

impl<S> FromRequestParts<S> for AuthenticatedMember
where
    Arc<TokenAuthority>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authority = Arc::<TokenAuthority>::from_ref(state);

        let Some(token) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(strip_scheme)
            .filter(|token| !token.is_empty())
        else {
            tracing::debug!("missing authorization header");
            return Err(unauthorized());
        };

        match authority.authenticate(token) {
            Some(member_id) => Ok(AuthenticatedMember(member_id)),
            None => {
                tracing::debug!("unknown or expired token");
                Err(unauthorized())
            }
        }
    }
}

fn strip_scheme(header: &str) -> &str {
    let header = header.trim();
    header.strip_prefix("Bearer ").unwrap_or(header).trim()
}

fn unauthorized() -> AppError {
    AppError::unauthorized("Unauthorized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app(authority: Arc<TokenAuthority>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|AuthenticatedMember(id): AuthenticatedMember| async move { id.to_string() }),
            )
            .with_state(authority)
    }

    async fn call(router: Router, header: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri("/whoami");
        if let Some(value) = header {
            request = request.header(AUTHORIZATION, value);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn strips_optional_bearer_scheme() {
        assert_eq!(strip_scheme("abc"), "abc");
        assert_eq!(strip_scheme("Bearer abc"), "abc");
        assert_eq!(strip_scheme("  abc  "), "abc");
    }

    #[tokio::test]
    async fn raw_and_bearer_tokens_are_accepted() {
        let authority = Arc::new(TokenAuthority::new());
        let token = authority.issue(42);

        let (status, body) = call(app(authority.clone()), Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");

        let bearer = format!("Bearer {}", token);
        let (status, body) = call(app(authority), Some(&bearer)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn missing_or_unknown_token_is_unauthorized() {
        let authority = Arc::new(TokenAuthority::new());

        let (status, body) = call(app(authority.clone()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"error\":\"Unauthorized\""));

        let (status, _) = call(app(authority), Some("deadbeef")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
