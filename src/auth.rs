use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::config::AuthConfig;

/// Guard applied to mutating endpoints and student PII reads.
///
/// Session issuance lives with the institution's sign-on service; this
/// service only checks the bearer token it was configured with. With no
/// token configured the guard fails closed and every protected route
/// answers 401.
#[derive(Debug, Clone, Default)]
pub struct AuthPolicy {
    admin_token: Option<String>,
}

impl AuthPolicy {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            admin_token: config.admin_token.clone(),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            admin_token: Some(token.into()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.admin_token.is_some()
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let expected = self.admin_token.as_deref().ok_or(AuthError::Missing)?;

        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AuthError::Missing)?;

        if presented == expected {
            Ok(())
        } else {
            Err(AuthError::Invalid)
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication required")]
    Missing,
    #[error("invalid session token")]
    Invalid,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("ascii"));
        headers
    }

    #[test]
    fn accepts_matching_bearer_token() {
        let policy = AuthPolicy::with_token("cell-secret");
        assert_eq!(
            policy.authorize(&headers_with("Bearer cell-secret")),
            Ok(())
        );
    }

    #[test]
    fn rejects_wrong_token() {
        let policy = AuthPolicy::with_token("cell-secret");
        assert_eq!(
            policy.authorize(&headers_with("Bearer other")),
            Err(AuthError::Invalid)
        );
    }

    #[test]
    fn rejects_missing_header_and_non_bearer_schemes() {
        let policy = AuthPolicy::with_token("cell-secret");
        assert_eq!(policy.authorize(&HeaderMap::new()), Err(AuthError::Missing));
        assert_eq!(
            policy.authorize(&headers_with("Basic cell-secret")),
            Err(AuthError::Missing)
        );
    }

    #[test]
    fn fails_closed_when_unconfigured() {
        let policy = AuthPolicy::default();
        assert_eq!(
            policy.authorize(&headers_with("Bearer anything")),
            Err(AuthError::Missing)
        );
    }
}
