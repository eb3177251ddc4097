//! Bearer-token check for the `/v1` routes.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

/// Check the `Authorization` header against the configured token.
///
/// With no token configured every request passes.
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    check_token(state.api_token.as_deref(), headers)
}

fn check_token(expected: Option<&str>, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(ApiError::Unauthorized);
    };

    let Ok(value) = value.to_str() else {
        return Err(ApiError::Unauthorized);
    };

    let Some(token) = value.strip_prefix("Bearer ") else {
        return Err(ApiError::Unauthorized);
    };

    if !bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

/// Middleware wrapper around [`authorize`].
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, request.headers())?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn matches(token: &str, header_value: &str) -> bool {
        let expected = Some(token.to_string());
        check_token(expected.as_deref(), &headers(header_value)).is_ok()
    }

    #[test]
    fn test_token_must_match_exactly() {
        assert!(matches("secret", "Bearer secret"));
        assert!(!matches("secret", "Bearer secret "));
        assert!(!matches("secret", "Bearer secre"));
        assert!(!matches("secret", "Bearer secrets"));
        assert!(!matches("secret", "bearer secret"));
        assert!(!matches("secret", "secret"));
    }

    #[test]
    fn test_no_token_configured_passes() {
        assert!(check_token(None, &HeaderMap::new()).is_ok());
    }
}
