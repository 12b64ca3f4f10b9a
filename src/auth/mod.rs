//! Request identity and the admin key guard.
//!
//! The viewer key is taken from, in order: an `Authorization: Debug <key>`
//! header, the claims of an `Authorization: Bearer <jwt>` token, the
//! `DEV_UID` cookie. When none yields a key a fresh `dev_<hex>` id is minted
//! and returned in a `Set-Cookie` header.
//!
//! Bearer token signatures are NOT verified here. A gateway in front of the
//! service is expected to do that.

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::errors::AppError;

/// Header carrying the admin pre-shared key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

pub const DEV_UID_COOKIE: &str = "DEV_UID";

const DEV_UID_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Identity key of the caller: a lower-cased email, a token uid, or a
/// `dev_` id. Inserted as a request extension by `identity_layer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer(pub String);

impl Viewer {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Resolve the viewer and attach it to the request.
pub async fn identity_layer(mut request: Request, next: Next) -> Response {
    let (key, minted) = match viewer_from_headers(request.headers()) {
        Some(key) => (key, false),
        None => (mint_dev_uid(), true),
    };
    request.extensions_mut().insert(Viewer(key.clone()));

    let mut response = next.run(request).await;
    if minted {
        let cookie = format!(
            "{DEV_UID_COOKIE}={key}; Path=/; Max-Age={DEV_UID_MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!("Failed to build {} cookie: {}", DEV_UID_COOKIE, e),
        }
    }
    response
}

fn viewer_from_headers(headers: &HeaderMap) -> Option<String> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let from_authorization = if let Some(debug) = authorization.strip_prefix("Debug ") {
        Some(debug_key(debug))
    } else if let Some(token) = authorization.strip_prefix("Bearer ") {
        bearer_key(token)
    } else {
        None
    };

    from_authorization
        .filter(|k| !k.is_empty())
        .or_else(|| cookie_value(headers, DEV_UID_COOKIE))
}

/// The raw debug key, lower-cased when it looks like an email.
fn debug_key(raw: &str) -> String {
    let key = raw.trim();
    if key.contains('@') {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Identity from the payload segment of a JWT: `email` if present, else
/// `user_id`, `uid` or `sub`.
fn bearer_key(token: &str) -> Option<String> {
    let payload = token.trim().split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&bytes).ok()?;

    let claim = |name: &str| -> Option<String> {
        let value = match claims.get(name)? {
            serde_json::Value::Null => return None,
            serde_json::Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        Some(value).filter(|v| !v.is_empty())
    };

    claim("email")
        .map(|email| email.to_lowercase())
        .or_else(|| claim("user_id"))
        .or_else(|| claim("uid"))
        .or_else(|| claim("sub"))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, v)| *k == name && !v.is_empty())
        .map(|(_, v)| v.to_string())
}

fn mint_dev_uid() -> String {
    format!("dev_{}", Uuid::new_v4().simple())
}

/// Guard for admin routes. With no key configured the routes are closed.
pub async fn admin_key_layer(
    expected_key: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_key else {
        return AppError::Forbidden("Admin endpoints are disabled".to_string()).into_response();
    };

    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if constant_time_compare(key, &expected) => next.run(request).await,
        Some(_) => AppError::Unauthorized("Invalid admin key".to_string()).into_response(),
        None => AppError::Unauthorized("Missing admin key".to_string()).into_response(),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn jwt(claims: serde_json::Value) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("eyJhbGciOiJub25lIn0.{payload}.sig")
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("admin-key-123", "admin-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("admin-key-123", "admin-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_debug_header_lowercases_emails_only() {
        let h = headers(&[(header::AUTHORIZATION, "Debug Alice@Example.COM")]);
        assert_eq!(viewer_from_headers(&h).as_deref(), Some("alice@example.com"));

        let h = headers(&[(header::AUTHORIZATION, "Debug  DemoUser ")]);
        assert_eq!(viewer_from_headers(&h).as_deref(), Some("DemoUser"));
    }

    #[test]
    fn test_bearer_prefers_email_then_uid_claims() {
        let token = jwt(serde_json::json!({"email": "Bob@X.io", "user_id": "u1"}));
        assert_eq!(bearer_key(&token).as_deref(), Some("bob@x.io"));

        let token = jwt(serde_json::json!({"email": "", "uid": "u2", "sub": "s"}));
        assert_eq!(bearer_key(&token).as_deref(), Some("u2"));

        let token = jwt(serde_json::json!({"sub": 42}));
        assert_eq!(bearer_key(&token).as_deref(), Some("42"));

        assert!(bearer_key("not-a-jwt").is_none());
        assert!(bearer_key("a.!!!.c").is_none());
    }

    #[test]
    fn test_cookie_is_the_fallback() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer garbage"),
            (header::COOKIE, "theme=dark; DEV_UID=dev_abc"),
        ]);
        assert_eq!(viewer_from_headers(&h).as_deref(), Some("dev_abc"));

        let h = headers(&[(header::COOKIE, "DEV_UID=")]);
        assert!(viewer_from_headers(&h).is_none());
    }

    #[test]
    fn test_minted_ids_are_dev_prefixed_and_unique() {
        let a = mint_dev_uid();
        let b = mint_dev_uid();
        assert!(a.starts_with("dev_"));
        assert_eq!(a.len(), 4 + 32);
        assert_ne!(a, b);
    }
}
