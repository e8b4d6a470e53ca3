use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::config;
use crate::domain::permissions::Principal;
use crate::error::ApiError;

/// Resolves the acting principal for every request and injects it as an
/// extension.
///
/// No Authorization header means an anonymous principal; the gate decides
/// per-verb what anonymous may do. A present-but-invalid token is rejected
/// outright with 401 rather than downgraded to anonymous, so callers holding a
/// stale token find out.
pub async fn principal_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = match extract_bearer(&headers) {
        None => Principal::Anonymous,
        Some(token) => {
            let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;
            if claims.staff {
                Principal::staff(claims.sub)
            } else {
                Principal::user(claims.sub)
            }
        }
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extract a Bearer token from the Authorization header, if one is present.
fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))?
        .to_str()
        .ok()?;

    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
