use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::database::Database;
use crate::database::repo::tokens;
use crate::error::ApiError;
use crate::tenancy::TenantContext;

/// Authenticated band principal resolved from the bearer credential
#[derive(Clone, Copy, Debug)]
pub struct AuthBand {
    pub band_id: i64,
    pub token_id: Uuid,
}

impl AuthBand {
    pub fn context(&self) -> TenantContext {
        TenantContext::authenticated(self.band_id)
    }
}

impl From<Claims> for AuthBand {
    fn from(claims: Claims) -> Self {
        Self {
            band_id: claims.sub,
            token_id: claims.jti,
        }
    }
}

/// Identity resolver middleware for protected routes.
///
/// Extracts the bearer token, validates the JWT, and checks the token
/// id is still registered (logout revokes it). On success the principal
/// is injected into request extensions; any failure is terminal with
/// 401 before tenant-scoped logic runs.
pub async fn auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_from_headers(&headers)
        .map_err(|msg| ApiError::unauthorized(msg).into_response())?;

    let claims = validate_jwt(&token)
        .map_err(|e| ApiError::unauthorized(e.to_string()).into_response())?;

    let auth = AuthBand::from(claims);

    // Revocation check against the credential store
    let pool = Database::pool()
        .await
        .map_err(|e| ApiError::from(e).into_response())?;
    let live = tokens::is_live(&pool, auth.token_id, auth.band_id)
        .await
        .map_err(|e| e.into_response())?;
    if !live {
        return Err(ApiError::unauthorized("Token has been revoked").into_response());
    }

    request.extensions_mut().insert(auth);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
