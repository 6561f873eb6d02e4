//! Band account endpoints: register, login, logout, me.

use axum::{http::StatusCode, response::Json, Extension};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, password, Claims};
use crate::database::repo::{bands, tokens};
use crate::database::Database;
use crate::error::ApiError;
use crate::middleware::AuthBand;
use crate::validation::{
    add_error, bail, optional_string, required_email, required_string, FieldErrors,
};

use crate::database::models::{Band, Plan};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
    pub plan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /register - create a band account and issue a token
pub async fn register(
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Field validation runs before any database work
    let mut errors = FieldErrors::new();
    let nome = required_string(&mut errors, "nome", body.nome.as_deref(), 50);
    let email = required_email(&mut errors, "email", body.email.as_deref(), 100);
    let password = validate_password(
        &mut errors,
        body.password.as_deref(),
        body.password_confirmation.as_deref(),
    );
    let plan = validate_plan(&mut errors, body.plan.as_deref());
    bail(errors)?;

    // All fields present once bail passed
    let (nome, email, password) = (nome.unwrap(), email.unwrap(), password.unwrap());

    let pool = Database::pool().await?;

    if bands::email_taken(&pool, &email).await? {
        return Err(bands::duplicate_email_error());
    }

    let hash = password::hash_password(&password).map_err(|e| {
        tracing::error!("password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to create account")
    })?;

    let band = bands::create(
        &pool,
        bands::NewBand {
            nome,
            email,
            password_hash: hash,
            plan,
        },
    )
    .await?;

    let token = issue_token(&pool, &band).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Band registered successfully",
            "banda": band,
            "token": token,
        })),
    ))
}

/// POST /login - authenticate with email/password and issue a token
pub async fn login(Json(body): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    let email = required_email(&mut errors, "email", body.email.as_deref(), 100);
    let password = required_string(&mut errors, "password", body.password.as_deref(), 255);
    bail(errors)?;

    let (email, password) = (email.unwrap(), password.unwrap());

    let pool = Database::pool().await?;

    // Unknown email and wrong password produce the same generic error so
    // login cannot be used to probe which emails are registered.
    let band = bands::find_by_email(&pool, &email).await?;
    let verified = match &band {
        Some(band) => password::verify_password(&password, &band.password).map_err(|e| {
            tracing::error!("stored password hash is malformed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?,
        None => false,
    };

    if !verified {
        return Err(credential_error());
    }
    let band = band.unwrap();

    let token = issue_token(&pool, &band).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "banda": band,
        "token": token,
    })))
}

/// POST /logout - revoke the current token
pub async fn logout(Extension(auth): Extension<AuthBand>) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    tokens::revoke(&pool, auth.token_id).await?;

    Ok(Json(json!({
        "message": "Logout successful",
    })))
}

/// GET /me - return the authenticated band
pub async fn me(Extension(auth): Extension<AuthBand>) -> Result<Json<Value>, ApiError> {
    let pool = Database::pool().await?;
    let band = bands::find_by_id(&pool, auth.band_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(Json(json!({
        "banda": band,
    })))
}

async fn issue_token(pool: &sqlx::PgPool, band: &Band) -> Result<String, ApiError> {
    let token = tokens::issue(pool, band.id).await?;
    generate_jwt(Claims::new(band.id, token.id)).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })
}

fn credential_error() -> ApiError {
    let mut fields = FieldErrors::new();
    fields.insert(
        "email".to_string(),
        "The provided credentials are incorrect".to_string(),
    );
    ApiError::unprocessable_entity("The given data was invalid", fields)
}

fn validate_password(
    errors: &mut FieldErrors,
    password: Option<&str>,
    confirmation: Option<&str>,
) -> Option<String> {
    let password = required_string(errors, "password", password, 255)?;
    if password.chars().count() < 8 {
        add_error(errors, "password", "The password must be at least 8 characters");
        return None;
    }
    if confirmation != Some(password.as_str()) {
        add_error(errors, "password", "The password confirmation does not match");
        return None;
    }
    Some(password)
}

fn validate_plan(errors: &mut FieldErrors, plan: Option<&str>) -> Plan {
    match optional_string(errors, "plan", plan, 10) {
        Some(label) => match Plan::parse(&label) {
            Some(plan) => plan,
            None => {
                add_error(errors, "plan", "The selected plan is invalid");
                Plan::default()
            }
        },
        None => Plan::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_requires_min_length_and_confirmation() {
        let mut errors = FieldErrors::new();
        assert!(validate_password(&mut errors, Some("short"), Some("short")).is_none());
        assert!(errors["password"].contains("at least 8"));

        let mut errors = FieldErrors::new();
        assert!(validate_password(&mut errors, Some("long enough"), Some("different")).is_none());
        assert!(errors["password"].contains("confirmation"));

        let mut errors = FieldErrors::new();
        assert_eq!(
            validate_password(&mut errors, Some("long enough"), Some("long enough")).as_deref(),
            Some("long enough")
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn plan_defaults_to_free_and_rejects_unknown_labels() {
        let mut errors = FieldErrors::new();
        assert_eq!(validate_plan(&mut errors, None), Plan::Free);
        assert_eq!(validate_plan(&mut errors, Some("pro")), Plan::Pro);
        assert!(errors.is_empty());

        validate_plan(&mut errors, Some("enterprise"));
        assert!(errors.contains_key("plan"));
    }

    #[test]
    fn credential_error_shape_is_generic() {
        let err = credential_error();
        assert_eq!(err.status_code(), 422);
        let body = err.to_json();
        assert_eq!(body["field_errors"]["email"], "The provided credentials are incorrect");
    }
}
