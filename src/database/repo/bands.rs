//! Band (tenant) account queries. These back registration and login and
//! are the only queries that are not tenant-scoped: a band row is the
//! tenant itself.

use sqlx::PgPool;

use crate::database::models::{Band, Plan};
use crate::error::ApiError;

pub struct NewBand {
    pub nome: String,
    pub email: String,
    /// Already hashed; plaintext never reaches this layer
    pub password_hash: String,
    pub plan: Plan,
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Band>, ApiError> {
    let band = sqlx::query_as::<_, Band>("SELECT * FROM bandas WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(band)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Band>, ApiError> {
    let band = sqlx::query_as::<_, Band>("SELECT * FROM bandas WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(band)
}

pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, ApiError> {
    let (taken,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM bandas WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(taken)
}

pub async fn create(pool: &PgPool, new: NewBand) -> Result<Band, ApiError> {
    let band = sqlx::query_as::<_, Band>(
        "INSERT INTO bandas (nome, email, password, plan) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(new.nome)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.plan.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        // A concurrent registration can win the race between the
        // pre-insert uniqueness check and this insert; the constraint
        // violation gets the same 422 shape as the check itself.
        if is_unique_violation(&e) {
            duplicate_email_error()
        } else {
            e.into()
        }
    })?;
    Ok(band)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

pub fn duplicate_email_error() -> ApiError {
    let mut fields = std::collections::HashMap::new();
    fields.insert(
        "email".to_string(),
        "The email has already been taken".to_string(),
    );
    ApiError::unprocessable_entity("The given data was invalid", fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_a_422_field_error() {
        let err = duplicate_email_error();
        assert_eq!(err.status_code(), 422);
        let body = err.to_json();
        assert_eq!(body["field_errors"]["email"], "The email has already been taken");
    }

    #[test]
    fn only_constraint_violations_map_to_the_duplicate_error() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }
}
