use std::collections::HashMap;

use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::password;
use crate::database::models::User;
use crate::database::{users, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// POST /users - register a new account. The password is digested before it
/// touches the database and the response never includes it.
pub async fn create(Json(payload): Json<CreateUserRequest>) -> ApiResult<User> {
    validate_registration(&payload)?;

    let digest = password::hash(&payload.password)?;

    let pool = DatabaseManager::pool().await?;
    let user = users::insert(&pool, &payload.email, &digest).await?;
    tracing::info!(user_id = %user.id, "registered new user");

    Ok(ApiResponse::created(user))
}

/// GET /users/:id - public profile lookup, password digest omitted.
pub async fn show(Path(id): Path<Uuid>) -> ApiResult<User> {
    let pool = DatabaseManager::pool().await?;

    let user = users::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user with id: {} does not exist", id)))?;

    Ok(ApiResponse::success(user))
}

fn validate_registration(payload: &CreateUserRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if let Err(msg) = validate_email_format(&payload.email) {
        field_errors.insert("email".to_string(), msg);
    }
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        field_errors.insert(
            "password".to_string(),
            format!("password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid registration input", Some(field_errors)))
    }
}

fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}
