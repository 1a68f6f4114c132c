use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, password, Claims};
use crate::database::{users, DatabaseManager};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /login - exchange email + password for a bearer token.
///
/// Unknown email and wrong password produce the identical 401 so the
/// endpoint cannot be used to enumerate registered accounts.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<TokenResponse> {
    let pool = DatabaseManager::pool().await?;

    let user = users::find_by_email(&pool, &payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !password::verify(&payload.password, &user.password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = auth::generate_jwt(Claims::new(user.id))?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(ApiResponse::success(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
