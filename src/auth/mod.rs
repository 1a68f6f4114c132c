use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod password;

/// Claims carried by an access token. A token is Valid exactly when the
/// signature checks out and `exp` is in the future; there is no refresh
/// path, clients re-login to get a new token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_minutes = config::config().security.token_expiry_minutes;
        let exp = (now + Duration::minutes(expiry_minutes as i64)).timestamp();

        Self {
            user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    TokenValidation(String),
    InvalidSecret,
    UnsupportedAlgorithm(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::TokenValidation(msg) => write!(f, "JWT validation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::UnsupportedAlgorithm(alg) => write!(f, "Unsupported JWT algorithm: {}", alg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Resolve the configured signing algorithm. Only HMAC variants make sense
/// with a shared-secret key.
fn signing_algorithm() -> Result<Algorithm, JwtError> {
    match config::config().security.jwt_algorithm.as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(JwtError::UnsupportedAlgorithm(other.to_string())),
    }
}

pub fn generate_jwt(claims: Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    let algorithm = signing_algorithm()?;
    encode_with_secret(&claims, secret, algorithm)
}

pub fn decode_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    let algorithm = signing_algorithm()?;
    decode_with_secret(token, secret, algorithm)
}

fn encode_with_secret(claims: &Claims, secret: &str, algorithm: Algorithm) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::new(algorithm);

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn decode_with_secret(token: &str, secret: &str, algorithm: Algorithm) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(algorithm);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::TokenValidation(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_expiring_in(minutes: i64) -> Claims {
        let now = Utc::now();
        Claims {
            user_id: Uuid::new_v4(),
            exp: (now + Duration::minutes(minutes)).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn round_trips_user_id() {
        let claims = claims_expiring_in(5);
        let user_id = claims.user_id;

        let token = encode_with_secret(&claims, "test-secret", Algorithm::HS256).unwrap();
        let decoded = decode_with_secret(&token, "test-secret", Algorithm::HS256).unwrap();

        assert_eq!(decoded.user_id, user_id);
    }

    #[test]
    fn rejects_expired_token() {
        // jsonwebtoken applies default expiry leeway, so go well past it
        let claims = claims_expiring_in(-5);
        let token = encode_with_secret(&claims, "test-secret", Algorithm::HS256).unwrap();

        let err = decode_with_secret(&token, "test-secret", Algorithm::HS256).unwrap_err();
        assert!(matches!(err, JwtError::TokenValidation(_)));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = encode_with_secret(&claims_expiring_in(5), "test-secret", Algorithm::HS256).unwrap();

        let err = decode_with_secret(&token, "other-secret", Algorithm::HS256).unwrap_err();
        assert!(matches!(err, JwtError::TokenValidation(_)));
    }

    #[test]
    fn rejects_garbage_token() {
        let err = decode_with_secret("not-a-jwt", "test-secret", Algorithm::HS256).unwrap_err();
        assert!(matches!(err, JwtError::TokenValidation(_)));
    }

    #[test]
    fn refuses_empty_secret() {
        let err = encode_with_secret(&claims_expiring_in(5), "", Algorithm::HS256).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSecret));
    }
}
