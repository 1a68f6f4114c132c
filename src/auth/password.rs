use bcrypt::DEFAULT_COST;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Produce a salted one-way digest of `plain`. The digest embeds its own
/// salt and cost factor, so no extra state needs storing.
pub fn hash(plain: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(plain, DEFAULT_COST)?)
}

/// Check `plain` against a stored digest. Errors mean a malformed digest,
/// not a failed match; constant-time comparison is bcrypt's job.
pub fn verify(plain: &str, digest: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(plain, digest)?)
}
