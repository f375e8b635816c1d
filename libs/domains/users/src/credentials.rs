//! Password hashing and API token issuing.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHasher, SaltString,
        rand_core::{OsRng, RngCore},
    },
};

use crate::error::{UserError, UserResult};

/// Random bytes per API token (hex-encoded to twice this length)
pub const API_TOKEN_BYTES: usize = 32;

pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

/// Fresh opaque API token from the OS random source.
pub fn generate_api_token() -> UserResult<String> {
    let mut bytes = [0u8; API_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| UserError::Internal(format!("Failed to generate API token: {}", e)))?;

    Ok(const_hex::encode(bytes))
}
