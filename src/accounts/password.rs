//! Argon2id credential hashing. The work is CPU-bound, so both operations run
//! on tokio's blocking pool instead of a runtime worker.

use anyhow::Context;
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tokio::task;

use crate::error::AppError;

fn hash_blocking(plain: &[u8]) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(plain, &salt)?.to_string())
}

/// `Ok(false)` on a wrong password; `Err` only for a stored hash that does
/// not parse or an argon2 failure.
fn verify_blocking(plain: &[u8], stored: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(plain, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub async fn hash_password(plain: &str) -> Result<String, AppError> {
    let plain = plain.as_bytes().to_vec();
    let hash = task::spawn_blocking(move || hash_blocking(&plain))
        .await
        .context("password hashing task")?
        .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))?;
    Ok(hash)
}

pub async fn verify_password(plain: &str, stored: &str) -> Result<bool, AppError> {
    let plain = plain.as_bytes().to_vec();
    let stored = stored.to_string();
    let matches = task::spawn_blocking(move || verify_blocking(&plain, &stored))
        .await
        .context("password verification task")?
        .map_err(|e| anyhow::anyhow!("argon2 verify: {e}"))?;
    Ok(matches)
}
