//! Identity management for the remote backend.
//!
//! The remote task service scopes queries by an email-like key. dz
//! treats it as opaque: no validation beyond non-emptiness, no
//! interpretation. Resolution order:
//! 1) CLI --email (explicit)
//! 2) DZ_EMAIL environment variable
//! 3) Persisted value from `dz login`

use crate::error::{Error, Result};
use crate::storage::Storage;

/// Resolve the current identity using CLI, environment, and the
/// persisted value, in that order.
pub fn resolve_identity(storage: &Storage, cli_email: Option<&str>) -> Result<Option<String>> {
    if let Some(email) = non_empty(cli_email) {
        return Ok(Some(email.to_string()));
    }

    if let Ok(env_email) = std::env::var("DZ_EMAIL") {
        if let Some(email) = non_empty(Some(env_email.as_str())) {
            return Ok(Some(email.to_string()));
        }
    }

    load_persisted_identity(storage)
}

/// Persist the identity (the sign-in action).
pub fn persist_identity(storage: &Storage, email: &str) -> Result<()> {
    let email = non_empty(Some(email))
        .ok_or_else(|| Error::InvalidArgument("email cannot be empty".to_string()))?;

    storage.init()?;
    std::fs::write(storage.identity_file(), format!("{email}\n"))?;
    Ok(())
}

/// Remove the persisted identity (the sign-out action). Signing out
/// when nobody is signed in is fine.
pub fn clear_identity(storage: &Storage) -> Result<Option<String>> {
    let current = load_persisted_identity(storage)?;
    let path = storage.identity_file();
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(current)
}

/// Load the persisted identity, if present.
pub fn load_persisted_identity(storage: &Storage) -> Result<Option<String>> {
    let path = storage.identity_file();
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    let email = raw.trim();
    if email.is_empty() {
        return Ok(None);
    }

    Ok(Some(email.to_string()))
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
