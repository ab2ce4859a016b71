//! Out-of-band signing credential

use tracing::debug;

use crate::error::{BridgeError, Result};

/// Environment variable read by [`credential_from_env`] when callers have no preference.
pub const DEFAULT_CREDENTIAL_VAR: &str = "PRIVATE_KEY";

/// Reads the sender credential from the process environment.
///
/// A `.env` file in the working directory, if present, is loaded first. Variables
/// already set in the environment take precedence over the file.
///
/// # Errors
///
/// Returns [`BridgeError::MissingCredential`] if the variable is unset or blank.
pub fn credential_from_env(var: &str) -> Result<String> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), event = "dotenv_loaded");
    }

    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(BridgeError::MissingCredential {
            var: var.to_string(),
        }),
    }
}
