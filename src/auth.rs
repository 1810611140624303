//! Pre-shared token gate for the computation boundary.
//!
//! The engine never authorizes anything itself; whichever surface
//! receives a payload calls [`guard`] before computing, and a rejection
//! is a distinct outcome that no record content can produce.

use thiserror::Error;

/// Environment variable holding the expected pre-shared token.
pub const TOKEN_ENV: &str = "INTERNAL_TOKEN";

/// Fallback token for local development.
pub const DEV_TOKEN: &str = "dev-token";

/// Rejection raised before any computation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The caller's token is missing, empty, or does not match.
    #[error("unauthorized")]
    Unauthorized,
}

/// Checks a caller-supplied token against the expected one.
pub fn guard(provided: Option<&str>, expected: &str) -> Result<(), AuthError> {
    match provided {
        Some(token) if !token.is_empty() && token == expected => Ok(()),
        _ => Err(AuthError::Unauthorized),
    }
}
