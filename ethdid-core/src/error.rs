//! Error types for ethdid.
//!
//! Library code returns [`Result`]; the resolver and publisher fold these
//! errors into tagged outcomes before they reach an HTTP response.

use thiserror::Error;

/// Result type alias using `EthDidError`.
pub type Result<T> = std::result::Result<T, EthDidError>;

/// Main error type for all ethdid operations.
#[derive(Debug, Error)]
pub enum EthDidError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// String is not a syntactically valid DID.
    #[error("Invalid DID format: {0}")]
    InvalidDid(String),

    /// Domain is not an ENS `.eth` name.
    #[error("Domain must end with .eth: {0}")]
    InvalidDomain(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // GATEWAY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Gateway URL could not be built for a domain.
    #[error("Invalid gateway URL '{url}': {reason}")]
    InvalidGatewayUrl {
        /// URL after domain substitution
        url: String,
        /// Parser error
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // PINNING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upload to the pinning backend failed.
    #[error("Pin failed for '{key}': {reason}")]
    PinFailed {
        /// Object key that was being written
        key: String,
        /// Backend error, with context
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // OTHER
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl EthDidError {
    /// Returns true if this error is caused by caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            EthDidError::InvalidDid(_) | EthDidError::InvalidDomain(_)
        )
    }
}
