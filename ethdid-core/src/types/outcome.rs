//! Tagged outcomes of lookups and publishes.
//!
//! Neither operation returns `Err`: every failure is folded into one of
//! these variants and carries a reason with a stable wire string.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Did, EnsDomain};

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR TYPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Every `errorType` string the HTTP API can emit.
///
/// Clients branch on these; the serialized names must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// ENS domain has no record at the gateway.
    NoDomain,
    /// Record exists but is empty or not a DID; or a submitted DID is malformed.
    InvalidDid,
    /// Gateway timed out, was unreachable, or answered with an error status.
    GatewayFailure,
    /// The same DID is already published for the domain.
    AlreadyExists,
    /// A different DID is already published for the domain.
    Conflict,
    /// The pinning backend rejected or could not take the write.
    PinFailure,
}

impl ErrorType {
    /// Wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NoDomain => "no_domain",
            ErrorType::InvalidDid => "invalid_did",
            ErrorType::GatewayFailure => "gateway_failure",
            ErrorType::AlreadyExists => "already_exists",
            ErrorType::Conflict => "conflict",
            ErrorType::PinFailure => "pin_failure",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOOKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a lookup found no usable DID.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupFailure {
    /// Domain absent (404 or the gateway host could not be reached).
    NoDomain,
    /// Record empty or malformed.
    InvalidDid,
    /// Timeout, error status, or other transport failure.
    GatewayFailure,
}

impl From<LookupFailure> for ErrorType {
    fn from(reason: LookupFailure) -> Self {
        match reason {
            LookupFailure::NoDomain => ErrorType::NoDomain,
            LookupFailure::InvalidDid => ErrorType::InvalidDid,
            LookupFailure::GatewayFailure => ErrorType::GatewayFailure,
        }
    }
}

/// Outcome of resolving a domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupResult {
    /// The gateway served a valid DID.
    Found(Did),
    /// No usable DID.
    NotFound {
        /// Failure kind
        reason: LookupFailure,
        /// Human-readable detail
        message: String,
    },
}

impl LookupResult {
    /// Builds a `NotFound` outcome.
    pub fn not_found(reason: LookupFailure, message: impl Into<String>) -> Self {
        LookupResult::NotFound {
            reason,
            message: message.into(),
        }
    }

    /// Returns true if a DID was found.
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    /// The resolved DID, if any.
    pub fn did(&self) -> Option<&Did> {
        match self {
            LookupResult::Found(did) => Some(did),
            LookupResult::NotFound { .. } => None,
        }
    }

    /// Failure reason, if any.
    pub fn failure(&self) -> Option<LookupFailure> {
        match self {
            LookupResult::Found(_) => None,
            LookupResult::NotFound { reason, .. } => Some(*reason),
        }
    }

    /// Wire error type, if any.
    pub fn error_type(&self) -> Option<ErrorType> {
        self.failure().map(ErrorType::from)
    }

    /// Failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            LookupResult::Found(_) => None,
            LookupResult::NotFound { message, .. } => Some(message),
        }
    }

    /// Interprets the body of a served `.well-known/atproto-did` file.
    ///
    /// Surrounding whitespace is ignored. An empty or malformed body is
    /// `InvalidDid`.
    pub fn from_record(domain: &EnsDomain, body: &str) -> Self {
        let content = body.trim();

        if content.is_empty() {
            return LookupResult::not_found(
                LookupFailure::InvalidDid,
                format!(
                    "ENS domain '{}' exists but .well-known/atproto-did file is empty",
                    domain
                ),
            );
        }

        match Did::parse(content) {
            Ok(did) => LookupResult::Found(did),
            Err(_) => LookupResult::not_found(
                LookupFailure::InvalidDid,
                format!(
                    "ENS domain '{}' exists but .well-known/atproto-did content is not a valid DID: {}",
                    domain, content
                ),
            ),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLISH
// ═══════════════════════════════════════════════════════════════════════════════

/// Why a publish did not write anything (or the write failed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishRejection {
    /// Submitted DID is malformed. Checked before any network call.
    InvalidDid,
    /// The domain already serves this exact DID.
    AlreadyExists,
    /// The domain already serves a different DID.
    Conflict,
    /// Backend write failed or the backend is not configured.
    PinFailure,
}

impl From<PublishRejection> for ErrorType {
    fn from(reason: PublishRejection) -> Self {
        match reason {
            PublishRejection::InvalidDid => ErrorType::InvalidDid,
            PublishRejection::AlreadyExists => ErrorType::AlreadyExists,
            PublishRejection::Conflict => ErrorType::Conflict,
            PublishRejection::PinFailure => ErrorType::PinFailure,
        }
    }
}

/// Outcome of publishing a DID record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishResult {
    /// The record was pinned.
    Published {
        /// IPFS content identifier reported by the backend
        content_id: String,
    },
    /// Nothing was published.
    Rejected {
        /// Rejection kind
        reason: PublishRejection,
        /// Human-readable detail
        message: String,
    },
}

impl PublishResult {
    /// Builds a `Rejected` outcome.
    pub fn rejected(reason: PublishRejection, message: impl Into<String>) -> Self {
        PublishResult::Rejected {
            reason,
            message: message.into(),
        }
    }

    /// Returns true if the record was pinned.
    pub fn is_published(&self) -> bool {
        matches!(self, PublishResult::Published { .. })
    }

    /// The content identifier, if published.
    pub fn content_id(&self) -> Option<&str> {
        match self {
            PublishResult::Published { content_id } => Some(content_id),
            PublishResult::Rejected { .. } => None,
        }
    }

    /// Rejection reason, if any.
    pub fn rejection(&self) -> Option<PublishRejection> {
        match self {
            PublishResult::Published { .. } => None,
            PublishResult::Rejected { reason, .. } => Some(*reason),
        }
    }

    /// Wire error type, if any.
    pub fn error_type(&self) -> Option<ErrorType> {
        self.rejection().map(ErrorType::from)
    }

    /// Rejection message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            PublishResult::Published { .. } => None,
            PublishResult::Rejected { message, .. } => Some(message),
        }
    }
}
