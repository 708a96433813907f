//! DTOs for API requests and responses.
//!
//! Field names match what existing clients already parse, including the
//! camel-cased `errorType`. Absent values are serialized as `null`.

use serde::{Deserialize, Serialize};
use ethdid_core::types::{ErrorType, LookupResult, PublishResult};

/// Body of `POST /atproto-did/:domain`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDidRequest {
    /// ENS domain; must equal the path segment
    pub domain: String,
    /// DID to publish
    pub did: String,
}

/// Response for a DID lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    /// Whether a valid DID was found
    pub success: bool,
    /// The DID, when found
    pub did: Option<String>,
    /// Failure detail
    pub error: Option<String>,
    /// Failure kind
    #[serde(rename = "errorType")]
    pub error_type: Option<ErrorType>,
}

impl From<LookupResult> for LookupResponse {
    fn from(result: LookupResult) -> Self {
        match result {
            LookupResult::Found(did) => Self {
                success: true,
                did: Some(did.into_inner()),
                error: None,
                error_type: None,
            },
            LookupResult::NotFound { reason, message } => Self {
                success: false,
                did: None,
                error: Some(message),
                error_type: Some(reason.into()),
            },
        }
    }
}

/// Response for a publish.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    /// Whether the record was pinned
    pub success: bool,
    /// IPFS content identifier of the pinned record
    pub ipfs_hash: Option<String>,
    /// Failure detail
    pub error: Option<String>,
    /// Failure kind
    #[serde(rename = "errorType")]
    pub error_type: Option<ErrorType>,
}

impl From<PublishResult> for PublishResponse {
    fn from(result: PublishResult) -> Self {
        match result {
            PublishResult::Published { content_id } => Self {
                success: true,
                ipfs_hash: Some(content_id),
                error: None,
                error_type: None,
            },
            PublishResult::Rejected { reason, message } => Self {
                success: false,
                ipfs_hash: None,
                error: Some(message),
                error_type: Some(reason.into()),
            },
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy"
    pub status: String,
}
