//! Interfaces to the two external collaborators.
//!
//! The gateway and the pinning backend sit behind these traits so the
//! publish flow can run against in-memory implementations in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EnsDomain, LookupResult};

/// Something that can tell which DID a domain currently serves.
///
/// Implementations never fail: transport problems become
/// [`LookupResult::NotFound`] with a gateway-failure reason.
#[async_trait]
pub trait DidSource: Send + Sync {
    /// Looks up the DID record for `domain`.
    async fn lookup(&self, domain: &EnsDomain) -> LookupResult;
}

/// Content-addressed storage that pins objects to IPFS.
#[async_trait]
pub trait PinningBackend: Send + Sync {
    /// Stores `content` under `key` and returns the content identifier the
    /// backend assigned.
    async fn pin(&self, key: &str, content: &[u8]) -> Result<String>;

    /// Short name used in logs and error messages.
    fn name(&self) -> &str;
}
