//! Combined gateway + pinning resolver.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use ethdid_core::error::Result;
use ethdid_core::traits::{DidSource, PinningBackend};
use ethdid_core::types::{
    is_valid_did, EnsDomain, LookupFailure, LookupResult, PublishRejection, PublishResult,
};
use ethdid_pinning::{FilebaseClient, FilebaseConfig};

use crate::gateway::{GatewayClient, GatewayConfig};

/// Message used when no pinning backend is configured.
const PINNING_NOT_CONFIGURED: &str =
    "Filebase not configured. Please set FILEBASE_ACCESS_KEY and FILEBASE_SECRET_KEY in .env";

/// Resolver configuration.
#[derive(Clone, Debug, Default)]
pub struct ResolverConfig {
    /// Gateway configuration
    pub gateway: GatewayConfig,
    /// Filebase configuration; publishing is disabled without it
    pub filebase: Option<FilebaseConfig>,
}

impl ResolverConfig {
    /// Creates a config with the given gateway URL template.
    pub fn with_gateway(url_template: impl Into<String>) -> Self {
        Self {
            gateway: GatewayConfig::new(url_template),
            ..Default::default()
        }
    }

    /// Adds Filebase credentials for the default endpoint and bucket.
    pub fn with_filebase(
        self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.with_filebase_config(FilebaseConfig::new(access_key, secret_key))
    }

    /// Adds a full Filebase configuration.
    pub fn with_filebase_config(mut self, filebase: FilebaseConfig) -> Self {
        self.filebase = Some(filebase);
        self
    }
}

/// Resolves and publishes ATProto DIDs for ENS names.
///
/// Publishing follows create-if-absent semantics:
/// 1. Reject a malformed DID before touching the network
/// 2. Look up what the domain currently serves
/// 3. Reject if it already serves this DID, or a different one
/// 4. Otherwise pin a file containing exactly the DID
///
/// Two concurrent publishes for the same domain can both pass step 3; the
/// backend's last write wins.
#[derive(Clone)]
pub struct AtprotoDidResolver {
    source: Arc<dyn DidSource>,
    backend: Option<Arc<dyn PinningBackend>>,
}

impl AtprotoDidResolver {
    /// Creates a resolver from configuration.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let gateway = GatewayClient::with_config(config.gateway)?;
        let backend = config
            .filebase
            .map(|filebase| Arc::new(FilebaseClient::with_config(filebase)) as Arc<dyn PinningBackend>);

        Ok(Self::from_parts(Arc::new(gateway), backend))
    }

    /// Creates a resolver from already-built collaborators.
    pub fn from_parts(
        source: Arc<dyn DidSource>,
        backend: Option<Arc<dyn PinningBackend>>,
    ) -> Self {
        Self { source, backend }
    }

    /// Returns true if a pinning backend is configured.
    pub fn can_publish(&self) -> bool {
        self.backend.is_some()
    }

    /// Looks up the DID `domain` currently serves.
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn resolve(&self, domain: &EnsDomain) -> LookupResult {
        let result = self.source.lookup(domain).await;
        debug!(found = result.is_found(), "Resolved");
        result
    }

    /// Publishes `requested_did` for `domain` unless a record already exists.
    ///
    /// Surrounding whitespace in `requested_did` is ignored; the pinned file
    /// holds the trimmed DID.
    #[instrument(skip_all, fields(domain = %domain))]
    pub async fn publish(&self, domain: &EnsDomain, requested_did: &str) -> PublishResult {
        let requested = requested_did.trim();
        if !is_valid_did(requested) {
            return PublishResult::rejected(
                PublishRejection::InvalidDid,
                format!("Invalid DID format: {}", requested_did),
            );
        }

        match self.source.lookup(domain).await {
            LookupResult::Found(existing) if existing == *requested => {
                return PublishResult::rejected(
                    PublishRejection::AlreadyExists,
                    format!("File already exists with the same DID: {}", existing),
                );
            }
            LookupResult::Found(existing) => {
                return PublishResult::rejected(
                    PublishRejection::Conflict,
                    format!("File already exists with different DID: {}", existing),
                );
            }
            LookupResult::NotFound {
                reason: LookupFailure::GatewayFailure,
                message,
            } => {
                warn!(%message, "Existing record unknown, publishing anyway");
            }
            LookupResult::NotFound { reason, .. } => {
                debug!(?reason, "No existing record");
            }
        }

        let Some(backend) = &self.backend else {
            return PublishResult::rejected(PublishRejection::PinFailure, PINNING_NOT_CONFIGURED);
        };

        match backend.pin(&domain.object_key(), requested.as_bytes()).await {
            Ok(content_id) => {
                info!(did = requested, content_id = %content_id, "Published DID record");
                PublishResult::Published { content_id }
            }
            Err(e) => {
                warn!(error = %e, backend = backend.name(), "Pin failed");
                PublishResult::rejected(
                    PublishRejection::PinFailure,
                    format!("Failed to pin to {}: {}", backend.name(), e),
                )
            }
        }
    }
}
