//! In-memory pin store.
//!
//! Objects live in a map keyed like the S3 bucket, and every object gets a
//! real CIDv1 (raw codec, sha2-256). The store also answers DID lookups
//! from its own contents, so it can stand in for both the gateway and the
//! backend in a round trip.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cid::Cid;
use multihash::Multihash;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::debug;

use ethdid_core::error::{EthDidError, Result};
use ethdid_core::traits::{DidSource, PinningBackend};
use ethdid_core::types::{EnsDomain, LookupFailure, LookupResult};

/// Multicodec code for raw binary content.
const RAW_CODEC: u64 = 0x55;

/// Multihash code for sha2-256.
const SHA2_256_CODE: u64 = 0x12;

/// Computes the CIDv1 (raw, sha2-256, base32) of `content`.
pub fn content_id(content: &[u8]) -> Result<String> {
    let digest = Sha256::digest(content);
    let hash = Multihash::<64>::wrap(SHA2_256_CODE, &digest)
        .map_err(|e| EthDidError::InternalError(format!("multihash: {}", e)))?;
    Ok(Cid::new_v1(RAW_CODEC, hash).to_string())
}

/// Thread-safe in-memory pinning backend.
#[derive(Default)]
pub struct MemoryPinStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    pins: AtomicU64,
}

impl MemoryPinStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the content stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().get(key).cloned()
    }

    /// Stores `content` under `key` without counting it as a pin.
    ///
    /// Useful to seed a record that was "published elsewhere".
    pub fn insert(&self, key: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.objects.write().insert(key.into(), content.into());
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Number of successful `pin` calls.
    pub fn pin_count(&self) -> u64 {
        self.pins.load(Ordering::Relaxed)
    }

    /// Removes every object.
    pub fn clear(&self) {
        self.objects.write().clear();
    }
}

#[async_trait]
impl PinningBackend for MemoryPinStore {
    async fn pin(&self, key: &str, content: &[u8]) -> Result<String> {
        let cid = content_id(content)?;
        self.objects.write().insert(key.to_string(), content.to_vec());
        self.pins.fetch_add(1, Ordering::Relaxed);

        debug!(key, cid = %cid, "Pinned in memory");
        Ok(cid)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl DidSource for MemoryPinStore {
    async fn lookup(&self, domain: &EnsDomain) -> LookupResult {
        match self.get(&domain.object_key()) {
            None => LookupResult::not_found(
                LookupFailure::NoDomain,
                format!("ENS domain '{}' is not registered", domain),
            ),
            Some(bytes) => LookupResult::from_record(domain, &String::from_utf8_lossy(&bytes)),
        }
    }
}
