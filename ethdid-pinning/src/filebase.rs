//! Filebase client implementation.
//!
//! Objects are written with `PutObject`; Filebase pins them to IPFS and
//! reports the CID as the `cid` user-metadata entry on the object.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use ethdid_core::constants::{
    DEFAULT_FILEBASE_BUCKET, DEFAULT_FILEBASE_ENDPOINT, DEFAULT_FILEBASE_REGION, DID_CONTENT_TYPE,
    PINNED_WITHOUT_CID,
};
use ethdid_core::error::{EthDidError, Result};
use ethdid_core::traits::PinningBackend;

/// Metadata keys Filebase may use for the IPFS CID, in lookup order.
const CID_METADATA_KEYS: [&str; 2] = ["cid", "ipfs-hash"];

/// Filebase client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct FilebaseConfig {
    /// S3 endpoint (e.g. "https://s3.filebase.com")
    pub endpoint: String,
    /// Bucket DID records are written to
    pub bucket: String,
    /// SigV4 signing region
    pub region: String,
    /// Access key ID
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
}

impl FilebaseConfig {
    /// Creates a config for the public Filebase endpoint and default bucket.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_FILEBASE_ENDPOINT.into(),
            bucket: DEFAULT_FILEBASE_BUCKET.into(),
            region: DEFAULT_FILEBASE_REGION.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Overrides the S3 endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the bucket.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Overrides the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

impl std::fmt::Debug for FilebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilebaseConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Pins DID records through Filebase's S3 API.
#[derive(Clone)]
pub struct FilebaseClient {
    config: FilebaseConfig,
    s3: aws_sdk_s3::Client,
}

impl FilebaseClient {
    /// Creates a client with custom configuration.
    ///
    /// Path-style addressing is forced and SDK retries are disabled; a
    /// failed write surfaces immediately.
    pub fn with_config(config: FilebaseConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "ethdid-filebase",
        );

        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .force_path_style(true)
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .build();

        Self {
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            config,
        }
    }

    /// Reads the CID Filebase attached to `key`, if any.
    ///
    /// Only `x-amz-meta-*` headers reach us, as user metadata; a bare
    /// `x-ipfs-cid` response header is not exposed by the SDK and is ignored.
    ///
    /// A failing `HeadObject` is logged and treated as "unknown"; the object
    /// itself is already pinned at this point.
    async fn read_cid(&self, key: &str) -> Option<String> {
        match self
            .s3
            .head_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(head) => cid_from_metadata(head.metadata()),
            Err(e) => {
                warn!(key, error = %DisplayErrorContext(&e), "HeadObject failed after upload");
                None
            }
        }
    }
}

#[async_trait]
impl PinningBackend for FilebaseClient {
    #[instrument(skip(self, content), fields(bucket = %self.config.bucket, size = content.len()))]
    async fn pin(&self, key: &str, content: &[u8]) -> Result<String> {
        let put = self
            .s3
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(DID_CONTENT_TYPE)
            .body(ByteStream::from(content.to_vec()))
            .send()
            .await
            .map_err(|e| EthDidError::PinFailed {
                key: key.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(key, etag = ?put.e_tag(), "Uploaded object");

        let cid = match self.read_cid(key).await {
            Some(cid) => cid,
            None => cid_from_etag(put.e_tag()).unwrap_or_else(|| PINNED_WITHOUT_CID.to_string()),
        };

        info!(key, cid = %cid, "Pinned to Filebase");
        Ok(cid)
    }

    fn name(&self) -> &str {
        "Filebase"
    }
}

fn cid_from_metadata(metadata: Option<&HashMap<String, String>>) -> Option<String> {
    let metadata = metadata?;
    CID_METADATA_KEYS
        .iter()
        .filter_map(|key| metadata.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn cid_from_etag(etag: Option<&str>) -> Option<String> {
    let etag = etag?.trim().trim_matches('"');
    if etag.is_empty() {
        None
    } else {
        Some(etag.to_string())
    }
}
