//! App state: resolver and config.

use ethdid_core::constants::{
    DEFAULT_FILEBASE_BUCKET, DEFAULT_FILEBASE_ENDPOINT, DEFAULT_FILEBASE_REGION,
    DEFAULT_GATEWAY_URL_TEMPLATE,
};
use ethdid_core::error::Result;
use ethdid_resolver::{AtprotoDidResolver, FilebaseConfig, ResolverConfig};

/// Process-wide configuration, read once at startup.
#[derive(Clone)]
pub struct ApiConfig {
    /// Gateway URL with a `{domain}` placeholder
    pub gateway_url_template: String,
    /// Filebase access key
    pub filebase_access_key: Option<String>,
    /// Filebase secret key
    pub filebase_secret_key: Option<String>,
    /// Bucket DID records are written to
    pub filebase_bucket: String,
    /// Filebase S3 endpoint
    pub filebase_endpoint: String,
    /// SigV4 signing region
    pub filebase_region: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            gateway_url_template: DEFAULT_GATEWAY_URL_TEMPLATE.into(),
            filebase_access_key: None,
            filebase_secret_key: None,
            filebase_bucket: DEFAULT_FILEBASE_BUCKET.into(),
            filebase_endpoint: DEFAULT_FILEBASE_ENDPOINT.into(),
            filebase_region: DEFAULT_FILEBASE_REGION.into(),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("gateway_url_template", &self.gateway_url_template)
            .field("filebase_access_key", &self.filebase_access_key)
            .field("filebase_secret_key", &self.filebase_secret_key.as_ref().map(|_| "<redacted>"))
            .field("filebase_bucket", &self.filebase_bucket)
            .field("filebase_endpoint", &self.filebase_endpoint)
            .field("filebase_region", &self.filebase_region)
            .finish()
    }
}

impl ApiConfig {
    /// Reads configuration from the environment, loading `.env` first if
    /// present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            gateway_url_template: non_empty("GATEWAY_URL_TEMPLATE")
                .unwrap_or(defaults.gateway_url_template),
            filebase_access_key: non_empty("FILEBASE_ACCESS_KEY"),
            filebase_secret_key: non_empty("FILEBASE_SECRET_KEY"),
            filebase_bucket: non_empty("FILEBASE_BUCKET").unwrap_or(defaults.filebase_bucket),
            filebase_endpoint: non_empty("FILEBASE_ENDPOINT").unwrap_or(defaults.filebase_endpoint),
            filebase_region: non_empty("FILEBASE_REGION").unwrap_or(defaults.filebase_region),
        }
    }

    /// Resolver configuration; Filebase is enabled only when both keys are set.
    pub fn resolver_config(&self) -> ResolverConfig {
        let config = ResolverConfig::with_gateway(&self.gateway_url_template);

        match (&self.filebase_access_key, &self.filebase_secret_key) {
            (Some(access_key), Some(secret_key)) => config.with_filebase_config(
                FilebaseConfig::new(access_key, secret_key)
                    .with_endpoint(&self.filebase_endpoint)
                    .with_bucket(&self.filebase_bucket)
                    .with_region(&self.filebase_region),
            ),
            _ => config,
        }
    }
}

/// Shared, read-only state handed to every handler.
pub struct AppState {
    /// Lookup and publish logic
    pub resolver: AtprotoDidResolver,
}

impl AppState {
    /// Builds the resolver described by `config`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let resolver = AtprotoDidResolver::with_config(config.resolver_config())?;
        Ok(Self::with_resolver(resolver))
    }

    /// Uses an already-built resolver.
    pub fn with_resolver(resolver: AtprotoDidResolver) -> Self {
        Self { resolver }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.filebase_bucket, "atproto-did");
        assert_eq!(config.filebase_endpoint, "https://s3.filebase.com");
        assert!(config.resolver_config().filebase.is_none());
    }

    #[test]
    fn test_filebase_needs_both_keys() {
        let config = config_from(&[("FILEBASE_ACCESS_KEY", "key")]);
        assert!(config.resolver_config().filebase.is_none());

        let config = config_from(&[
            ("FILEBASE_ACCESS_KEY", "key"),
            ("FILEBASE_SECRET_KEY", "secret"),
            ("FILEBASE_BUCKET", "dids"),
        ]);
        let filebase = config.resolver_config().filebase.unwrap();
        assert_eq!(filebase.bucket, "dids");
        assert_eq!(filebase.access_key, "key");
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = config_from(&[("FILEBASE_BUCKET", ""), ("FILEBASE_SECRET_KEY", "  ")]);
        assert_eq!(config.filebase_bucket, "atproto-did");
        assert!(config.filebase_secret_key.is_none());
    }

    #[tokio::test]
    async fn test_app_state_enables_publishing_from_config() {
        let state = AppState::new(&config_from(&[])).unwrap();
        assert!(!state.resolver.can_publish());

        let config = config_from(&[
            ("FILEBASE_ACCESS_KEY", "key"),
            ("FILEBASE_SECRET_KEY", "secret"),
        ]);
        let state = AppState::new(&config).unwrap();
        assert!(state.resolver.can_publish());
    }

    #[test]
    fn test_bad_gateway_template_fails_startup() {
        let config = config_from(&[("GATEWAY_URL_TEMPLATE", "https://example.com/")]);
        assert!(AppState::new(&config).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = config_from(&[("FILEBASE_SECRET_KEY", "super-secret")]);
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
