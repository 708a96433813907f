//! Constants shared across ethdid crates.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// DID SYNTAX
// ═══════════════════════════════════════════════════════════════════════════════

/// Pattern a DID must match: `did:<method>:<identifier>`.
///
/// The method is lowercase alphanumeric; the identifier allows
/// `[A-Za-z0-9._:%-]`.
pub const DID_PATTERN: &str = r"^did:[a-z0-9]+:[a-zA-Z0-9._:%-]+$";

// ═══════════════════════════════════════════════════════════════════════════════
// ENS
// ═══════════════════════════════════════════════════════════════════════════════

/// Suffix accepted ENS domains must carry.
pub const ENS_SUFFIX: &str = ".eth";

/// Path of the ATProto DID record relative to a domain root.
pub const WELL_KNOWN_PATH: &str = ".well-known/atproto-did";

// ═══════════════════════════════════════════════════════════════════════════════
// GATEWAY
// ═══════════════════════════════════════════════════════════════════════════════

/// Placeholder substituted with the ENS domain in gateway URL templates.
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Default gateway URL. `name.eth` is served by `name.eth.link`.
pub const DEFAULT_GATEWAY_URL_TEMPLATE: &str =
    "https://{domain}.link/.well-known/atproto-did";

/// Timeout for a single gateway lookup. Lookups are never retried.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

// ═══════════════════════════════════════════════════════════════════════════════
// PINNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default Filebase S3 endpoint.
pub const DEFAULT_FILEBASE_ENDPOINT: &str = "https://s3.filebase.com";

/// Default bucket holding DID records.
pub const DEFAULT_FILEBASE_BUCKET: &str = "atproto-did";

/// Signing region. Filebase ignores it but SigV4 needs one.
pub const DEFAULT_FILEBASE_REGION: &str = "us-east-1";

/// Content type of pinned DID records.
pub const DID_CONTENT_TYPE: &str = "text/plain";

/// Reported in place of a CID when the backend accepted the object but did
/// not reveal its content identifier.
pub const PINNED_WITHOUT_CID: &str = "pinned";
