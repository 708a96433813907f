//! DID syntax validation.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::DID_PATTERN;
use crate::error::{EthDidError, Result};

static DID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DID_PATTERN).expect("DID pattern must compile"));

/// Returns true iff `candidate` matches `did:<method>:<identifier>`.
///
/// The check is exact: surrounding whitespace makes the string invalid.
/// Callers that accept untrimmed input trim before calling.
pub fn is_valid_did(candidate: &str) -> bool {
    DID_REGEX.is_match(candidate)
}

/// A decentralized identifier that passed [`is_valid_did`].
///
/// Nothing beyond the method and identifier split is parsed; `did:plc:...`
/// and `did:web:...` are treated alike.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    /// Validates `value` and wraps it.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if is_valid_did(&value) {
            Ok(Self(value))
        } else {
            Err(EthDidError::InvalidDid(value))
        }
    }

    /// Returns the DID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the method, e.g. `plc` for `did:plc:abc123`.
    pub fn method(&self) -> &str {
        self.split().0
    }

    /// Returns everything after the method, e.g. `abc123`.
    pub fn identifier(&self) -> &str {
        self.split().1
    }

    /// Consumes the DID, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    fn split(&self) -> (&str, &str) {
        let rest = self.0.strip_prefix("did:").unwrap_or(&self.0);
        rest.split_once(':').unwrap_or((rest, ""))
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Did {
    type Err = EthDidError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = EthDidError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}

impl AsRef<str> for Did {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Did {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
