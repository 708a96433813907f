//! ENS domain names.

use std::fmt;

use serde::Serialize;

use crate::constants::{ENS_SUFFIX, WELL_KNOWN_PATH};
use crate::error::{EthDidError, Result};

/// An ENS name such as `alice.eth` or `bot.reality.eth`.
///
/// Only the `.eth` suffix is checked; the name is otherwise passed through
/// as given, without case folding or normalization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EnsDomain(String);

impl EnsDomain {
    /// Wraps `name` if it ends with `.eth`.
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.ends_with(ENS_SUFFIX) {
            Ok(Self(name))
        } else {
            Err(EthDidError::InvalidDomain(name))
        }
    }

    /// Returns the domain as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Object key the DID record is pinned under,
    /// e.g. `alice.eth/.well-known/atproto-did`.
    pub fn object_key(&self) -> String {
        format!("{}/{}", self.0, WELL_KNOWN_PATH)
    }
}

impl fmt::Display for EnsDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EnsDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
