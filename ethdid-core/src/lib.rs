//! # ethdid Core
//!
//! Core types, errors, and traits for resolving ENS names to ATProto DIDs.
//!
//! This crate provides the building blocks used by all other ethdid crates:
//!
//! - **Types**: [`Did`], [`EnsDomain`], and the tagged [`LookupResult`] / [`PublishResult`] outcomes
//! - **Errors**: [`EthDidError`] with a crate-wide [`Result`] alias
//! - **Constants**: wire strings, defaults, and the object key layout
//! - **Traits**: [`DidSource`] and [`PinningBackend`], the two external collaborators
//!
//! ## Example
//!
//! ```rust
//! use ethdid_core::{is_valid_did, Did};
//!
//! assert!(is_valid_did("did:plc:abc123"));
//! assert!(!is_valid_did("did:PLC:abc"));
//!
//! let did = Did::parse("did:plc:abc123").unwrap();
//! assert_eq!(did.method(), "plc");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EthDidError, Result};
pub use traits::*;
pub use types::*;
