//! # ethdid Resolver
//!
//! Looks up ATProto DIDs served for ENS names through an `eth.link`-style
//! gateway, and publishes new records to a pinning backend after checking
//! for an existing one.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod gateway;
mod resolver;

pub use gateway::{GatewayClient, GatewayConfig};
pub use resolver::{AtprotoDidResolver, ResolverConfig};
pub use ethdid_pinning::{FilebaseClient, FilebaseConfig, MemoryPinStore};
