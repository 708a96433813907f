//! # ethdid Pinning
//!
//! Stores `.well-known/atproto-did` records on IPFS through Filebase's
//! S3-compatible API. [`MemoryPinStore`] is an in-process stand-in with the
//! same content-addressing behavior.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod filebase;
mod memory;

pub use filebase::{FilebaseClient, FilebaseConfig};
pub use memory::{content_id, MemoryPinStore};
