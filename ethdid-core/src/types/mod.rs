//! Domain types for ethdid.
//!
//! - [`Did`]: a syntactically validated decentralized identifier
//! - [`EnsDomain`]: an ENS `.eth` name being looked up or published
//! - [`LookupResult`] / [`PublishResult`]: tagged outcomes of the two operations
//! - [`ErrorType`]: the stable wire strings clients branch on

mod did;
mod domain;
mod outcome;

pub use did::*;
pub use domain::*;
pub use outcome::*;
