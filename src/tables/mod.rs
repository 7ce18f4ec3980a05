//! Static lookup tables.
//!
//! Plain `const` data, shared read-only by every estimate.

pub mod category;
pub mod hs;

pub use category::*;
pub use hs::*;
