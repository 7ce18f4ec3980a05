//! Input/output helpers.
//!
//! - request JSON read + validation (`input`)
//! - JSON report export (`export`)

pub mod export;
pub mod input;

pub use export::*;
pub use input::*;
