//! Terminal reports for `lc`.

pub mod format;

pub use format::*;
