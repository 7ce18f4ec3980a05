//! `landed-cost` library crate.
//!
//! The binary (`lc`) is a thin wrapper around this library so that:
//!
//! - inference and decision logic is testable without spawning processes
//! - callers can embed the estimator (services, notebooks, batch jobs)
//!
//! Flow: `infer` resolves cost-model inputs, `cost` turns them into two
//! scenarios, `decision` derives the display view.

pub mod app;
pub mod cli;
pub mod cost;
pub mod decision;
pub mod domain;
pub mod error;
pub mod infer;
pub mod io;
pub mod report;
pub mod tables;
