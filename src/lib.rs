//! Sarthi - welfare-scheme portal core
//!
//! The non-visual heart of a citizen-facing scheme portal: an analytics
//! filter store that recomputes dashboard metrics from the application and
//! user records, a clamping pagination utility, and an append-only admin
//! audit log with a duplicate-suppression guard. Around them sit the scheme
//! catalog and the eligibility rule engine that matches citizens to it.

pub mod analytics;
pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod pagination;
pub mod rbac;
pub mod records;
pub mod storage;

pub use error::{Result, SarthiError};
