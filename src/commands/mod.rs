//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `check.rs`: validate (the only command whose exit code reports a verdict).
//! - `catalog.rs`: list-rules/explain/check-config.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod catalog;
pub mod check;

pub use catalog::{handle_check_config, handle_explain, handle_list_rules};
pub use check::handle_validate;
