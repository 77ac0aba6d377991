//! Service layer containing the comparison logic.
//!
//! ## Service map
//! - `normalizer.rs`: raw descriptor to canonical model, malformed input detection.
//! - `naming.rs`: name shapes and casing conventions.
//! - `diff.rs`: structural schema comparison and name pairing.
//! - `registry.rs`: static rule catalog (metadata plus behavioral rule table).
//! - `rules.rs`: built-in behavioral rule bodies.
//! - `evaluator.rs`: operation pairing and parallel rule execution.
//! - `aggregate.rs`: dedup, ordering and pass/fail.
//! - `config.rs`: per-rule severity overrides from `apicheck.toml`.
//! - `engine.rs`: the entry point tying the above together.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Everything except `config.rs` and `output.rs` is pure.
//! - Keep command handlers thin; delegate to services.

pub mod aggregate;
pub mod config;
pub mod diff;
pub mod engine;
pub mod evaluator;
pub mod naming;
pub mod normalizer;
pub mod output;
pub mod registry;
pub mod rules;
