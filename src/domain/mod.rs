//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep the canonical contract model and report structs in one place.
//! - Avoid cyclic imports between the normalizer, diff engine and rules.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs`: canonical schema/operation model, diagnostics, verdict.
//! - `raw.rs`: serialized descriptor documents as read from disk.
//! - `constants.rs`: stable rule ids and file names.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
pub mod raw;
