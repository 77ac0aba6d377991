//! Contract conformance engine: compares a reference API descriptor with a
//! candidate client's descriptor and produces an ordered, explainable verdict.

pub mod descriptor;
pub mod domain;
pub mod services;

pub use descriptor::{load_descriptor, DescriptorError, LoadedDescriptor, MalformedInputError};
pub use domain::models::{CheckConfig, ContractDescriptor, Diagnostic, Severity, Verdict};
pub use services::engine::{check, check_raw};
