//! Engine entry point: structural diff, operation pairing, behavioral rules,
//! config overrides, then aggregation into one verdict.

use crate::descriptor::MalformedInputError;
use crate::domain::models::{CheckConfig, ContractDescriptor, Verdict};
use crate::domain::raw::RawDescriptor;
use crate::services::aggregate::aggregate;
use crate::services::config::RuleOverrides;
use crate::services::diff::diff_descriptors;
use crate::services::evaluator::{evaluate, pair_operations};
use crate::services::normalizer::normalize_descriptor;
use crate::services::registry::{RuleSpec, BUILTIN_RULES};

pub fn check(
    reference: &ContractDescriptor,
    candidate: &ContractDescriptor,
    config: &CheckConfig,
) -> Verdict {
    check_with_rules(reference, candidate, config, BUILTIN_RULES)
}

pub fn check_with_rules(
    reference: &ContractDescriptor,
    candidate: &ContractDescriptor,
    config: &CheckConfig,
    rules: &[RuleSpec],
) -> Verdict {
    let structural = diff_descriptors(reference, candidate);
    tracing::debug!(diagnostics = structural.len(), "structural diff complete");

    let paired = pair_operations(reference, candidate);
    let mut behavioral = paired.diagnostics;
    behavioral.extend(evaluate(rules, &paired.pairs));

    let overrides = RuleOverrides::resolve(config);
    let verdict = aggregate(overrides.apply(structural), overrides.apply(behavioral));
    tracing::debug!(
        pass = verdict.pass,
        errors = verdict.error_count(),
        warnings = verdict.warning_count(),
        "verdict ready"
    );
    verdict
}

/// Normalizes both sides, then checks. Malformed input aborts before any
/// comparison runs.
pub fn check_raw(
    reference: &RawDescriptor,
    candidate: &RawDescriptor,
    config: &CheckConfig,
) -> Result<Verdict, MalformedInputError> {
    let reference = normalize_descriptor(reference)?;
    let candidate = normalize_descriptor(candidate)?;
    Ok(check(&reference, &candidate, config))
}
