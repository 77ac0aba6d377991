//! Operation pairing and behavioral rule execution.
//!
//! Every rule runs on its own scoped worker over all paired operations. A
//! rule that faults or panics on one pair yields `RULE_INTERNAL_ERROR` for
//! that pair only; the remaining pairs and rules are unaffected.

use crate::domain::constants::{MISSING_OPERATION, OPERATION_METHOD_MISMATCH, RULE_INTERNAL_ERROR};
use crate::domain::models::{BoundOperation, ContractDescriptor, Diagnostic};
use crate::services::diff::pair_by_name;
use crate::services::registry::RuleSpec;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// `(reference, candidate)` operations that rules may compare.
pub type OperationPair<'a> = (BoundOperation<'a>, BoundOperation<'a>);

#[derive(Debug)]
pub struct PairedOperations<'a> {
    pub pairs: Vec<OperationPair<'a>>,
    /// `MISSING_OPERATION` / `OPERATION_METHOD_MISMATCH` findings.
    pub diagnostics: Vec<Diagnostic>,
}

pub fn pair_operations<'a>(
    reference: &'a ContractDescriptor,
    candidate: &'a ContractDescriptor,
) -> PairedOperations<'a> {
    let pairing = pair_by_name(&reference.operations, &candidate.operations);
    let mut diagnostics = Vec::new();

    for r in pairing.unmatched_reference {
        diagnostics.push(
            Diagnostic::error(
                MISSING_OPERATION,
                &r.name,
                format!("operation `{}` is not implemented by the candidate", r.name),
            )
            .expected(r.method.to_string()),
        );
    }

    let mut pairs = Vec::new();
    for (r, c, _) in pairing.pairs {
        if r.method != c.method {
            diagnostics.push(
                Diagnostic::error(
                    OPERATION_METHOD_MISMATCH,
                    &r.name,
                    format!(
                        "operation `{}` is a {} in the reference but a {} in the candidate",
                        r.name, r.method, c.method
                    ),
                )
                .expected(r.method.to_string())
                .actual(c.method.to_string()),
            );
        }
        pairs.push((reference.bind(r), candidate.bind(c)));
    }

    PairedOperations { pairs, diagnostics }
}

fn panic_payload_to_string(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn internal_error(rule: &RuleSpec, operation: &str, detail: &str) -> Diagnostic {
    Diagnostic::error(
        RULE_INTERNAL_ERROR,
        operation,
        format!("rule {} failed on `{}`: {}", rule.doc.id, operation, detail),
    )
    .at_field(rule.doc.id)
}

fn run_rule(rule: &RuleSpec, pairs: &[OperationPair<'_>]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (reference, candidate) in pairs {
        let op = reference.operation.name.as_str();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            if (rule.applies)(reference, candidate) {
                (rule.check)(reference, candidate)
            } else {
                Ok(None)
            }
        }));
        match outcome {
            Ok(Ok(Some(mut diagnostic))) => {
                diagnostic.rule_id = rule.doc.id.to_string();
                diagnostic.severity = rule.doc.severity;
                out.push(diagnostic);
            }
            Ok(Ok(None)) => {}
            Ok(Err(fault)) => {
                tracing::warn!(rule = rule.doc.id, operation = op, %fault, "rule fault");
                out.push(internal_error(rule, op, &fault.to_string()));
            }
            Err(payload) => {
                let text = panic_payload_to_string(payload.as_ref());
                tracing::warn!(rule = rule.doc.id, operation = op, panic = %text, "rule panicked");
                out.push(internal_error(rule, op, &format!("panicked: {text}")));
            }
        }
    }
    out
}

/// Runs every rule over every pair. Output is grouped by rule in registration
/// order regardless of which worker finishes first.
pub fn evaluate(rules: &[RuleSpec], pairs: &[OperationPair<'_>]) -> Vec<Diagnostic> {
    let per_rule: Vec<Vec<Diagnostic>> = std::thread::scope(|scope| {
        let handles: Vec<_> = rules
            .iter()
            .map(|rule| (rule, scope.spawn(move || run_rule(rule, pairs))))
            .collect();
        handles
            .into_iter()
            .map(|(rule, handle)| {
                handle.join().unwrap_or_else(|payload| {
                    let text = panic_payload_to_string(payload.as_ref());
                    vec![internal_error(rule, "*", &format!("worker panicked: {text}"))]
                })
            })
            .collect()
    });

    let out: Vec<Diagnostic> = per_rule.into_iter().flatten().collect();
    tracing::debug!(
        rules = rules.len(),
        operations = pairs.len(),
        diagnostics = out.len(),
        "behavioral rules evaluated"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{evaluate, pair_operations};
    use crate::domain::constants::*;
    use crate::domain::models::{
        BehaviorFlag, BoundOperation, ContractDescriptor, Diagnostic, Method, Operation, Severity,
    };
    use crate::services::registry::{RuleDoc, RuleFault, RuleSpec, BUILTIN_RULES};
    use crate::services::rules::applies_always;

    fn op(name: &str, method: Method, flags: &[BehaviorFlag]) -> Operation {
        Operation {
            name: name.to_string(),
            method,
            request_schema: None,
            response_schema: None,
            behavior_flags: flags.iter().copied().collect(),
        }
    }

    fn descriptor(ops: Vec<Operation>) -> ContractDescriptor {
        let mut d = ContractDescriptor::default();
        for o in ops {
            d.operations.insert(o.name.clone(), o);
        }
        d
    }

    fn doc(id: &'static str) -> RuleDoc {
        RuleDoc {
            id,
            category: "test",
            severity: Severity::Error,
            summary: "",
            why: "",
            fix: "",
        }
    }

    fn always_faults(_: &BoundOperation<'_>, _: &BoundOperation<'_>) -> Result<Option<Diagnostic>, RuleFault> {
        Err(RuleFault::Uninterpretable("cannot read flags".to_string()))
    }

    fn always_panics(_: &BoundOperation<'_>, _: &BoundOperation<'_>) -> Result<Option<Diagnostic>, RuleFault> {
        panic!("boom")
    }

    fn always_warns(_: &BoundOperation<'_>, c: &BoundOperation<'_>) -> Result<Option<Diagnostic>, RuleFault> {
        Ok(Some(Diagnostic::error("ignored", &c.operation.name, "found")))
    }

    #[test]
    fn missing_and_mismatched_operations() {
        let reference = descriptor(vec![
            op("createItem", Method::Create, &[]),
            op("deleteItem", Method::Delete, &[]),
        ]);
        let candidate = descriptor(vec![op("create_item", Method::Update, &[])]);
        let paired = pair_operations(&reference, &candidate);
        let ids: Vec<_> = paired.diagnostics.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(ids, vec![MISSING_OPERATION, OPERATION_METHOD_MISMATCH]);
        assert_eq!(paired.pairs.len(), 1);
    }

    #[test]
    fn precondition_rule_fires_through_the_registry() {
        let reference = descriptor(vec![op(
            "updateItem",
            Method::Update,
            &[BehaviorFlag::RequiresPreconditionToken],
        )]);
        let candidate = descriptor(vec![op("updateItem", Method::Update, &[])]);
        let paired = pair_operations(&reference, &candidate);
        let diags = evaluate(BUILTIN_RULES, &paired.pairs);
        let ids: Vec<_> = diags.iter().map(|d| d.rule_id.as_str()).collect();
        assert_eq!(ids, vec![PRECONDITION_TOKEN_MISSING]);
    }

    #[test]
    fn faults_and_panics_do_not_suppress_other_rules() {
        let rules = [
            RuleSpec {
                doc: doc("FAULTY"),
                applies: applies_always,
                check: always_faults,
            },
            RuleSpec {
                doc: doc("PANICKY"),
                applies: applies_always,
                check: always_panics,
            },
            RuleSpec {
                doc: RuleDoc {
                    severity: Severity::Warning,
                    ..doc("HEALTHY")
                },
                applies: applies_always,
                check: always_warns,
            },
        ];
        let reference = descriptor(vec![op("listItems", Method::List, &[])]);
        let paired = pair_operations(&reference, &reference);
        let diags = evaluate(&rules, &paired.pairs);

        assert_eq!(diags.len(), 3);
        assert_eq!(diags[0].rule_id, RULE_INTERNAL_ERROR);
        assert_eq!(diags[0].field.as_deref(), Some("FAULTY"));
        assert_eq!(diags[1].rule_id, RULE_INTERNAL_ERROR);
        assert!(diags[1].message.contains("boom"));
        assert_eq!(diags[2].rule_id, "HEALTHY");
        assert_eq!(diags[2].severity, Severity::Warning);
    }
}
