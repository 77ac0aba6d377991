//! Static rule catalog.
//!
//! Structural rule ids are documented here so `list-rules`, `explain` and the
//! config validator see one catalog; only the behavioral entries carry
//! evaluation functions.

use crate::domain::constants::*;
use crate::domain::models::{BoundOperation, Diagnostic, RuleInfo, Severity};
use crate::services::rules;

#[derive(Debug, Clone, Copy)]
pub struct RuleDoc {
    pub id: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub summary: &'static str,
    pub why: &'static str,
    pub fix: &'static str,
}

impl RuleDoc {
    pub fn info(&self) -> RuleInfo {
        RuleInfo {
            id: self.id.to_string(),
            category: self.category.to_string(),
            severity: self.severity,
            summary: self.summary.to_string(),
            why: self.why.to_string(),
            fix: self.fix.to_string(),
        }
    }
}

/// Input a rule cannot interpret. Surfaces as `RULE_INTERNAL_ERROR`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuleFault {
    #[error("operation `{operation}` names schema `{schema}` that was not resolved")]
    UnresolvedSchema { operation: String, schema: String },
    #[error("{0}")]
    Uninterpretable(String),
}

pub type Applies = fn(&BoundOperation<'_>, &BoundOperation<'_>) -> bool;
pub type Check = fn(&BoundOperation<'_>, &BoundOperation<'_>) -> Result<Option<Diagnostic>, RuleFault>;

/// A behavioral rule: `(reference, candidate)` in, at most one diagnostic out.
/// The catalog severity is authoritative for whatever `check` returns.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub doc: RuleDoc,
    pub applies: Applies,
    pub check: Check,
}

pub const STRUCTURAL_RULES: &[RuleDoc] = &[
    RuleDoc {
        id: MISSING_ENTITY,
        category: "structure",
        severity: Severity::Error,
        summary: "Reference entity has no counterpart in the candidate",
        why: "A client that never models a resource cannot send or read it correctly.",
        fix: "Add a type for the entity mirroring the reference schema.",
    },
    RuleDoc {
        id: MISSING_REQUIRED_FIELD,
        category: "structure",
        severity: Severity::Error,
        summary: "Required reference field is absent from the candidate",
        why: "Requests without required fields are rejected by the server.",
        fix: "Declare the field with the reference type.",
    },
    RuleDoc {
        id: FIELD_NAMING_MISMATCH,
        category: "structure",
        severity: Severity::Error,
        summary: "Field name differs from the reference only by casing or separators",
        why: "Wire names are exact; `stockCount` is silently dropped by a server expecting `stock_count`.",
        fix: "Use the reference spelling on the wire (serialization rename if needed).",
    },
    RuleDoc {
        id: REQUIREDNESS_MISMATCH,
        category: "structure",
        severity: Severity::Error,
        summary: "Required/optional parity differs between reference and candidate",
        why: "Different strictness interpretations cause latent production breaks.",
        fix: "Make strictness consistent for this field in both definitions.",
    },
    RuleDoc {
        id: TYPE_MISMATCH,
        category: "structure",
        severity: Severity::Error,
        summary: "Field type is not a lossless widening of the reference type",
        why: "Narrowing or float conversion loses data at large magnitudes.",
        fix: "Use the reference type or a lossless widening of it.",
    },
    RuleDoc {
        id: MISSING_CONSTRAINT,
        category: "validation",
        severity: Severity::Error,
        summary: "Reference bound or pattern is absent or weaker in the candidate",
        why: "Unvalidated ranges and ID formats reach the server and fail late.",
        fix: "Validate the same bounds, lengths and patterns client-side.",
    },
    RuleDoc {
        id: ENUM_INCOMPLETE,
        category: "enum",
        severity: Severity::Error,
        summary: "Candidate enum lacks reference values",
        why: "Unknown statuses from the server crash or mis-route in the client.",
        fix: "Add every reference value to the candidate enum.",
    },
    RuleDoc {
        id: ENUM_UNDECLARED_VALUE,
        category: "enum",
        severity: Severity::Warning,
        summary: "Candidate enum declares values the reference does not know",
        why: "Values the server never sends are dead code, or a sign of drift.",
        fix: "Remove the value or add it to the reference contract.",
    },
    RuleDoc {
        id: UNDECLARED_EXTRA_FIELD,
        category: "structure",
        severity: Severity::Warning,
        summary: "Candidate field has no reference counterpart",
        why: "Additive evolution is tolerated, but extra fields may be typos.",
        fix: "Remove the field or add it to the reference contract.",
    },
    RuleDoc {
        id: MISSING_OPERATION,
        category: "operations",
        severity: Severity::Error,
        summary: "Reference operation has no counterpart in the candidate",
        why: "Behavioral requirements cannot be honored by an operation that does not exist.",
        fix: "Implement the operation.",
    },
    RuleDoc {
        id: OPERATION_METHOD_MISMATCH,
        category: "operations",
        severity: Severity::Error,
        summary: "Candidate operation uses a different method than the reference",
        why: "A create issued as an update (or vice versa) changes server semantics.",
        fix: "Use the reference method for the operation.",
    },
    RuleDoc {
        id: RULE_INTERNAL_ERROR,
        category: "engine",
        severity: Severity::Error,
        summary: "A rule could not interpret its input",
        why: "A rule that cannot run must not silently pass.",
        fix: "Fix the descriptor the rule rejected; the message names the failing rule.",
    },
];

pub const BUILTIN_RULES: &[RuleSpec] = &[
    RuleSpec {
        doc: RuleDoc {
            id: IDEMPOTENCY_MISSING,
            category: "idempotency",
            severity: Severity::Error,
            summary: "Monetary create operation does not send an idempotency key",
            why: "Retried payment creation without a key can charge twice.",
            fix: "Send an Idempotency-Key header on every create call.",
        },
        applies: rules::applies_monetary_create,
        check: rules::check_idempotency,
    },
    RuleSpec {
        doc: RuleDoc {
            id: PRECONDITION_TOKEN_MISSING,
            category: "concurrency",
            severity: Severity::Error,
            summary: "Update/delete does not send a precondition token (If-Match)",
            why: "Without a precondition, concurrent writers overwrite each other.",
            fix: "Send the resource ETag in an If-Match header.",
        },
        applies: rules::applies_update_or_delete,
        check: rules::check_precondition_token,
    },
    RuleSpec {
        doc: RuleDoc {
            id: SIGNATURE_VERIFICATION_MISSING,
            category: "security",
            severity: Severity::Error,
            summary: "Webhook ingestion acts before verifying the signature",
            why: "Unverified webhooks let anyone forge events.",
            fix: "Verify the signature header against the signing secret before acting.",
        },
        applies: rules::applies_webhook_ingestion,
        check: rules::check_signature_verification,
    },
    RuleSpec {
        doc: RuleDoc {
            id: FLOAT_ARITHMETIC_FOR_MONEY,
            category: "precision",
            severity: Severity::Error,
            summary: "Monetary values use floating types or arithmetic",
            why: "Binary floating point cannot represent most decimal amounts exactly.",
            fix: "Use integer minor units or a decimal type.",
        },
        applies: rules::applies_monetary,
        check: rules::check_float_money,
    },
    RuleSpec {
        doc: RuleDoc {
            id: NULL_SAFETY_VIOLATION,
            category: "null-safety",
            severity: Severity::Error,
            summary: "Read operation does not handle nullable response fields",
            why: "Dereferencing a null field crashes the client.",
            fix: "Guard every nullable field before use.",
        },
        applies: rules::applies_read,
        check: rules::check_null_safety,
    },
    RuleSpec {
        doc: RuleDoc {
            id: PAGINATION_NOT_EXHAUSTIVE,
            category: "pagination",
            severity: Severity::Error,
            summary: "List operation returns only the first page",
            why: "Ignoring the has-more indicator silently truncates results.",
            fix: "Follow the cursor until the server reports no more results.",
        },
        applies: rules::applies_list,
        check: rules::check_pagination,
    },
    RuleSpec {
        doc: RuleDoc {
            id: CONFLICT_STATUS_MISSING,
            category: "concurrency",
            severity: Severity::Error,
            summary: "Optimistically locked update does not handle the conflict status",
            why: "A 409/412 treated as generic failure loses the retry-after-refetch path.",
            fix: "Handle the conflict status by refetching and retrying or surfacing it.",
        },
        applies: rules::applies_locked_update,
        check: rules::check_conflict_status,
    },
    RuleSpec {
        doc: RuleDoc {
            id: AUTH_REQUIREMENT_MISSING,
            category: "security",
            severity: Severity::Error,
            summary: "Operation requiring authorization is called without it",
            why: "Unauthenticated calls fail or, worse, leak through misconfigured gateways.",
            fix: "Attach credentials to the request.",
        },
        applies: rules::applies_authorized,
        check: rules::check_authorization,
    },
    RuleSpec {
        doc: RuleDoc {
            id: ENUM_HANDLING_NOT_EXHAUSTIVE,
            category: "enum",
            severity: Severity::Error,
            summary: "Operation does not handle every enum variant",
            why: "A new status falls through to a default branch that does the wrong thing.",
            fix: "Match every variant explicitly.",
        },
        applies: rules::applies_enum_exhaustive,
        check: rules::check_enum_exhaustive,
    },
    RuleSpec {
        doc: RuleDoc {
            id: SHARED_TEST_DOUBLE,
            category: "test-quality",
            severity: Severity::Warning,
            summary: "Tests share a mutable mock across cases",
            why: "Global mocks leak state between tests and produce false passes.",
            fix: "Create the test double inside each test.",
        },
        applies: rules::applies_always,
        check: rules::check_shared_test_double,
    },
    RuleSpec {
        doc: RuleDoc {
            id: SHALLOW_TEST_ASSERTIONS,
            category: "test-quality",
            severity: Severity::Warning,
            summary: "Tests only assert that a result exists",
            why: "`assert result is not None` passes for every wrong answer.",
            fix: "Assert on the fields and values the contract defines.",
        },
        applies: rules::applies_always,
        check: rules::check_shallow_assertions,
    },
];

pub fn find_rule(id: &str) -> Option<RuleDoc> {
    STRUCTURAL_RULES
        .iter()
        .copied()
        .chain(BUILTIN_RULES.iter().map(|r| r.doc))
        .find(|d| d.id.eq_ignore_ascii_case(id))
}

pub fn is_known_rule(id: &str) -> bool {
    find_rule(id).is_some()
}

/// Every rule, structural first then behavioral, in catalog order.
pub fn catalog() -> Vec<RuleInfo> {
    STRUCTURAL_RULES
        .iter()
        .map(RuleDoc::info)
        .chain(BUILTIN_RULES.iter().map(|r| r.doc.info()))
        .collect()
}
