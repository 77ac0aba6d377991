//! Built-in behavioral rule bodies. Registered in `registry::BUILTIN_RULES`.

use crate::domain::constants::*;
use crate::domain::models::{BehaviorFlag, BoundOperation, Diagnostic, Field, Method, Schema};
use crate::services::naming::name_shape;
use crate::services::registry::RuleFault;

type Outcome = Result<Option<Diagnostic>, RuleFault>;

/// Schemas bound to the operation, failing if a declared name did not resolve.
fn schemas<'a>(side: &BoundOperation<'a>) -> Result<Vec<&'a Schema>, RuleFault> {
    let op = side.operation;
    let mut out = Vec::new();
    for (name, bound) in [
        (&op.request_schema, side.request),
        (&op.response_schema, side.response),
    ] {
        match (name, bound) {
            (Some(schema), None) => {
                return Err(RuleFault::UnresolvedSchema {
                    operation: op.name.clone(),
                    schema: schema.clone(),
                })
            }
            (_, Some(s)) => out.push(s),
            (None, None) => {}
        }
    }
    Ok(out)
}

fn has_monetary_field(side: &BoundOperation<'_>) -> bool {
    [side.request, side.response]
        .into_iter()
        .flatten()
        .any(|s| s.monetary_fields().next().is_some())
}

/// A `create` that declares idempotency or exact decimal arithmetic handles
/// money whether or not its fields are marked.
fn declares_money_handling(side: &BoundOperation<'_>) -> bool {
    let op = side.operation;
    op.method == Method::Create
        && (op.has(BehaviorFlag::RequiresIdempotencyKey)
            || op.has(BehaviorFlag::UsesExactDecimalArithmetic))
}

fn counterpart<'a>(schema: &'a Schema, name: &str) -> Option<&'a Field> {
    schema.field(name).or_else(|| {
        let shape = name_shape(name);
        schema.fields.values().find(|f| name_shape(&f.name) == shape)
    })
}

fn flag_gap(
    rule_id: &str,
    reference: &BoundOperation<'_>,
    candidate: &BoundOperation<'_>,
    flag: BehaviorFlag,
    message: &str,
) -> Option<Diagnostic> {
    if reference.operation.has(flag) && !candidate.operation.has(flag) {
        Some(
            Diagnostic::error(
                rule_id,
                &reference.operation.name,
                format!("operation `{}` {}", reference.operation.name, message),
            )
            .expected(flag.to_string())
            .actual("absent"),
        )
    } else {
        None
    }
}

fn candidate_flag(
    rule_id: &str,
    candidate: &BoundOperation<'_>,
    flag: BehaviorFlag,
    message: &str,
) -> Option<Diagnostic> {
    candidate.operation.has(flag).then(|| {
        Diagnostic::warning(
            rule_id,
            &candidate.operation.name,
            format!("operation `{}` {}", candidate.operation.name, message),
        )
        .actual(flag.to_string())
    })
}

pub fn applies_always(_: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    true
}

pub fn applies_monetary(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    has_monetary_field(reference) || declares_money_handling(reference)
}

pub fn applies_monetary_create(reference: &BoundOperation<'_>, c: &BoundOperation<'_>) -> bool {
    reference.operation.method == Method::Create && applies_monetary(reference, c)
}

pub fn applies_update_or_delete(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    matches!(reference.operation.method, Method::Update | Method::Delete)
}

pub fn applies_webhook_ingestion(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    let name = reference.operation.name.to_ascii_lowercase();
    reference.operation.has(BehaviorFlag::RequiresSignatureVerification)
        || name.contains("webhook")
        || name.contains("event")
}

pub fn applies_read(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    reference.operation.method == Method::Read
}

pub fn applies_list(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    reference.operation.method == Method::List
}

pub fn applies_locked_update(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    let op = reference.operation;
    op.method == Method::Update
        && (op.has(BehaviorFlag::RequiresPreconditionToken)
            || op.has(BehaviorFlag::StatusCodeOnConflict))
}

pub fn applies_authorized(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    reference.operation.has(BehaviorFlag::RequiresAuthorization)
}

pub fn applies_enum_exhaustive(reference: &BoundOperation<'_>, _: &BoundOperation<'_>) -> bool {
    reference.operation.has(BehaviorFlag::EnumExhaustive)
}

pub fn check_idempotency(reference: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    Ok(flag_gap(
        IDEMPOTENCY_MISSING,
        reference,
        candidate,
        BehaviorFlag::RequiresIdempotencyKey,
        "creates a monetary resource without an idempotency key",
    ))
}

pub fn check_precondition_token(
    reference: &BoundOperation<'_>,
    candidate: &BoundOperation<'_>,
) -> Outcome {
    Ok(flag_gap(
        PRECONDITION_TOKEN_MISSING,
        reference,
        candidate,
        BehaviorFlag::RequiresPreconditionToken,
        "writes without a precondition token (If-Match)",
    ))
}

pub fn check_signature_verification(
    reference: &BoundOperation<'_>,
    candidate: &BoundOperation<'_>,
) -> Outcome {
    Ok(flag_gap(
        SIGNATURE_VERIFICATION_MISSING,
        reference,
        candidate,
        BehaviorFlag::RequiresSignatureVerification,
        "ingests events without verifying their signature",
    ))
}

/// Field-level findings use the schema entity and field so they merge with
/// the structural diff's report of the same field.
pub fn check_float_money(reference: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    let ref_schemas = schemas(reference)?;
    schemas(candidate)?;

    let slots = [
        (reference.request, candidate.request),
        (reference.response, candidate.response),
    ];
    for schema in &ref_schemas {
        if let Some(f) = schema.monetary_fields().find(|f| !f.declared_type.is_numeric()) {
            return Err(RuleFault::Uninterpretable(format!(
                "monetary field {}.{} has non-numeric type {}",
                schema.entity, f.name, f.declared_type
            )));
        }
    }

    let mut floating: Vec<(&str, &str)> = Vec::new();
    for (r, c) in slots {
        let (Some(r), Some(c)) = (r, c) else {
            continue;
        };
        for field in r.monetary_fields() {
            if counterpart(c, &field.name).is_some_and(|cf| cf.declared_type.is_floating()) {
                floating.push((&r.entity, &field.name));
            }
        }
    }
    floating.sort_unstable();
    floating.dedup();

    if let Some((entity, field)) = floating.first() {
        let names: Vec<String> = floating.iter().map(|(e, f)| format!("{e}.{f}")).collect();
        return Ok(Some(
            Diagnostic::error(
                FLOAT_ARITHMETIC_FOR_MONEY,
                entity,
                format!(
                    "operation `{}` carries money in floating types: {}",
                    reference.operation.name,
                    names.join(", ")
                ),
            )
            .at_field(field)
            .expected("decimal or bounded integer minor units")
            .actual("float"),
        ));
    }

    Ok(flag_gap(
        FLOAT_ARITHMETIC_FOR_MONEY,
        reference,
        candidate,
        BehaviorFlag::UsesExactDecimalArithmetic,
        "computes monetary values without exact decimal arithmetic",
    ))
}

pub fn check_null_safety(reference: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    schemas(reference)?;
    schemas(candidate)?;
    if candidate
        .operation
        .has(BehaviorFlag::NullableFieldsHandledSafely)
    {
        return Ok(None);
    }

    let Some(entity) = reference.response.or(candidate.response).map(|s| s.entity.as_str()) else {
        return Ok(None);
    };
    let mut nullable: Vec<&str> = [reference.response, candidate.response]
        .into_iter()
        .flatten()
        .flat_map(|s| s.nullable_fields().map(|f| f.name.as_str()))
        .collect();
    nullable.sort_unstable();
    nullable.dedup();

    let Some(first) = nullable.first() else {
        return Ok(None);
    };
    Ok(Some(
        Diagnostic::error(
            NULL_SAFETY_VIOLATION,
            entity,
            format!(
                "operation `{}` reads nullable fields without null handling: {}",
                reference.operation.name,
                nullable.join(", ")
            ),
        )
        .at_field(first)
        .expected(BehaviorFlag::NullableFieldsHandledSafely.to_string())
        .actual("absent"),
    ))
}

pub fn check_pagination(reference: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    Ok(flag_gap(
        PAGINATION_NOT_EXHAUSTIVE,
        reference,
        candidate,
        BehaviorFlag::PaginationExhaustive,
        "returns a single page regardless of the more-results indicator",
    ))
}

pub fn check_conflict_status(
    reference: &BoundOperation<'_>,
    candidate: &BoundOperation<'_>,
) -> Outcome {
    Ok(flag_gap(
        CONFLICT_STATUS_MISSING,
        reference,
        candidate,
        BehaviorFlag::StatusCodeOnConflict,
        "has no conflict-signaling behavior for optimistic locking",
    ))
}

pub fn check_authorization(reference: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    Ok(flag_gap(
        AUTH_REQUIREMENT_MISSING,
        reference,
        candidate,
        BehaviorFlag::RequiresAuthorization,
        "declares no authorization check",
    ))
}

pub fn check_enum_exhaustive(
    reference: &BoundOperation<'_>,
    candidate: &BoundOperation<'_>,
) -> Outcome {
    Ok(flag_gap(
        ENUM_HANDLING_NOT_EXHAUSTIVE,
        reference,
        candidate,
        BehaviorFlag::EnumExhaustive,
        "does not handle every enum variant",
    ))
}

pub fn check_shared_test_double(_: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    Ok(candidate_flag(
        SHARED_TEST_DOUBLE,
        candidate,
        BehaviorFlag::SharedMutableTestDouble,
        "is tested through a mock shared across unrelated tests",
    ))
}

pub fn check_shallow_assertions(_: &BoundOperation<'_>, candidate: &BoundOperation<'_>) -> Outcome {
    Ok(candidate_flag(
        SHALLOW_TEST_ASSERTIONS,
        candidate,
        BehaviorFlag::ShallowTestAssertions,
        "is tested with existence-only assertions",
    ))
}
