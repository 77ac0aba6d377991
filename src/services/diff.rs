//! Structural comparison of reference and candidate schemas.
//!
//! Purely set comparisons over the two canonical models; nothing here looks
//! at runtime values. Per entity the checks run in a fixed order (missing,
//! naming, required-ness, type, constraints, enum, extra) with fields visited
//! in ascending name order.

use crate::domain::constants::{
    ENUM_INCOMPLETE, ENUM_UNDECLARED_VALUE, FIELD_NAMING_MISMATCH, FLOAT_ARITHMETIC_FOR_MONEY,
    MISSING_CONSTRAINT, MISSING_ENTITY, MISSING_REQUIRED_FIELD, REQUIREDNESS_MISMATCH,
    TYPE_MISMATCH, UNDECLARED_EXTRA_FIELD,
};
use crate::domain::models::{ContractDescriptor, Diagnostic, Field, FieldType, Schema, Severity};
use crate::services::naming::{differs_only_in_convention, naming_convention};
use std::collections::BTreeMap;

/// Reference/candidate pairing of two name-keyed maps.
#[derive(Debug)]
pub struct Pairing<'a, T> {
    /// `(reference, candidate, renamed)`; `renamed` marks a shape-only match.
    pub pairs: Vec<(&'a T, &'a T, bool)>,
    pub unmatched_reference: Vec<&'a T>,
    pub unmatched_candidate: Vec<&'a T>,
}

/// Pairs by exact key first, then by name shape. Deterministic: both sides
/// are visited in key order and each candidate is used at most once.
pub fn pair_by_name<'a, T>(
    reference: &'a BTreeMap<String, T>,
    candidate: &'a BTreeMap<String, T>,
) -> Pairing<'a, T> {
    let mut pairs = Vec::new();
    let mut leftover_reference = Vec::new();
    let mut remaining: BTreeMap<&str, &T> = candidate.iter().map(|(k, v)| (k.as_str(), v)).collect();

    for (name, r) in reference {
        match remaining.remove(name.as_str()) {
            Some(c) => pairs.push((r, c, false)),
            None => leftover_reference.push((name.as_str(), r)),
        }
    }

    let mut unmatched_reference = Vec::new();
    for (name, r) in leftover_reference {
        let hit = remaining
            .keys()
            .copied()
            .find(|k| differs_only_in_convention(name, k));
        match hit.and_then(|k| remaining.remove(k)) {
            Some(c) => pairs.push((r, c, true)),
            None => unmatched_reference.push(r),
        }
    }

    Pairing {
        pairs,
        unmatched_reference,
        unmatched_candidate: remaining.into_values().collect(),
    }
}

/// Reference → candidate type check. Widening is allowed; anything that can
/// lose precision or drop null handling is not.
pub fn type_compatible(reference: &Field, candidate: &Field) -> bool {
    let (r, c) = (&reference.declared_type, &candidate.declared_type);
    if r.is_nullable() && !c.is_nullable() {
        return false;
    }
    match (r.base(), c.base()) {
        (a, b) if a == b => true,
        (FieldType::Int, FieldType::Decimal) => true,
        (FieldType::Decimal, FieldType::Int) => candidate.is_decimal_compatible(),
        _ => false,
    }
}

fn fmt_bound(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "none".to_string())
}

fn fmt_len(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "none".to_string())
}

/// `(expected, actual)` for each reference constraint the candidate lacks or
/// declares more loosely.
pub fn weaker_constraints(reference: &Field, candidate: &Field) -> Vec<(String, String)> {
    let (r, c) = (&reference.constraints, &candidate.constraints);
    let mut out = Vec::new();

    if let Some(rm) = r.min_inclusive {
        if c.min_inclusive.map_or(true, |cm| cm < rm) {
            out.push((
                format!("minInclusive={}", rm),
                format!("minInclusive={}", fmt_bound(c.min_inclusive)),
            ));
        }
    }
    if let Some(rm) = r.max_inclusive {
        if c.max_inclusive.map_or(true, |cm| cm > rm) {
            out.push((
                format!("maxInclusive={}", rm),
                format!("maxInclusive={}", fmt_bound(c.max_inclusive)),
            ));
        }
    }
    if let Some(rl) = r.min_length {
        if c.min_length.map_or(true, |cl| cl < rl) {
            out.push((
                format!("minLength={}", rl),
                format!("minLength={}", fmt_len(c.min_length)),
            ));
        }
    }
    if let Some(rl) = r.max_length {
        if c.max_length.map_or(true, |cl| cl > rl) {
            out.push((
                format!("maxLength={}", rl),
                format!("maxLength={}", fmt_len(c.max_length)),
            ));
        }
    }
    if let Some(pattern) = &r.pattern {
        if c.pattern.is_none() {
            out.push((format!("pattern={}", pattern), "pattern=none".to_string()));
        }
    }
    out
}

fn compare_pair(entity: &str, r: &Field, c: &Field, renamed: bool, out: &mut Vec<Diagnostic>) {
    if renamed {
        out.push(
            Diagnostic::error(
                FIELD_NAMING_MISMATCH,
                entity,
                format!(
                    "field `{}` is named `{}` in the candidate ({} vs {})",
                    r.name,
                    c.name,
                    naming_convention(&r.name),
                    naming_convention(&c.name)
                ),
            )
            .at_field(&r.name)
            .expected(r.name.clone())
            .actual(c.name.clone()),
        );
    }

    if r.required != c.required {
        let (severity, what) = if r.required {
            (
                Severity::Error,
                "required by the reference but optional in the candidate",
            )
        } else {
            (
                Severity::Warning,
                "optional in the reference but required by the candidate",
            )
        };
        out.push(
            Diagnostic::new(
                REQUIREDNESS_MISMATCH,
                severity,
                entity,
                format!("field `{}` is {}", r.name, what),
            )
            .at_field(&r.name)
            .expected(if r.required { "required" } else { "optional" })
            .actual(if c.required { "required" } else { "optional" }),
        );
    }

    if !type_compatible(r, c) {
        let rule = if r.monetary && c.declared_type.is_floating() {
            FLOAT_ARITHMETIC_FOR_MONEY
        } else {
            TYPE_MISMATCH
        };
        let message = if rule == FLOAT_ARITHMETIC_FOR_MONEY {
            format!(
                "monetary field `{}` is a floating type in the candidate; exact representation required",
                r.name
            )
        } else {
            format!(
                "field `{}` declared as {} but candidate uses {}",
                r.name, r.declared_type, c.declared_type
            )
        };
        out.push(
            Diagnostic::error(rule, entity, message)
                .at_field(&r.name)
                .expected(r.declared_type.to_string())
                .actual(c.declared_type.to_string()),
        );
    }

    let weaker = weaker_constraints(r, c);
    if !weaker.is_empty() {
        let (expected, actual): (Vec<String>, Vec<String>) = weaker.into_iter().unzip();
        out.push(
            Diagnostic::error(
                MISSING_CONSTRAINT,
                entity,
                format!(
                    "field `{}` does not enforce reference constraints: {}",
                    r.name,
                    expected.join(", ")
                ),
            )
            .at_field(&r.name)
            .expected(expected.join(", "))
            .actual(actual.join(", ")),
        );
    }

    if *r.declared_type.base() == FieldType::Enum && *c.declared_type.base() == FieldType::Enum {
        let (rv, cv) = (&r.constraints.enum_values, &c.constraints.enum_values);
        let missing: Vec<&str> = rv.difference(cv).map(String::as_str).collect();
        if !missing.is_empty() {
            out.push(
                Diagnostic::error(
                    ENUM_INCOMPLETE,
                    entity,
                    format!(
                        "enum `{}` is missing values: {}",
                        r.name,
                        missing.join(", ")
                    ),
                )
                .at_field(&r.name)
                .expected(rv.iter().cloned().collect::<Vec<_>>().join(", "))
                .actual(cv.iter().cloned().collect::<Vec<_>>().join(", ")),
            );
        }
        let extra: Vec<&str> = cv.difference(rv).map(String::as_str).collect();
        if !extra.is_empty() {
            out.push(
                Diagnostic::warning(
                    ENUM_UNDECLARED_VALUE,
                    entity,
                    format!(
                        "enum `{}` declares values unknown to the reference: {}",
                        r.name,
                        extra.join(", ")
                    ),
                )
                .at_field(&r.name)
                .actual(extra.join(", ")),
            );
        }
    }
}

pub fn diff_schemas(reference: &Schema, candidate: &Schema) -> Vec<Diagnostic> {
    let entity = reference.entity.as_str();
    let pairing = pair_by_name(&reference.fields, &candidate.fields);
    let mut out = Vec::new();

    for r in pairing.unmatched_reference.iter().filter(|f| f.required) {
        out.push(
            Diagnostic::error(
                MISSING_REQUIRED_FIELD,
                entity,
                format!("required field `{}` is absent from the candidate", r.name),
            )
            .at_field(&r.name)
            .expected(r.declared_type.to_string()),
        );
    }

    for (r, c, renamed) in &pairing.pairs {
        compare_pair(entity, r, c, *renamed, &mut out);
    }

    for c in &pairing.unmatched_candidate {
        out.push(
            Diagnostic::warning(
                UNDECLARED_EXTRA_FIELD,
                entity,
                format!("candidate field `{}` has no reference counterpart", c.name),
            )
            .at_field(&c.name)
            .actual(c.declared_type.to_string()),
        );
    }

    tracing::debug!(entity, diagnostics = out.len(), "schema diffed");
    out
}

pub fn diff_descriptors(
    reference: &ContractDescriptor,
    candidate: &ContractDescriptor,
) -> Vec<Diagnostic> {
    let pairing = pair_by_name(&reference.schemas, &candidate.schemas);
    let mut out = Vec::new();
    for r in pairing.unmatched_reference {
        out.push(Diagnostic::error(
            MISSING_ENTITY,
            &r.entity,
            format!("entity `{}` is not modelled by the candidate", r.entity),
        ));
    }
    for (r, c, _) in pairing.pairs {
        out.extend(diff_schemas(r, c));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{diff_descriptors, diff_schemas, pair_by_name, type_compatible};
    use crate::domain::constants::*;
    use crate::domain::models::{Diagnostic, Schema};
    use crate::domain::raw::{RawConstraints, RawDescriptor, RawField, RawSchema};
    use crate::services::normalizer::{normalize, normalize_descriptor};
    use std::collections::BTreeMap;

    fn raw(name: &str, ty: &str) -> RawField {
        RawField {
            name: name.to_string(),
            declared_type: ty.to_string(),
            required: true,
            constraints: RawConstraints::default(),
            default: None,
            monetary: false,
            unit: None,
        }
    }

    fn schema(fields: Vec<RawField>) -> Schema {
        normalize(&RawSchema {
            entity: "Item".to_string(),
            fields,
        })
        .expect("valid schema")
    }

    fn rules(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().map(|d| d.rule_id.as_str()).collect()
    }

    #[test]
    fn identical_schemas_produce_nothing() {
        let s = schema(vec![raw("sku", "string"), raw("price", "decimal")]);
        assert!(diff_schemas(&s, &s).is_empty());
    }

    #[test]
    fn missing_required_field_is_error_and_optional_is_silent() {
        let mut note = raw("note", "string");
        note.required = false;
        let reference = schema(vec![raw("sku", "string"), note]);
        let candidate = schema(vec![]);
        let diags = diff_schemas(&reference, &candidate);
        assert_eq!(rules(&diags), vec![MISSING_REQUIRED_FIELD]);
        assert_eq!(diags[0].field.as_deref(), Some("sku"));
    }

    #[test]
    fn unmodelled_entity_is_missing_and_renamed_entity_is_not() {
        let entity = |name: &str| RawSchema {
            entity: name.to_string(),
            fields: vec![raw("id", "string")],
        };
        let reference = normalize_descriptor(&RawDescriptor {
            schemas: vec![entity("Item"), entity("Charge")],
            operations: vec![],
        })
        .expect("valid reference");
        let candidate = normalize_descriptor(&RawDescriptor {
            schemas: vec![entity("item")],
            operations: vec![],
        })
        .expect("valid candidate");

        let diags = diff_descriptors(&reference, &candidate);
        assert_eq!(rules(&diags), vec![MISSING_ENTITY]);
        assert_eq!(diags[0].entity, "Charge");
        assert_eq!(diags[0].field, None);

        assert!(diff_descriptors(&reference, &reference).is_empty());
    }

    #[test]
    fn renamed_field_is_naming_mismatch_not_missing() {
        let reference = schema(vec![raw("stock_count", "int")]);
        let candidate = schema(vec![raw("stockCount", "int")]);
        let diags = diff_schemas(&reference, &candidate);
        assert_eq!(rules(&diags), vec![FIELD_NAMING_MISMATCH]);
        assert_eq!(diags[0].actual.as_deref(), Some("stockCount"));
    }

    #[test]
    fn renamed_and_retyped_reports_both() {
        let reference = schema(vec![raw("stock_count", "int")]);
        let candidate = schema(vec![raw("stockCount", "string")]);
        let diags = diff_schemas(&reference, &candidate);
        assert_eq!(rules(&diags), vec![FIELD_NAMING_MISMATCH, TYPE_MISMATCH]);
    }

    #[test]
    fn widening_rules() {
        let int = schema(vec![raw("n", "int")]);
        let dec = schema(vec![raw("n", "decimal")]);
        let flt = schema(vec![raw("n", "float")]);
        let nul = schema(vec![raw("n", "int?")]);
        let f = |s: &Schema| s.fields["n"].clone();
        assert!(type_compatible(&f(&int), &f(&dec)));
        assert!(!type_compatible(&f(&int), &f(&flt)));
        assert!(!type_compatible(&f(&dec), &f(&flt)));
        assert!(!type_compatible(&f(&dec), &f(&int)));
        assert!(type_compatible(&f(&int), &f(&nul)));
        assert!(!type_compatible(&f(&nul), &f(&int)));
    }

    #[test]
    fn unbounded_candidate_gets_one_constraint_error() {
        let mut r = raw("amount", "int");
        r.constraints.min_inclusive = Some(50.0);
        r.constraints.max_inclusive = Some(99_999_999.0);
        let diags = diff_schemas(&schema(vec![r]), &schema(vec![raw("amount", "int")]));
        assert_eq!(rules(&diags), vec![MISSING_CONSTRAINT]);
        assert_eq!(
            diags[0].expected.as_deref(),
            Some("minInclusive=50, maxInclusive=99999999")
        );
        assert_eq!(
            diags[0].actual.as_deref(),
            Some("minInclusive=none, maxInclusive=none")
        );
    }

    #[test]
    fn tighter_candidate_bounds_are_accepted() {
        let mut r = raw("qty", "int");
        r.constraints.min_inclusive = Some(0.0);
        r.constraints.max_inclusive = Some(1000.0);
        let mut c = raw("qty", "int");
        c.constraints.min_inclusive = Some(1.0);
        c.constraints.max_inclusive = Some(500.0);
        assert!(diff_schemas(&schema(vec![r]), &schema(vec![c])).is_empty());
    }

    #[test]
    fn missing_id_pattern_is_a_constraint_error() {
        let mut r = raw("id", "string");
        r.constraints.pattern = Some("^ch_[a-zA-Z0-9]+$".to_string());
        let diags = diff_schemas(&schema(vec![r]), &schema(vec![raw("id", "string")]));
        assert_eq!(rules(&diags), vec![MISSING_CONSTRAINT]);
    }

    #[test]
    fn enum_incompleteness_names_missing_values() {
        let mut r = raw("status", "enum");
        r.constraints.enum_values = vec![
            "in_stock".into(),
            "low_stock".into(),
            "out_of_stock".into(),
            "discontinued".into(),
            "backorder".into(),
        ];
        let mut c = r.clone();
        c.constraints.enum_values.retain(|v| v != "backorder");
        let diags = diff_schemas(&schema(vec![r]), &schema(vec![c]));
        assert_eq!(rules(&diags), vec![ENUM_INCOMPLETE]);
        assert!(diags[0].message.contains("backorder"));
    }

    #[test]
    fn extra_field_is_only_a_warning() {
        let reference = schema(vec![raw("sku", "string")]);
        let candidate = schema(vec![raw("sku", "string"), raw("internal_tag", "string")]);
        let diags = diff_schemas(&reference, &candidate);
        assert_eq!(rules(&diags), vec![UNDECLARED_EXTRA_FIELD]);
        assert!(!diags[0].is_error());
    }

    #[test]
    fn float_for_monetary_field_is_reported_as_money_defect() {
        let mut r = raw("amount", "decimal");
        r.monetary = true;
        let mut c = raw("amount", "float");
        c.monetary = true;
        let diags = diff_schemas(&schema(vec![r]), &schema(vec![c]));
        assert_eq!(rules(&diags), vec![FLOAT_ARITHMETIC_FOR_MONEY]);
    }

    #[test]
    fn optional_candidate_for_required_reference_is_error() {
        let mut c = raw("sku", "string");
        c.required = false;
        let diags = diff_schemas(&schema(vec![raw("sku", "string")]), &schema(vec![c]));
        assert_eq!(rules(&diags), vec![REQUIREDNESS_MISMATCH]);
        assert!(diags[0].is_error());
    }

    #[test]
    fn pairing_prefers_exact_over_shape() {
        let mut reference = BTreeMap::new();
        reference.insert("stock_count".to_string(), 1);
        let mut candidate = BTreeMap::new();
        candidate.insert("stockCount".to_string(), 2);
        candidate.insert("stock_count".to_string(), 3);
        let pairing = pair_by_name(&reference, &candidate);
        assert_eq!(pairing.pairs, vec![(&1, &3, false)]);
        assert_eq!(pairing.unmatched_candidate, vec![&2]);
    }
}
