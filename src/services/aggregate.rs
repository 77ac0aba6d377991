use crate::domain::models::{Diagnostic, Severity, Verdict};
use std::collections::HashSet;

/// Merges structural then behavioral findings: first `(rule, entity, field)`
/// occurrence wins, output is sorted by `(entity, field, rule)`.
pub fn aggregate(structural: Vec<Diagnostic>, behavioral: Vec<Diagnostic>) -> Verdict {
    let mut seen = HashSet::new();
    let mut diagnostics: Vec<Diagnostic> = structural
        .into_iter()
        .chain(behavioral)
        .filter(|d| seen.insert((d.rule_id.clone(), d.entity.clone(), d.field.clone())))
        .collect();

    diagnostics.sort_by(|a, b| {
        a.entity
            .cmp(&b.entity)
            .then_with(|| a.field.as_deref().unwrap_or("").cmp(b.field.as_deref().unwrap_or("")))
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });

    Verdict {
        pass: !diagnostics.iter().any(Diagnostic::is_error),
        diagnostics,
    }
}

/// Hides diagnostics below `min` for display. `pass` is left as computed.
pub fn filter_min_severity(verdict: &Verdict, min: Severity) -> Verdict {
    Verdict {
        pass: verdict.pass,
        diagnostics: verdict
            .diagnostics
            .iter()
            .filter(|d| d.severity >= min)
            .cloned()
            .collect(),
    }
}
