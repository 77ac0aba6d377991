use crate::domain::models::{Diagnostic, JsonOut};
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

/// Single document. `ok` is the caller's outcome, not just "command ran".
pub fn print_one<T: Serialize>(
    json: bool,
    ok: bool,
    data: T,
    text: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok, data })?
        );
    } else {
        println!("{}", text(&data));
    }
    Ok(())
}

/// `severity  RULE_ID  Entity.field  message` for text output.
pub fn diagnostic_row(d: &Diagnostic) -> String {
    let location = match &d.field {
        Some(field) => format!("{}.{}", d.entity, field),
        None => d.entity.clone(),
    };
    let mut row = format!(
        "{:<7}  {}  {}  {}",
        d.severity.to_string(),
        d.rule_id,
        location,
        d.message
    );
    if let Some(expected) = &d.expected {
        row.push_str(&format!("\n         expected: {expected}"));
    }
    if let Some(actual) = &d.actual {
        row.push_str(&format!("\n         actual:   {actual}"));
    }
    row
}
