use crate::*;
use std::path::Path;
use std::process::ExitCode;

pub fn handle_list_rules(cli: &Cli) -> anyhow::Result<ExitCode> {
    let rules = catalog();
    print_out(cli.json, &rules, |r| {
        format!("{}\t{}\t{}\t{}", r.id, r.severity, r.category, r.summary)
    })?;
    Ok(ExitCode::from(exit_codes::PASS))
}

pub fn handle_explain(cli: &Cli, rule_id: &str) -> anyhow::Result<ExitCode> {
    let Some(doc) = find_rule(rule_id) else {
        anyhow::bail!("unknown rule id `{}` (see `apicheck list-rules`)", rule_id);
    };
    print_one(cli.json, true, doc.info(), |r| {
        format!(
            "{} [{}, {}]\n{}\n\nwhy: {}\nfix: {}",
            r.id, r.category, r.severity, r.summary, r.why, r.fix
        )
    })?;
    Ok(ExitCode::from(exit_codes::PASS))
}

/// Exits `MALFORMED` when the file parses but names unknown rule ids.
pub fn handle_check_config(cli: &Cli, path: &Path) -> anyhow::Result<ExitCode> {
    let config = read_config(path)?;
    let unknown = unknown_rule_ids(&config);
    let report = ConfigCheckReport {
        path: path.display().to_string(),
        valid: unknown.is_empty(),
        configured_rules: config.rules.len(),
        unknown_rules: unknown,
    };
    let valid = report.valid;
    print_one(cli.json, valid, report, |r| {
        if r.valid {
            format!("config valid: {} rule settings", r.configured_rules)
        } else {
            format!("unknown rule ids: {}", r.unknown_rules.join(", "))
        }
    })?;
    Ok(ExitCode::from(if valid {
        exit_codes::PASS
    } else {
        exit_codes::MALFORMED
    }))
}
