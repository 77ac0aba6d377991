use crate::*;
use std::path::Path;
use std::process::ExitCode;

pub fn handle_validate(
    cli: &Cli,
    reference: &Path,
    candidate: &Path,
    config: Option<&Path>,
    min_severity: MinSeverity,
) -> anyhow::Result<ExitCode> {
    let config = load_config(config)?;

    let reference = load_descriptor(reference)?;
    let candidate = load_descriptor(candidate)?;
    tracing::debug!(
        reference = %reference.path.display(),
        candidate = %candidate.path.display(),
        "comparing descriptors"
    );
    let verdict = check_raw(&reference.raw, &candidate.raw, &config)?;
    let pass = verdict.pass;

    let report = ValidateReport {
        verdict: filter_min_severity(&verdict, min_severity.severity()),
        inputs: InputDigests {
            reference_sha256: reference.sha256,
            candidate_sha256: candidate.sha256,
        },
    };
    let (errors, warnings) = (verdict.error_count(), verdict.warning_count());
    print_one(cli.json, pass, report, |r| {
        let mut lines: Vec<String> = r.verdict.diagnostics.iter().map(diagnostic_row).collect();
        lines.push(format!(
            "{} ({} errors, {} warnings)",
            if pass { "PASS" } else { "FAIL" },
            errors,
            warnings
        ));
        lines.join("\n")
    })?;

    Ok(ExitCode::from(if pass {
        exit_codes::PASS
    } else {
        exit_codes::FAIL
    }))
}
