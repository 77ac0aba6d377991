use assert_cmd::Command;
use predicates::str::contains;

fn cmd() -> Command {
    Command::cargo_bin("apicheck").unwrap()
}

#[test]
fn list_rules_text() {
    cmd()
        .arg("list-rules")
        .assert()
        .success()
        .stdout(contains("IDEMPOTENCY_MISSING\terror\tidempotency"))
        .stdout(contains("UNDECLARED_EXTRA_FIELD\twarning"));
}

#[test]
fn explain_is_case_insensitive() {
    cmd()
        .args(["explain", "precondition_token_missing"])
        .assert()
        .success()
        .stdout(contains("PRECONDITION_TOKEN_MISSING [concurrency, error]"))
        .stdout(contains("fix: "));
}

#[test]
fn explain_unknown_rule_exits_two() {
    cmd()
        .args(["explain", "NOT_A_RULE"])
        .assert()
        .code(2)
        .stderr(contains("unknown rule id `NOT_A_RULE`"));
}

#[test]
fn missing_required_arguments_are_usage_errors() {
    cmd()
        .args(["validate", "--reference", "a.json"])
        .assert()
        .code(2)
        .stderr(contains("--candidate"));
}

#[test]
fn check_config_reports_unknown_ids() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("apicheck.toml");
    std::fs::write(&path, "[rules]\nMADE_UP = \"off\"\n").unwrap();
    cmd()
        .arg("check-config")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(contains("unknown rule ids: MADE_UP"));
}

#[test]
fn check_config_rejects_bad_toml() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("apicheck.toml");
    std::fs::write(&path, "[rules]\nTYPE_MISMATCH = \"sometimes\"\n").unwrap();
    cmd()
        .arg("check-config")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(contains("invalid config"));
}

#[test]
fn check_config_accepts_known_ids() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("apicheck.toml");
    std::fs::write(&path, "[rules]\nenum_incomplete = \"warn\"\nTYPE_MISMATCH = \"off\"\n").unwrap();
    cmd()
        .arg("check-config")
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("config valid: 2 rule settings"));
}
