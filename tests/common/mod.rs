#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    tmp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    /// Runs in the temp dir so no stray `apicheck.toml` is picked up.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("apicheck");
        cmd.current_dir(self.tmp.path());
        cmd
    }

    pub fn write_descriptor(&self, name: &str, descriptor: &Value) -> PathBuf {
        let path = self.tmp.path().join(name);
        fs::write(
            &path,
            serde_json::to_string_pretty(descriptor).expect("serialize descriptor"),
        )
        .expect("write descriptor");
        path
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.tmp.path().join(name);
        fs::write(&path, contents).expect("write file");
        path
    }

    /// `validate --json`, asserting the exit code, returning the envelope.
    pub fn validate_json(&self, reference: &Value, candidate: &Value, code: i32) -> Value {
        let r = self.write_descriptor("reference.json", reference);
        let c = self.write_descriptor("candidate.json", candidate);
        self.run_json(
            &[
                "validate",
                "--reference",
                r.to_str().expect("utf8 path"),
                "--candidate",
                c.to_str().expect("utf8 path"),
            ],
            code,
        )
    }

    pub fn run_json(&self, args: &[&str], code: i32) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}

pub fn rule_ids(envelope: &Value) -> Vec<String> {
    envelope["data"]["diagnostics"]
        .as_array()
        .expect("diagnostics array")
        .iter()
        .map(|d| d["ruleId"].as_str().expect("ruleId").to_string())
        .collect()
}

pub fn field(name: &str, ty: &str) -> Value {
    json!({"name": name, "type": ty, "required": true})
}

pub fn with(mut base: Value, extra: Value) -> Value {
    if let (Some(b), Some(e)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in e {
            b.insert(k.clone(), v.clone());
        }
    }
    base
}

pub fn schema_only(entity: &str, fields: Vec<Value>) -> Value {
    json!({"schemas": [{"entity": entity, "fields": fields}], "operations": []})
}

pub const STATUSES: [&str; 5] = [
    "in_stock",
    "low_stock",
    "out_of_stock",
    "discontinued",
    "backorder",
];

/// Inventory contract with read/update/list operations.
pub fn inventory() -> Value {
    json!({
        "schemas": [{
            "entity": "Item",
            "fields": [
                {"name": "sku", "type": "string", "required": true,
                 "constraints": {"pattern": "^SKU-[0-9]{6}$"}},
                {"name": "stock_count", "type": "int", "required": true,
                 "constraints": {"minInclusive": 0}},
                {"name": "status", "type": "enum", "required": true,
                 "constraints": {"enumValues": STATUSES}},
                {"name": "price", "type": "decimal", "required": true, "monetary": true,
                 "constraints": {"minInclusive": 0}}
            ]
        }],
        "operations": [
            {"name": "getItem", "method": "read", "responseSchema": "Item"},
            {"name": "updateItem", "method": "update", "requestSchema": "Item",
             "behaviorFlags": ["requiresPreconditionToken", "statusCodeOnConflict"]},
            {"name": "listItems", "method": "list", "responseSchema": "Item",
             "behaviorFlags": ["paginationExhaustive"]}
        ]
    })
}
