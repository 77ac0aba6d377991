use crate::domain::raw::RawDescriptor;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const DESCRIPTOR_FILE_NAME: &str = "descriptor.json";

/// Input that makes a comparison meaningless. Never reported as a diagnostic.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MalformedInputError {
    #[error("{entity}.{field}: unknown declared type `{declared}`")]
    UnknownType {
        entity: String,
        field: String,
        declared: String,
    },
    #[error("{entity}.{field}: enum declares no values")]
    EmptyEnum { entity: String, field: String },
    #[error("{entity}.{field}: minInclusive {min} exceeds maxInclusive {max}")]
    ConflictingBounds {
        entity: String,
        field: String,
        min: f64,
        max: f64,
    },
    #[error("{entity}.{field}: minLength {min} exceeds maxLength {max}")]
    ConflictingLengths {
        entity: String,
        field: String,
        min: u64,
        max: u64,
    },
    #[error("{entity}.{field}: invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        entity: String,
        field: String,
        pattern: String,
        reason: String,
    },
    #[error("{entity}: duplicate field name `{field}`")]
    DuplicateField { entity: String, field: String },
    #[error("{entity}: field with empty name")]
    EmptyFieldName { entity: String },
    #[error("duplicate schema entity `{0}`")]
    DuplicateEntity(String),
    #[error("duplicate operation name `{0}`")]
    DuplicateOperation(String),
    #[error("operation `{operation}` references undeclared schema `{schema}`")]
    UndeclaredSchema { operation: String, schema: String },
}

#[derive(thiserror::Error, Debug)]
pub enum DescriptorError {
    #[error("cannot read descriptor {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse descriptor {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    pub path: PathBuf,
    pub raw: RawDescriptor,
    pub sha256: String,
}

/// A directory stands for the `descriptor.json` inside it.
pub fn resolve_descriptor_file(source: &Path) -> PathBuf {
    if source.is_dir() {
        source.join(DESCRIPTOR_FILE_NAME)
    } else {
        source.to_path_buf()
    }
}

pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn load_descriptor(source: &Path) -> Result<LoadedDescriptor, DescriptorError> {
    let path = resolve_descriptor_file(source);
    let bytes = std::fs::read(&path).map_err(|source| DescriptorError::Unreadable {
        path: path.clone(),
        source,
    })?;
    let raw = serde_json::from_slice(&bytes).map_err(|source| DescriptorError::Parse {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "descriptor loaded");
    Ok(LoadedDescriptor {
        sha256: fingerprint(&bytes),
        path,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::{fingerprint, load_descriptor, DescriptorError};
    use crate::domain::models::{BehaviorFlag, Method};
    use crate::domain::raw::RawDescriptor;
    use tempfile::TempDir;

    fn parse_descriptor(raw: &str) -> Result<RawDescriptor, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[test]
    fn parses_reference_serialized_form() {
        let raw = parse_descriptor(
            r#"{
                "schemas": [{"entity": "Charge", "fields": [
                    {"name": "amount", "type": "int", "required": true,
                     "constraints": {"minInclusive": 50, "maxInclusive": 99999999}}
                ]}],
                "operations": [{"name": "updateCharge", "method": "update",
                    "requestSchema": "Charge", "behaviorFlags": ["ifMatch"]}]
            }"#,
        )
        .expect("parse");
        assert_eq!(raw.schemas[0].fields[0].constraints.min_inclusive, Some(50.0));
        assert_eq!(raw.operations[0].method, Method::Update);
        assert_eq!(
            raw.operations[0].behavior_flags,
            vec![BehaviorFlag::RequiresPreconditionToken]
        );
    }

    #[test]
    fn unknown_behavior_flag_is_rejected() {
        let err = parse_descriptor(
            r#"{"operations": [{"name": "x", "method": "read", "behaviorFlags": ["retriesForever"]}]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn directory_source_resolves_descriptor_json() {
        let tmp = TempDir::new().expect("temp dir");
        std::fs::write(tmp.path().join("descriptor.json"), r#"{"schemas": []}"#)
            .expect("write descriptor");
        let loaded = load_descriptor(tmp.path()).expect("load");
        assert!(loaded.raw.schemas.is_empty());
        assert_eq!(loaded.sha256, fingerprint(br#"{"schemas": []}"#));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let tmp = TempDir::new().expect("temp dir");
        let err = load_descriptor(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DescriptorError::Unreadable { .. }));
    }
}
