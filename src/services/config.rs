use crate::domain::constants::{DEFAULT_CONFIG_FILE, RULE_INTERNAL_ERROR};
use crate::domain::models::{CheckConfig, Diagnostic, RuleSetting, Severity};
use crate::services::registry::{find_rule, is_known_rule};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub fn parse_config(raw: &str, path: &Path) -> Result<CheckConfig, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_config(path: &Path) -> Result<CheckConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw, path)
}

/// An explicit path must exist; otherwise `apicheck.toml` in the working
/// directory is used when present, and the empty config when not.
pub fn load_config(explicit: Option<&Path>) -> Result<CheckConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    if !fallback.exists() {
        return Ok(CheckConfig::default());
    }
    tracing::debug!(path = %fallback.display(), "using config from working directory");
    read_config(&fallback)
}

pub fn unknown_rule_ids(config: &CheckConfig) -> Vec<String> {
    config
        .rules
        .keys()
        .filter(|id| !is_known_rule(id))
        .cloned()
        .collect()
}

/// Config settings resolved against the rule catalog, keyed by canonical id.
/// `RULE_INTERNAL_ERROR` and unknown ids are dropped, with one warning each.
#[derive(Debug, Default)]
pub struct RuleOverrides {
    settings: Vec<(&'static str, RuleSetting)>,
}

impl RuleOverrides {
    pub fn resolve(config: &CheckConfig) -> Self {
        let settings = config
            .rules
            .iter()
            .filter_map(|(id, setting)| match find_rule(id) {
                Some(doc) if doc.id != RULE_INTERNAL_ERROR => Some((doc.id, *setting)),
                Some(_) => {
                    tracing::warn!(rule = %id, "severity of internal rule errors cannot be overridden");
                    None
                }
                None => {
                    tracing::warn!(rule = %id, "config names an unknown rule id");
                    None
                }
            })
            .collect();
        Self { settings }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn apply(&self, diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        if self.is_empty() {
            return diagnostics;
        }
        diagnostics
            .into_iter()
            .filter_map(|mut d| {
                match self.settings.iter().find(|(id, _)| *id == d.rule_id) {
                    Some((_, RuleSetting::Off)) => return None,
                    Some((_, RuleSetting::Warn)) => d.severity = Severity::Warning,
                    Some((_, RuleSetting::Error)) => d.severity = Severity::Error,
                    None => {}
                }
                Some(d)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_config, read_config, unknown_rule_ids, ConfigError, RuleOverrides};
    use crate::domain::models::{Diagnostic, RuleSetting, Severity};
    use std::path::Path;
    use tempfile::TempDir;

    fn sample() -> Vec<Diagnostic> {
        vec![
            Diagnostic::warning("UNDECLARED_EXTRA_FIELD", "Item", "").at_field("tag"),
            Diagnostic::error("ENUM_INCOMPLETE", "Item", "").at_field("status"),
            Diagnostic::error("RULE_INTERNAL_ERROR", "getItem", "").at_field("X"),
        ]
    }

    #[test]
    fn parses_settings_and_aliases() {
        let cfg = parse_config(
            "version = \"1\"\n[rules]\nENUM_INCOMPLETE = \"warning\"\nTYPE_MISMATCH = \"off\"\n",
            Path::new("apicheck.toml"),
        )
        .expect("valid config");
        assert_eq!(cfg.rules["ENUM_INCOMPLETE"], RuleSetting::Warn);
        assert_eq!(cfg.rules["TYPE_MISMATCH"], RuleSetting::Off);
    }

    #[test]
    fn rejects_unknown_setting_values() {
        let err = parse_config("[rules]\nENUM_INCOMPLETE = \"loud\"\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_change_severity_and_drop_off_rules() {
        let cfg = parse_config(
            "[rules]\nUNDECLARED_EXTRA_FIELD = \"off\"\nenum_incomplete = \"warn\"\nRULE_INTERNAL_ERROR = \"off\"\n",
            Path::new("x.toml"),
        )
        .expect("valid config");
        let out = RuleOverrides::resolve(&cfg).apply(sample());
        let view: Vec<_> = out.iter().map(|d| (d.rule_id.as_str(), d.severity)).collect();
        assert_eq!(
            view,
            vec![
                ("ENUM_INCOMPLETE", Severity::Warning),
                ("RULE_INTERNAL_ERROR", Severity::Error),
            ]
        );
    }

    #[test]
    fn unknown_ids_are_listed() {
        let cfg = parse_config("[rules]\nNOPE = \"off\"\nTYPE_MISMATCH = \"warn\"\n", Path::new("x.toml"))
            .expect("valid config");
        assert_eq!(unknown_rule_ids(&cfg), vec!["NOPE".to_string()]);
    }

    #[test]
    fn unknown_and_internal_ids_resolve_to_no_overrides() {
        let cfg = parse_config(
            "[rules]\nNOPE = \"off\"\nRULE_INTERNAL_ERROR = \"warn\"\n",
            Path::new("x.toml"),
        )
        .expect("valid config");
        let overrides = RuleOverrides::resolve(&cfg);
        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(sample()), sample());
    }

    #[test]
    fn missing_explicit_file_is_unreadable() {
        let tmp = TempDir::new().expect("temp dir");
        let err = read_config(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }
}
