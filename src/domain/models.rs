use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Canonical declared type. `Nullable` always wraps a non-nullable type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    Int,
    Float,
    Decimal,
    String,
    Bool,
    Enum,
    Object,
    Array,
    Nullable(Box<FieldType>),
}

impl FieldType {
    pub fn nullable(inner: FieldType) -> FieldType {
        match inner {
            FieldType::Nullable(_) => inner,
            other => FieldType::Nullable(Box::new(other)),
        }
    }

    /// The type with any nullable wrapper removed.
    pub fn base(&self) -> &FieldType {
        match self {
            FieldType::Nullable(inner) => inner.base(),
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Nullable(_))
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.base(), FieldType::Float)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.base(),
            FieldType::Int | FieldType::Float | FieldType::Decimal
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Decimal => f.write_str("decimal"),
            FieldType::String => f.write_str("string"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Enum => f.write_str("enum"),
            FieldType::Object => f.write_str("object"),
            FieldType::Array => f.write_str("array"),
            FieldType::Nullable(inner) => write!(f, "nullable<{}>", inner),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_inclusive: Option<f64>,
    pub max_inclusive: Option<f64>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub enum_values: BTreeSet<String>,
}

impl Constraints {
    pub fn is_bounded(&self) -> bool {
        self.min_inclusive.is_some() && self.max_inclusive.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub declared_type: FieldType,
    pub required: bool,
    pub constraints: Constraints,
    pub default_value: Option<Value>,
    pub monetary: bool,
    /// Currency unit for integer money representations (e.g. `cents`).
    pub unit: Option<String>,
}

impl Field {
    /// True when the field can carry money without rounding: a decimal, or an
    /// integer in minor currency units with both bounds declared.
    pub fn is_decimal_compatible(&self) -> bool {
        match self.declared_type.base() {
            FieldType::Decimal => true,
            FieldType::Int => self.unit.is_some() && self.constraints.is_bounded(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub entity: String,
    pub fields: BTreeMap<String, Field>,
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn monetary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|f| f.monetary)
    }

    pub fn nullable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|f| f.declared_type.is_nullable())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Create => "create",
            Method::Read => "read",
            Method::Update => "update",
            Method::Delete => "delete",
            Method::List => "list",
        };
        f.write_str(s)
    }
}

/// Declared behavior metadata. The engine trusts these as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BehaviorFlag {
    RequiresIdempotencyKey,
    #[serde(alias = "ifMatch")]
    RequiresPreconditionToken,
    RequiresSignatureVerification,
    UsesExactDecimalArithmetic,
    NullableFieldsHandledSafely,
    PaginationExhaustive,
    EnumExhaustive,
    StatusCodeOnConflict,
    RequiresAuthorization,
    SharedMutableTestDouble,
    ShallowTestAssertions,
}

impl fmt::Display for BehaviorFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BehaviorFlag::RequiresIdempotencyKey => "requiresIdempotencyKey",
            BehaviorFlag::RequiresPreconditionToken => "requiresPreconditionToken",
            BehaviorFlag::RequiresSignatureVerification => "requiresSignatureVerification",
            BehaviorFlag::UsesExactDecimalArithmetic => "usesExactDecimalArithmetic",
            BehaviorFlag::NullableFieldsHandledSafely => "nullableFieldsHandledSafely",
            BehaviorFlag::PaginationExhaustive => "paginationExhaustive",
            BehaviorFlag::EnumExhaustive => "enumExhaustive",
            BehaviorFlag::StatusCodeOnConflict => "statusCodeOnConflict",
            BehaviorFlag::RequiresAuthorization => "requiresAuthorization",
            BehaviorFlag::SharedMutableTestDouble => "sharedMutableTestDouble",
            BehaviorFlag::ShallowTestAssertions => "shallowTestAssertions",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub method: Method,
    pub request_schema: Option<String>,
    pub response_schema: Option<String>,
    pub behavior_flags: BTreeSet<BehaviorFlag>,
}

impl Operation {
    pub fn has(&self, flag: BehaviorFlag) -> bool {
        self.behavior_flags.contains(&flag)
    }
}

/// One side of a comparison: every schema keyed by entity, every operation
/// keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractDescriptor {
    pub schemas: BTreeMap<String, Schema>,
    pub operations: BTreeMap<String, Operation>,
}

impl ContractDescriptor {
    pub fn bind<'a>(&'a self, operation: &'a Operation) -> BoundOperation<'a> {
        BoundOperation {
            operation,
            request: operation
                .request_schema
                .as_deref()
                .and_then(|name| self.schemas.get(name)),
            response: operation
                .response_schema
                .as_deref()
                .and_then(|name| self.schemas.get(name)),
        }
    }
}

/// An operation with its schema references resolved against its descriptor.
#[derive(Debug, Clone, Copy)]
pub struct BoundOperation<'a> {
    pub operation: &'a Operation,
    pub request: Option<&'a Schema>,
    pub response: Option<&'a Schema>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub entity: String,
    pub field: Option<String>,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl Diagnostic {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        entity: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity,
            entity: entity.to_string(),
            field: None,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn error(rule_id: &str, entity: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Error, entity, message)
    }

    pub fn warning(rule_id: &str, entity: &str, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Warning, entity, message)
    }

    pub fn at_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub pass: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InputDigests {
    pub reference_sha256: String,
    pub candidate_sha256: String,
}

#[derive(Serialize)]
pub struct ValidateReport {
    #[serde(flatten)]
    pub verdict: Verdict,
    pub inputs: InputDigests,
}

#[derive(Serialize, Clone)]
pub struct RuleInfo {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub summary: String,
    pub why: String,
    pub fix: String,
}

#[derive(Serialize)]
pub struct ConfigCheckReport {
    pub path: String,
    pub valid: bool,
    pub configured_rules: usize,
    pub unknown_rules: Vec<String>,
}

/// Per-rule override read from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetting {
    Off,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

#[derive(Serialize)]
pub struct ErrorReport {
    pub error: String,
}
