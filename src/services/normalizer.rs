use crate::descriptor::MalformedInputError;
use crate::domain::models::{Constraints, ContractDescriptor, Field, FieldType, Operation, Schema};
use crate::domain::raw::{RawConstraints, RawDescriptor, RawField, RawOperation, RawSchema};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

const CENTS: &str = "cents";

/// A declared type after synonym resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedType {
    pub ty: FieldType,
    /// Currency unit implied by the synonym (`cents`).
    pub unit: Option<&'static str>,
    /// The synonym itself names money (`money`, `currency`, `cents`).
    pub monetary: bool,
}

impl ParsedType {
    fn plain(ty: FieldType) -> Self {
        Self {
            ty,
            unit: None,
            monetary: false,
        }
    }
}

pub fn parse_type(raw: &str) -> Option<ParsedType> {
    let s = raw.trim().to_ascii_lowercase();
    if let Some(inner) = s.strip_suffix('?') {
        let parsed = parse_type(inner)?;
        return Some(ParsedType {
            ty: FieldType::nullable(parsed.ty),
            ..parsed
        });
    }
    for wrapper in ["nullable<", "optional<"] {
        if let Some(rest) = s.strip_prefix(wrapper) {
            let inner = rest.strip_suffix('>')?;
            if inner.trim().is_empty() {
                return None;
            }
            let parsed = parse_type(inner)?;
            return Some(ParsedType {
                ty: FieldType::nullable(parsed.ty),
                ..parsed
            });
        }
    }
    let parsed = match s.as_str() {
        "int" | "integer" | "long" | "i32" | "i64" | "u32" | "u64" => ParsedType::plain(FieldType::Int),
        "float" | "double" | "number" | "f32" | "f64" | "real" => ParsedType::plain(FieldType::Float),
        "decimal" | "bigdecimal" => ParsedType::plain(FieldType::Decimal),
        "money" | "currency" => ParsedType {
            ty: FieldType::Decimal,
            unit: None,
            monetary: true,
        },
        "string" | "str" | "text" | "uuid" | "datetime" => ParsedType::plain(FieldType::String),
        "bool" | "boolean" => ParsedType::plain(FieldType::Bool),
        "enum" => ParsedType::plain(FieldType::Enum),
        "object" | "map" | "record" | "struct" => ParsedType::plain(FieldType::Object),
        "array" | "list" | "vec" => ParsedType::plain(FieldType::Array),
        "cents" | "minor_units" | "currency_cents" => ParsedType {
            ty: FieldType::Int,
            unit: Some(CENTS),
            monetary: true,
        },
        _ => return None,
    };
    Some(parsed)
}

fn canonical_unit(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "cents" | "minor_units" | "currency_cents" => CENTS.to_string(),
        other => other.to_string(),
    }
}

fn rewrap(original: &FieldType, base: FieldType) -> FieldType {
    if original.is_nullable() {
        FieldType::nullable(base)
    } else {
        base
    }
}

fn normalize_field(entity: &str, raw: &RawField) -> Result<Field, MalformedInputError> {
    let name = raw.name.trim();
    if name.is_empty() {
        return Err(MalformedInputError::EmptyFieldName {
            entity: entity.to_string(),
        });
    }
    let malformed_type = || MalformedInputError::UnknownType {
        entity: entity.to_string(),
        field: name.to_string(),
        declared: raw.declared_type.clone(),
    };
    let parsed = parse_type(&raw.declared_type).ok_or_else(malformed_type)?;
    let mut declared_type = parsed.ty;

    let enum_values: BTreeSet<String> = raw
        .constraints
        .enum_values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if *declared_type.base() == FieldType::String && !enum_values.is_empty() {
        declared_type = rewrap(&declared_type, FieldType::Enum);
    }
    if *declared_type.base() == FieldType::Enum && enum_values.is_empty() {
        return Err(MalformedInputError::EmptyEnum {
            entity: entity.to_string(),
            field: name.to_string(),
        });
    }

    let c = &raw.constraints;
    if let (Some(min), Some(max)) = (c.min_inclusive, c.max_inclusive) {
        if min > max {
            return Err(MalformedInputError::ConflictingBounds {
                entity: entity.to_string(),
                field: name.to_string(),
                min,
                max,
            });
        }
    }
    if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
        if min > max {
            return Err(MalformedInputError::ConflictingLengths {
                entity: entity.to_string(),
                field: name.to_string(),
                min,
                max,
            });
        }
    }
    if let Some(pattern) = &c.pattern {
        if let Err(e) = regex::Regex::new(pattern) {
            return Err(MalformedInputError::InvalidPattern {
                entity: entity.to_string(),
                field: name.to_string(),
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    let unit = raw
        .unit
        .as_deref()
        .map(canonical_unit)
        .or_else(|| parsed.unit.map(str::to_string));
    let monetary = raw.monetary || parsed.monetary || unit.as_deref() == Some(CENTS);

    Ok(Field {
        name: name.to_string(),
        declared_type,
        required: raw.required,
        constraints: Constraints {
            min_inclusive: c.min_inclusive,
            max_inclusive: c.max_inclusive,
            pattern: c.pattern.clone(),
            min_length: c.min_length,
            max_length: c.max_length,
            enum_values,
        },
        default_value: raw.default.clone(),
        monetary,
        unit,
    })
}

pub fn normalize(raw: &RawSchema) -> Result<Schema, MalformedInputError> {
    let entity = raw.entity.trim().to_string();
    let mut fields = BTreeMap::new();
    for raw_field in &raw.fields {
        let field = normalize_field(&entity, raw_field)?;
        match fields.entry(field.name.clone()) {
            Entry::Occupied(_) => {
                return Err(MalformedInputError::DuplicateField {
                    entity,
                    field: field.name,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(field);
            }
        }
    }
    Ok(Schema { entity, fields })
}

fn normalize_operation(raw: &RawOperation) -> Operation {
    let trim = |s: &Option<String>| s.as_ref().map(|v| v.trim().to_string());
    Operation {
        name: raw.name.trim().to_string(),
        method: raw.method,
        request_schema: trim(&raw.request_schema),
        response_schema: trim(&raw.response_schema),
        behavior_flags: raw.behavior_flags.iter().copied().collect(),
    }
}

pub fn normalize_descriptor(raw: &RawDescriptor) -> Result<ContractDescriptor, MalformedInputError> {
    let mut schemas = BTreeMap::new();
    for raw_schema in &raw.schemas {
        let schema = normalize(raw_schema)?;
        if schemas.contains_key(&schema.entity) {
            return Err(MalformedInputError::DuplicateEntity(schema.entity));
        }
        schemas.insert(schema.entity.clone(), schema);
    }

    let mut operations = BTreeMap::new();
    for raw_op in &raw.operations {
        let op = normalize_operation(raw_op);
        for schema in [&op.request_schema, &op.response_schema].into_iter().flatten() {
            if !schemas.contains_key(schema) {
                return Err(MalformedInputError::UndeclaredSchema {
                    operation: op.name.clone(),
                    schema: schema.clone(),
                });
            }
        }
        if operations.contains_key(&op.name) {
            return Err(MalformedInputError::DuplicateOperation(op.name));
        }
        operations.insert(op.name.clone(), op);
    }

    Ok(ContractDescriptor {
        schemas,
        operations,
    })
}

impl Schema {
    /// Canonical raw rendering; `normalize(&s.to_raw())` reproduces `s`.
    pub fn to_raw(&self) -> RawSchema {
        RawSchema {
            entity: self.entity.clone(),
            fields: self
                .fields
                .values()
                .map(|f| RawField {
                    name: f.name.clone(),
                    declared_type: f.declared_type.to_string(),
                    required: f.required,
                    constraints: RawConstraints {
                        min_inclusive: f.constraints.min_inclusive,
                        max_inclusive: f.constraints.max_inclusive,
                        pattern: f.constraints.pattern.clone(),
                        min_length: f.constraints.min_length,
                        max_length: f.constraints.max_length,
                        enum_values: f.constraints.enum_values.iter().cloned().collect(),
                    },
                    default: f.default_value.clone(),
                    monetary: f.monetary,
                    unit: f.unit.clone(),
                })
                .collect(),
        }
    }
}
