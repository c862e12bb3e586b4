// src/runtime/validator.rs
//! Checks a record against its block definition before it is built

use crate::runtime::value::{FieldMap, Value};
use crate::schema::Registry;
use crate::SemanticError;

/// Result of validating one `add`
///
/// `warnings` holds the non-fatal unknown-attribute reports, in field order,
/// whether or not validation succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub warnings: Vec<SemanticError>,
    pub result: Result<FieldMap, SemanticError>,
}

/// Validate provided fields for `block`.
///
/// 1. the schema must exist
/// 2. every declared field must be provided
/// 3. undeclared fields are reported and kept
/// 4. declared fields must satisfy their type; the first mismatch rejects the record
pub fn validate(registry: &Registry, block: &str, provided: Vec<(String, Value)>) -> Validation {
    let mut warnings = Vec::new();
    let result = check(registry, block, provided, &mut warnings);
    Validation { warnings, result }
}

fn check(
    registry: &Registry,
    block: &str,
    provided: Vec<(String, Value)>,
    warnings: &mut Vec<SemanticError>,
) -> Result<FieldMap, SemanticError> {
    let definition = registry
        .get(block)
        .ok_or_else(|| SemanticError::UndefinedBlock(block.to_string()))?;

    let missing: Vec<String> = definition
        .fields()
        .iter()
        .filter(|spec| !provided.iter().any(|(name, _)| *name == spec.name))
        .map(|spec| spec.name.clone())
        .collect();

    if !missing.is_empty() {
        return Err(SemanticError::MissingFields {
            block: block.to_string(),
            missing,
        });
    }

    let mut data = FieldMap::new();
    for (field, value) in provided {
        match definition.field_type(&field) {
            None => {
                warnings.push(SemanticError::UnknownAttribute {
                    field: field.clone(),
                    block: block.to_string(),
                });
            }
            Some(expected) if !expected.accepts(&value) => {
                return Err(SemanticError::TypeMismatch {
                    field,
                    expected,
                    actual: value.kind_name(),
                });
            }
            Some(_) => {}
        }
        data.insert(field, value);
    }

    Ok(data)
}
