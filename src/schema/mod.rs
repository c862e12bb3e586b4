// src/schema/mod.rs
//! Block definitions and the registry that holds them
//!
//! A block definition is a named, ordered list of typed fields. Records
//! instantiated under that name are checked against it before they reach
//! the ledger.

use crate::runtime::value::{repr_str, Value};
use crate::SemanticError;
use ahash::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeTag {
    Str,
    Int,
    Long,
    Float,
    List,
    Tuple,
    Dict,
}

impl TypeTag {
    /// Upper-cased tag name, as stored in the registry
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Str => "STR",
            TypeTag::Int => "INT",
            TypeTag::Long => "LONG",
            TypeTag::Float => "FLOAT",
            TypeTag::List => "LIST",
            TypeTag::Tuple => "TUPLE",
            TypeTag::Dict => "DICT",
        }
    }

    /// Whether `value` satisfies this declared type.
    ///
    /// LONG is INT under another label. FLOAT also takes integers.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeTag::Str => matches!(value, Value::String(_)),
            TypeTag::Int | TypeTag::Long => matches!(value, Value::Int(_)),
            TypeTag::Float => value.is_numeric(),
            TypeTag::List => matches!(value, Value::List(_)),
            TypeTag::Tuple => matches!(value, Value::Tuple(_)),
            TypeTag::Dict => matches!(value, Value::Dict(_)),
        }
    }

    /// Phrase used in "should be ..." diagnostics
    pub fn expectation(&self) -> &'static str {
        match self {
            TypeTag::Str => "a string",
            TypeTag::Int => "an integer",
            TypeTag::Long => "a long/integer",
            TypeTag::Float => "a number",
            TypeTag::List => "list",
            TypeTag::Tuple => "tuple",
            TypeTag::Dict => "dict",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive: `str`, `Str` and `STR` all name [`TypeTag::Str`]
impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STR" => Ok(TypeTag::Str),
            "INT" => Ok(TypeTag::Int),
            "LONG" => Ok(TypeTag::Long),
            "FLOAT" => Ok(TypeTag::Float),
            "LIST" => Ok(TypeTag::List),
            "TUPLE" => Ok(TypeTag::Tuple),
            "DICT" => Ok(TypeTag::Dict),
            _ => Err(s.to_ascii_uppercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeTag,
}

/// Named schema: ordered (field, type) pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub name: String,
    fields: Vec<FieldSpec>,
}

impl BlockDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field; redeclaring a name replaces its type and keeps its position
    pub fn with_field(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.declare(name, ty);
        self
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: TypeTag) {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.fields.push(FieldSpec { name, ty }),
        }
    }

    /// Build a definition from textual type names, e.g. for hosts that load
    /// schemas from outside the DSL.
    pub fn from_type_names<'a>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, SemanticError> {
        let mut definition = Self::new(name);
        for (field, type_name) in fields {
            let ty = type_name
                .parse::<TypeTag>()
                .map_err(|type_name| SemanticError::UnknownExpectedType {
                    field: field.to_string(),
                    type_name,
                })?;
            definition.declare(field, ty);
        }
        Ok(definition)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_type(&self, name: &str) -> Option<TypeTag> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.ty)
    }

    /// `[('name', 'STR'), ('age', 'INT')]`
    pub fn describe(&self) -> String {
        let pairs: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("({}, {})", repr_str(&f.name), repr_str(f.ty.name())))
            .collect();
        format!("[{}]", pairs.join(", "))
    }
}

/// Process-wide schema table for one session
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: HashMap<String, BlockDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or overwrite a definition; returns the one it replaced
    pub fn define(&mut self, definition: BlockDefinition) -> Option<BlockDefinition> {
        self.definitions.insert(definition.name.clone(), definition)
    }

    pub fn get(&self, name: &str) -> Option<&BlockDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
