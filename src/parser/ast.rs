// src/parser/ast.rs
//! Syntax tree for one DSL statement
//!
//! Statements are evaluated as soon as they are parsed, so there is no
//! program-level tree: the parser hands out one [`Statement`] at a time.

use crate::runtime::value::{FieldMap, Value};
use crate::schema::TypeTag;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// block Person = (name: str, age: int)
    Define {
        name: String,
        attributes: Vec<Attribute>,
    },

    /// add Person = (name: "Alice", age: 30)
    Add {
        block: String,
        fields: Vec<FieldInit>,
    },

    /// print Person
    Print { block: String },

    /// view Person (accepted, no effect)
    View { block: String },

    /// mine Person
    Mine { block: String },

    /// export Person
    Export { block: String },
}

impl Statement {
    /// Keyword that introduced the statement
    pub fn keyword(&self) -> &'static str {
        match self {
            Statement::Define { .. } => "block",
            Statement::Add { .. } => "add",
            Statement::Print { .. } => "print",
            Statement::View { .. } => "view",
            Statement::Mine { .. } => "mine",
            Statement::Export { .. } => "export",
        }
    }

    /// Schema name the statement refers to
    pub fn target(&self) -> &str {
        match self {
            Statement::Define { name, .. } => name,
            Statement::Add { block, .. }
            | Statement::Print { block }
            | Statement::View { block }
            | Statement::Mine { block }
            | Statement::Export { block } => block,
        }
    }
}

/// `name: type` inside a block definition
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub ty: TypeTag,
}

/// `name: literal` inside an `add` statement or a tuple literal
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),

    /// `(a: 1, b: "x")`, a keyed mapping despite the parentheses
    Tuple(Vec<FieldInit>),

    /// `[1, 2.5, "x"]`
    List(Vec<Literal>),

    /// `{"k": 1}`
    Dict(Vec<(String, Literal)>),
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::String(s) => Value::String(s),
            Literal::Int(n) => Value::Int(n),
            Literal::Float(f) => Value::Float(f),
            Literal::Tuple(fields) => Value::Dict(
                fields
                    .into_iter()
                    .map(|field| (field.name, Value::from(field.value)))
                    .collect(),
            ),
            Literal::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Literal::Dict(pairs) => Value::Dict(
                pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<FieldMap>(),
            ),
        }
    }
}

impl From<FieldInit> for (String, Value) {
    fn from(field: FieldInit) -> Self {
        (field.name, field.value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_literal_becomes_mapping() {
        let literal = Literal::Tuple(vec![
            FieldInit { name: "x".to_string(), value: Literal::Int(1) },
            FieldInit { name: "y".to_string(), value: Literal::Float(2.5) },
        ]);

        let value = Value::from(literal);

        assert_eq!(value.kind_name(), "dict");
        assert_eq!(value.to_string(), "{'x': 1, 'y': 2.5}");
    }

    #[test]
    fn test_dict_literal_keeps_first_position_of_duplicate_keys() {
        let literal = Literal::Dict(vec![
            ("a".to_string(), Literal::Int(1)),
            ("b".to_string(), Literal::Int(2)),
            ("a".to_string(), Literal::Int(3)),
        ]);

        assert_eq!(Value::from(literal).to_string(), "{'a': 3, 'b': 2}");
    }
}
