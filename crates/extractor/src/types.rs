use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal default value of an accessor call.
///
/// Serialized untagged so the catalog stores plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// String literal, or the source text of a non-literal default expression
    Text(String),
}

impl DefaultValue {
    /// Python type name of the literal
    pub fn type_name(&self) -> &'static str {
        match self {
            DefaultValue::Bool(_) => "bool",
            DefaultValue::Integer(_) => "int",
            DefaultValue::Float(_) => "float",
            DefaultValue::Text(_) => "str",
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(value) => write!(f, "{value}"),
            DefaultValue::Integer(value) => write!(f, "{value}"),
            DefaultValue::Float(value) => write!(f, "{value}"),
            DefaultValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// One recognised accessor invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    /// Literal variable name
    pub name: String,

    /// Whether the call passes a default argument
    pub has_default: bool,

    /// Default literal; `None` for no default or an explicit `None`
    pub default_value: Option<DefaultValue>,

    /// Best-effort static type tag (`str`, `int`, `Optional` inner type, ...)
    pub inferred_type: Option<String>,

    /// Line of the call (1-indexed)
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_value_serializes_as_plain_scalar() {
        assert_eq!(
            serde_json::to_string(&DefaultValue::Bool(false)).unwrap(),
            "false"
        );
        assert_eq!(
            serde_json::to_string(&DefaultValue::Integer(30)).unwrap(),
            "30"
        );
        assert_eq!(
            serde_json::to_string(&DefaultValue::Text("x".into())).unwrap(),
            "\"x\""
        );
    }

    #[test]
    fn test_default_value_deserializes_by_json_kind() {
        let values: Vec<DefaultValue> =
            serde_json::from_str(r#"[true, 8080, 0.5, "localhost"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                DefaultValue::Bool(true),
                DefaultValue::Integer(8080),
                DefaultValue::Float(0.5),
                DefaultValue::Text("localhost".into()),
            ]
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(DefaultValue::Bool(true).type_name(), "bool");
        assert_eq!(DefaultValue::Float(1.5).type_name(), "float");
    }
}
