//! The document grammar as data.
//!
//! The element vocabulary itself is defined outside this crate; what the
//! converters need from it is small enough to carry as a value: the expected
//! root element, the namespace to declare on serialization, the reserved
//! keys of the JSON shape, and which attributes are re-expressed as JSON
//! numbers or booleans. A grammar can be deserialized from JSON so schema
//! evolution stays a data change.

use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON scalar type an attribute's string value coerces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Number,
    Boolean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentGrammar {
    /// Local name the document root must carry.
    pub root_element: String,
    /// Declared as `xmlns` on the serialized root unless the tree already
    /// carries one.
    #[serde(default)]
    pub default_namespace: Option<String>,
    /// JSON field holding the element name.
    #[serde(default = "default_element_key")]
    pub element_key: String,
    /// JSON field holding the ordered child array.
    #[serde(default = "default_children_key")]
    pub children_key: String,
    /// JSON field holding element text content.
    #[serde(default = "default_text_key")]
    pub text_key: String,
    /// Attribute name → scalar type, applied in both conversion directions.
    #[serde(default)]
    pub coercions: BTreeMap<String, AttributeType>,
}

fn default_element_key() -> String {
    "element".to_string()
}

fn default_children_key() -> String {
    "children".to_string()
}

fn default_text_key() -> String {
    "text".to_string()
}

impl DocumentGrammar {
    /// The BPMN 2.0 flavored grammar the default profile edits.
    pub fn bpmn() -> Self {
        let mut coercions = BTreeMap::new();
        for name in ["x", "y", "width", "height"] {
            coercions.insert(name.to_string(), AttributeType::Number);
        }
        for name in ["isExecutable", "isClosed", "isInterrupting"] {
            coercions.insert(name.to_string(), AttributeType::Boolean);
        }
        Self {
            root_element: "definitions".to_string(),
            default_namespace: Some("http://www.omg.org/spec/BPMN/20100524/MODEL".to_string()),
            element_key: default_element_key(),
            children_key: default_children_key(),
            text_key: default_text_key(),
            coercions,
        }
    }

    /// Load a grammar definition from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProfileError::ModelParse(e.to_string()))
    }

    /// Re-express an attribute's string value as the JSON scalar the grammar
    /// assigns it. A value that does not parse as the declared type stays a
    /// string; nothing is invented.
    pub fn coerce(&self, attribute: &str, raw: &str) -> Value {
        match self.coercions.get(attribute) {
            Some(AttributeType::Number) => {
                if let Ok(i) = raw.parse::<i64>() {
                    Value::from(i)
                } else if let Ok(f) = raw.parse::<f64>() {
                    serde_json::Number::from_f64(f)
                        .map(Value::Number)
                        .unwrap_or_else(|| Value::String(raw.to_string()))
                } else {
                    Value::String(raw.to_string())
                }
            }
            Some(AttributeType::Boolean) => match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(raw.to_string()),
            },
            None => Value::String(raw.to_string()),
        }
    }
}

/// Canonical attribute string for a JSON scalar, `None` for arrays, objects
/// and nulls. The string forms here are exactly what `coerce` parses back.
pub fn scalar_to_attr(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpmn_grammar_coerces_declared_attributes() {
        let grammar = DocumentGrammar::bpmn();
        assert_eq!(grammar.coerce("x", "120"), Value::from(120));
        assert_eq!(grammar.coerce("isExecutable", "true"), Value::Bool(true));
        assert_eq!(
            grammar.coerce("id", "120"),
            Value::String("120".to_string())
        );
    }

    #[test]
    fn unparseable_coercion_keeps_the_string() {
        let grammar = DocumentGrammar::bpmn();
        assert_eq!(
            grammar.coerce("isExecutable", "maybe"),
            Value::String("maybe".to_string())
        );
        assert_eq!(
            grammar.coerce("x", "twelve"),
            Value::String("twelve".to_string())
        );
    }

    #[test]
    fn coerce_and_scalar_to_attr_are_inverse() {
        let grammar = DocumentGrammar::bpmn();
        for (attribute, value) in [
            ("x", Value::from(42)),
            ("width", Value::from(12.5)),
            ("isExecutable", Value::Bool(false)),
            ("id", Value::String("n1".to_string())),
        ] {
            let raw = scalar_to_attr(&value).unwrap();
            assert_eq!(grammar.coerce(attribute, &raw), value);
        }
    }

    #[test]
    fn grammar_loads_from_json() {
        let grammar = DocumentGrammar::from_json(
            r#"{
                "root_element": "diagram",
                "coercions": { "weight": "number" }
            }"#,
        )
        .unwrap();
        assert_eq!(grammar.root_element, "diagram");
        assert_eq!(grammar.element_key, "element");
        assert_eq!(grammar.coerce("weight", "3"), Value::from(3));
    }
}
