use crate::style::error::StyleError;
use serde_json::{Map, Value};

/// A Plotly template: a `layout` object plus optional per-trace-type `data` defaults.
///
/// The only property interpreted by this crate is `layout.autosize`; everything
/// else is handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefinition {
    layout: Map<String, Value>,
    /// Every top-level entry except `layout`.
    rest: Map<String, Value>,
}

impl StyleDefinition {
    /// Wraps a JSON value as a style.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Malformed`] unless `value` is an object whose `layout`
    /// entry is itself an object.
    pub fn from_value(value: Value) -> Result<Self, StyleError> {
        let Value::Object(mut rest) = value else {
            return Err(StyleError::Malformed("style must be a JSON object".to_string()));
        };
        match rest.remove("layout") {
            Some(Value::Object(layout)) => Ok(Self { layout, rest }),
            Some(_) => Err(StyleError::Malformed("'layout' must be an object".to_string())),
            None => Err(StyleError::Malformed("missing 'layout' object".to_string())),
        }
    }

    /// Parses a JSON style document.
    pub fn from_json(text: &str) -> Result<Self, StyleError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Parses a YAML style document.
    pub fn from_yaml(text: &str) -> Result<Self, StyleError> {
        Self::from_value(serde_yaml::from_str(text)?)
    }

    /// Whether the style makes charts fill their container. Missing means `false`.
    pub fn autosize(&self) -> bool {
        match self.layout().get("autosize") {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }

    pub fn layout(&self) -> &Map<String, Value> {
        &self.layout
    }

    /// The full template document, `layout` first.
    pub fn to_value(&self) -> Value {
        let mut document = Map::with_capacity(self.rest.len() + 1);
        document.insert("layout".to_string(), Value::Object(self.layout.clone()));
        document.extend(self.rest.clone());
        Value::Object(document)
    }

    /// The top-level layout keys, in document order.
    pub fn summary(&self) -> Vec<&str> {
        self.layout().keys().map(String::as_str).collect()
    }
}
