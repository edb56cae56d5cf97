//! Flat field bundles read from a setup document

use std::collections::BTreeMap;
use std::fmt;

/// A single scalar field value as written by the operator
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    /// Convert a JSON value, returning `None` for arrays and objects
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Integer(i)),
                None => n.as_f64().map(Self::Float),
            },
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Text form of the value; `Null` renders as the empty string
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Field name to scalar value mapping for one loader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBundle {
    fields: BTreeMap<String, ScalarValue>,
}

impl RawBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overlay `overrides` on top of this bundle; override keys win
    pub fn merged_with(&self, overrides: &RawBundle) -> RawBundle {
        let mut fields = self.fields.clone();
        for (key, value) in &overrides.fields {
            fields.insert(key.clone(), value.clone());
        }
        RawBundle { fields }
    }

    /// Value rendered for progress output, or a placeholder when unset
    pub fn display_value(&self, key: &str) -> String {
        match self.get(key) {
            None | Some(ScalarValue::Null) => "(unset)".to_string(),
            Some(value) => value.as_text(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for RawBundle
where
    K: Into<String>,
    V: Into<ScalarValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = RawBundle::new();
        for (key, value) in iter {
            bundle.insert(key, value);
        }
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(
            ScalarValue::from_json(&json!(5439)),
            Some(ScalarValue::Integer(5439))
        );
        assert_eq!(
            ScalarValue::from_json(&json!(1.5)),
            Some(ScalarValue::Float(1.5))
        );
        assert_eq!(
            ScalarValue::from_json(&json!("Y")),
            Some(ScalarValue::Text("Y".to_string()))
        );
        assert_eq!(ScalarValue::from_json(&json!(null)), Some(ScalarValue::Null));
        assert_eq!(ScalarValue::from_json(&json!([1, 2])), None);
        assert_eq!(ScalarValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base: RawBundle = [("region", "us-east-1"), ("table", "base_table")]
            .into_iter()
            .collect();
        let loader: RawBundle = [("table", "events")].into_iter().collect();

        let merged = base.merged_with(&loader);
        assert_eq!(merged.get("table"), Some(&ScalarValue::from("events")));
        assert_eq!(merged.get("region"), Some(&ScalarValue::from("us-east-1")));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_display_value_placeholder() {
        let mut bundle = RawBundle::new();
        bundle.insert("table", ScalarValue::Null);
        assert_eq!(bundle.display_value("table"), "(unset)");
        assert_eq!(bundle.display_value("s3Prefix"), "(unset)");
    }
}
