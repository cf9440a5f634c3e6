use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One language's complete translation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(Value);

impl Dictionary {
    pub fn new(tree: Value) -> Self {
        Self(tree)
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Walks a dotted key (`nav.home`) through nested objects. Numeric
    /// segments index into arrays.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(&self.0, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Dotted keys of every leaf (strings, numbers, booleans, arrays, null).
    pub fn leaf_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_leaf_keys(&self.0, String::new(), &mut keys);
        keys
    }
}

fn collect_leaf_keys(node: &Value, prefix: String, keys: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                collect_leaf_keys(child, key, keys);
            }
        }
        _ if !prefix.is_empty() => keys.push(prefix),
        _ => {}
    }
}

/// A value that counts as "present" for fallback purposes.
pub(crate) fn leaf_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
