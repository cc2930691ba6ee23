use ahash::AHashMap;
use std::fmt;

/// Branch type for keyed tree nodes.
pub type TreeMap = AHashMap<String, TreeValue>;

/// A node of the generic attribute tree held by the declarative layer.
///
/// Leaves are primitives; branches are ordered lists or unordered key-maps.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`, kept apart so they survive without rounding.
    UInt(u64),
    Float(f64),
    List(Vec<TreeValue>),
    Map(TreeMap),
}

impl TreeValue {
    /// Short name of the variant, used in type mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            TreeValue::Str(_) => "string",
            TreeValue::Bool(_) => "bool",
            TreeValue::Int(_) => "integer",
            TreeValue::UInt(_) => "unsigned integer",
            TreeValue::Float(_) => "float",
            TreeValue::List(_) => "list",
            TreeValue::Map(_) => "map",
        }
    }

    pub fn as_map(&self) -> Option<&TreeMap> {
        match self {
            TreeValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TreeValue]> {
        match self {
            TreeValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TreeValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key on a map node. Any other node yields `None`.
    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Converts an opaque JSON value into a tree node.
    ///
    /// JSON has a `null` the tree cannot hold, so `null` (and `null` entries
    /// nested inside objects) are dropped. Inside arrays a `null` would shift
    /// the positions of its siblings, so it is dropped there as well.
    pub fn from_json(value: &serde_json::Value) -> Option<TreeValue> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(TreeValue::Bool(*b)),
            serde_json::Value::Number(n) => Some(match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => TreeValue::Int(i),
                (None, Some(u)) => TreeValue::UInt(u),
                (None, None) => TreeValue::Float(n.as_f64().unwrap_or_default()),
            }),
            serde_json::Value::String(s) => Some(TreeValue::Str(s.clone())),
            serde_json::Value::Array(items) => Some(TreeValue::List(
                items.iter().filter_map(TreeValue::from_json).collect(),
            )),
            serde_json::Value::Object(fields) => Some(TreeValue::Map(
                fields
                    .iter()
                    .filter_map(|(k, v)| TreeValue::from_json(v).map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }

    /// Converts a tree node back into JSON. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TreeValue::Str(s) => serde_json::Value::String(s.clone()),
            TreeValue::Bool(b) => serde_json::Value::Bool(*b),
            TreeValue::Int(i) => serde_json::Value::from(*i),
            TreeValue::UInt(u) => serde_json::Value::from(*u),
            TreeValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            TreeValue::List(items) => {
                serde_json::Value::Array(items.iter().map(TreeValue::to_json).collect())
            }
            TreeValue::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<&str> for TreeValue {
    fn from(value: &str) -> Self {
        TreeValue::Str(value.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(value: String) -> Self {
        TreeValue::Str(value)
    }
}

impl From<bool> for TreeValue {
    fn from(value: bool) -> Self {
        TreeValue::Bool(value)
    }
}

impl From<i64> for TreeValue {
    fn from(value: i64) -> Self {
        TreeValue::Int(value)
    }
}

impl From<Vec<TreeValue>> for TreeValue {
    fn from(value: Vec<TreeValue>) -> Self {
        TreeValue::List(value)
    }
}

impl From<TreeMap> for TreeValue {
    fn from(value: TreeMap) -> Self {
        TreeValue::Map(value)
    }
}

impl fmt::Display for TreeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
