use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Front matter key holding an explicit URL path for the page
pub const PERMALINK: &str = "permalink";
/// Front matter key naming the template to render the page through
pub const TEMPLATE: &str = "template";
/// Front matter key naming a registered build script
pub const BUILD_SCRIPT: &str = "buildScript";
/// Front matter key that makes a page eligible for collections
pub const PUBLISHED_DATE: &str = "published_date";

/// Metadata parsed from the block at the top of a content file.
///
/// Keys are strings. Scalar values are read back as strings with
/// [`FrontMatter::get_str`]; nested YAML values are kept as-is so templates can
/// still iterate over lists such as `tags`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    values: BTreeMap<String, Value>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML block body. An empty body is an empty mapping; anything
    /// that is not a `key: value` mapping is rejected.
    pub fn from_yaml(body: &str) -> Result<Self, String> {
        let value: Value = serde_yaml::from_str(body).map_err(|e| e.to_string())?;

        let mapping = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(format!(
                    "expected a key: value mapping, found {}",
                    describe(&other)
                ))
            }
        };

        let mut values = BTreeMap::new();
        for (key, value) in mapping {
            let key = scalar_to_string(&key)
                .ok_or_else(|| format!("unsupported front matter key: {:?}", key))?;
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Scalar value rendered as a string; `None` for absent, null or nested values
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(scalar_to_string)
    }

    /// Like [`FrontMatter::get_str`] but treats blank strings as absent
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_str(key).filter(|value| !value.trim().is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn permalink(&self) -> Option<String> {
        self.get_non_empty(PERMALINK)
    }

    pub fn template(&self) -> Option<String> {
        self.get_non_empty(TEMPLATE)
    }

    pub fn build_script(&self) -> Option<String> {
        self.get_non_empty(BUILD_SCRIPT)
    }

    pub fn published_date(&self) -> Option<String> {
        self.get_non_empty(PUBLISHED_DATE)
    }
}

impl<'a> IntoIterator for &'a FrontMatter {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
