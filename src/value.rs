use crate::error::{Result, TemplateError};
use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Data a template is rendered against.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Map(m) => !m.is_empty(),
        }
    }

    /// Key lookup; only maps have keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// The items a `for` loop visits: array elements (borrowed), map keys, or
    /// string characters.
    pub(crate) fn iter_items(&self) -> Option<Cow<'_, [Value]>> {
        match self {
            Value::Array(a) => Some(Cow::Borrowed(a.as_slice())),
            Value::Map(m) => Some(Cow::Owned(
                m.keys().cloned().map(Value::String).collect(),
            )),
            Value::String(s) => Some(Cow::Owned(
                s.chars().map(|c| Value::String(c.to_string())).collect(),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX and real floats
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => {
                Value::Map(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Top-level variables for a render pass.
///
/// A template never mutates the context it is given.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    vars: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Build a context from a JSON object; any other JSON value is rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        match Value::from(json.clone()) {
            Value::Map(vars) => Ok(Self { vars }),
            other => Err(TemplateError::InvalidContext(format!(
                "expected a JSON object, got {}",
                serde_json::to_string(&other)?
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(&parsed)
    }
}

impl From<IndexMap<String, Value>> for Context {
    fn from(vars: IndexMap<String, Value>) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A lookup layer: the caller's context, or one loop binding over a parent
/// scope. Lives only for the duration of a render.
#[derive(Clone, Copy)]
pub(crate) enum Scope<'a> {
    Root(&'a Context),
    Bound {
        name: &'a str,
        value: &'a Value,
        parent: &'a Scope<'a>,
    },
}

impl<'a> Scope<'a> {
    pub(crate) fn bind(&'a self, name: &'a str, value: &'a Value) -> Scope<'a> {
        Scope::Bound {
            name,
            value,
            parent: self,
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        match *self {
            Scope::Root(ctx) => ctx.get(key),
            Scope::Bound { name, value, .. } if name == key => Some(value),
            Scope::Bound { parent, .. } => parent.lookup(key),
        }
    }

    /// Resolve a dotted path such as `values.name`.
    ///
    /// Fails on the first segment that is missing or null.
    pub(crate) fn resolve(&self, path: &str) -> Result<&'a Value> {
        let mut segments = path.split('.');
        let missing = |segment: &str| TemplateError::Context {
            path: path.to_string(),
            segment: segment.to_string(),
        };

        // split always yields at least one segment
        let first = segments.next().unwrap_or_default();
        let mut current = self
            .lookup(first)
            .filter(|v| !matches!(v, Value::Null))
            .ok_or_else(|| missing(first))?;

        for segment in segments {
            current = current
                .get(segment)
                .filter(|v| !matches!(v, Value::Null))
                .ok_or_else(|| missing(segment))?;
        }

        Ok(current)
    }
}
