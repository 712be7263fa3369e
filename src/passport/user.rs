//! Plain user records exchanged with the `Users` collaborator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as a JSON object keyed by the caller's storage keys.
///
/// The registrar only reads and writes the keys named in
/// [`Fields`](super::fields::Fields); everything else the collaborator stores is
/// carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User(Map<String, Value>);

impl User {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value stored under `key`, if any.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Missing, `null`, `false`, zero and empty or whitespace-only strings count as blank.
    #[must_use]
    pub fn is_blank(&self, key: &str) -> bool {
        !self.is_truthy(key)
    }

    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.0.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(value)) => !value.trim().is_empty(),
            Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::Array(_) | Value::Object(_)) => true,
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Write `value` under `key` unless it is already stored. Returns whether the
    /// record changed.
    pub fn update(&mut self, key: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.0.get(key) == Some(&value) {
            return false;
        }
        self.0.insert(key.to_string(), value);
        true
    }

    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_object(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for User {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<User> for Value {
    fn from(user: User) -> Self {
        Value::Object(user.0)
    }
}

impl TryFrom<Value> for User {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}
