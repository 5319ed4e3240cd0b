use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// An optional field that keeps "absent" and "explicitly null" apart.
///
/// Record fields of this type are declared with `#[serde(default)]`, so a
/// missing key reads as [`Nullable::Absent`], and with
/// `#[serde(skip_serializing_if = "Nullable::is_absent")]` so that reserializing
/// a parsed record reproduces exactly the keys that were present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nullable<T> {
    Absent,
    Null,
    Present(T),
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Nullable<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Nullable::Absent)
    }

    /// Returns the value, treating absent and null alike.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Nullable::Present(value) => Some(value),
            Nullable::Absent | Nullable::Null => None,
        }
    }
}

impl<T: Serialize> Nullable<T> {
    /// Converts to a JSON value; absent and null both become `null`.
    pub fn to_value(&self) -> Value {
        self.as_option()
            .and_then(|value| serde_json::to_value(value).ok())
            .unwrap_or(Value::Null)
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Nullable::Present(value),
            None => Nullable::Null,
        }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Nullable::Present(value) => value.serialize(serializer),
            Nullable::Absent | Nullable::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Nullable::from)
    }
}
