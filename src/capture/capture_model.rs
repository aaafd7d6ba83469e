use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A listed form element as read at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Raw `type` property, e.g. "text", "Password", "select-one"
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub value: String,
}

impl Field {
    pub fn new(kind: &str, name: &str, value: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn field_kind(&self) -> FieldKind {
        FieldKind::parse(&self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Other,
}

impl FieldKind {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "password" => FieldKind::Password,
            _ => FieldKind::Other,
        }
    }

    /// Kinds that take part in capture at all.
    pub fn is_credential_bearing(self) -> bool {
        !matches!(self, FieldKind::Other)
    }
}

/// Ordered name → value capture of every credential-bearing field.
///
/// A repeated name replaces the earlier value but keeps the position of its
/// first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    entries: Vec<(String, String)>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((name.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldSnapshot {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut snapshot = FieldSnapshot::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

impl Serialize for FieldSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// What the sink receives for one submission.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CapturedCredential {
    #[serde(rename = "originURL")]
    pub origin_url: String,
    pub username: String,
    pub password: String,
    pub fields: FieldSnapshot,
}

impl fmt::Debug for CapturedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedCredential")
            .field("origin_url", &self.origin_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("fields", &self.fields.names().collect::<Vec<_>>())
            .finish()
    }
}
