use crate::*;
use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque server-assigned identifier of a todo.
///
/// Backends hand out either integers or strings, both are kept in their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(i) => TodoId(i.to_string()),
            Raw::Str(s) => TodoId(s),
        })
    }
}

/// Todo record as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied part of a todo, the rest is assigned by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub is_public: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, is_public: bool) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }
        Ok(Self { title, is_public })
    }
}

/// Result of the insert mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertTodos {
    pub affected_rows: u64,
    #[serde(default)]
    pub returning: Vec<Todo>,
}
