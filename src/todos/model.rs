//! # Todo Model
//!
//! The `Todo` record plus the payloads that create and patch it.
//!
//! Field defaults live here so every store applies them the same way:
//! a new todo starts incomplete, in the `General` category, at `Medium`
//! priority, with an empty description and no subtasks.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::errors::{TodoError, TodoResult};

/// Store-assigned todo identifier
pub type TodoId = i64;

/// A subtask is an arbitrary JSON object with no fixed schema
pub type Subtask = Map<String, Value>;

pub const DEFAULT_CATEGORY: &str = "General";

/// Todo priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| TodoError::BadRequest(format!("unknown priority '{}'", s)))
    }
}

/// A persisted todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub category: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub subtasks: Vec<Subtask>,
}

impl Todo {
    /// Materialize a create payload under a freshly assigned id
    pub fn new(id: TodoId, new: NewTodo) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            completed: false,
            category: new.category,
            priority: new.priority,
            due_date: new.due_date,
            subtasks: new.subtasks,
        }
    }
}

/// Payload accepted by `POST /todos/`
///
/// `completed` is not accepted here; new todos always start incomplete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default = "default_description")]
    pub description: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

fn default_description() -> Option<String> {
    Some(String::new())
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl NewTodo {
    /// Todo with only a title, every other field defaulted
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: default_description(),
            category: default_category(),
            priority: Priority::default(),
            due_date: None,
            subtasks: Vec::new(),
        }
    }

    /// Parse a request body, reporting a missing `title` distinctly
    pub fn from_json(body: &[u8]) -> TodoResult<Self> {
        let value = parse_object(body)?;
        match value.get("title") {
            None | Some(Value::Null) => return Err(TodoError::MissingField("title")),
            Some(_) => {}
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Partial update accepted by `PUT /todos/{id}/`
///
/// A field that is absent keeps its stored value. A field that is present
/// overwrites it, so `"due_date": null` clears the date while omitting
/// `due_date` leaves it alone. Non-nullable fields reject `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub subtasks: Option<Vec<Subtask>>,
}

/// Marks a key as present; only invoked by serde when the key exists
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TodoPatch {
    pub fn from_json(body: &[u8]) -> TodoResult<Self> {
        Ok(serde_json::from_value(parse_object(body)?)?)
    }

    /// Overwrite the fields this patch carries
    pub fn apply(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(category) = self.category {
            todo.category = category;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(subtasks) = self.subtasks {
            todo.subtasks = subtasks;
        }
    }
}

fn parse_object(body: &[u8]) -> TodoResult<Value> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(TodoError::BadRequest("expected a JSON object".to_string()));
    }
    Ok(value)
}
