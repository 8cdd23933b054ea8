//! Todo entity model and schema.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use seed_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::entity::{FieldValue, Fields, Record, Schema};

/// A todo row from the `todos` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Todo {
    pub id: DbId,
    pub created_at: Timestamp,
    pub title: String,
}

impl Record for Todo {
    const TABLE: &'static str = "todos";
    const COLUMNS: &'static [&'static str] = &["id", "created_at", "title"];
}

/// Wire shape of a todo: `{ id?: integer, title: string }`.
///
/// `id` is assigned by the database when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TodoSchema {
    #[serde(default)]
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
}

impl TodoSchema {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }
}

impl Fields for TodoSchema {
    fn fields(&self) -> Vec<(&'static str, Option<FieldValue>)> {
        vec![
            ("id", self.id.map(FieldValue::from)),
            ("title", Some(FieldValue::from(self.title.as_str()))),
        ]
    }
}

impl From<Todo> for TodoSchema {
    fn from(todo: Todo) -> Self {
        Self {
            id: Some(todo.id),
            title: todo.title,
        }
    }
}

impl Schema for TodoSchema {
    type Record = Todo;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_id_is_not_inserted() {
        let schema = TodoSchema::new("buy milk");
        assert_eq!(
            schema.present_fields(),
            vec![("title", FieldValue::Text("buy milk".into()))]
        );
    }

    #[test]
    fn explicit_id_is_inserted() {
        let schema = TodoSchema {
            id: Some(5),
            title: "x".into(),
        };
        assert_eq!(schema.present_fields().len(), 2);
    }

    #[test]
    fn title_length_is_validated() {
        assert!(TodoSchema::new("").validate().is_err());
        assert!(TodoSchema::new("a".repeat(256)).validate().is_err());
        assert!(TodoSchema::new("a".repeat(255)).validate().is_ok());
    }

    #[test]
    fn deserializes_without_id() {
        let schema: TodoSchema = serde_json::from_str(r#"{"title":"buy milk"}"#).unwrap();
        assert_eq!(schema, TodoSchema::new("buy milk"));
    }

    #[test]
    fn record_converts_to_schema() {
        let todo = Todo {
            id: 9,
            created_at: chrono::Utc::now(),
            title: "walk dog".into(),
        };
        assert_eq!(
            TodoSchema::from(todo),
            TodoSchema {
                id: Some(9),
                title: "walk dog".into(),
            }
        );
    }
}
