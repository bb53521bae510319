//! CV section entity. Content is opaque JSON owned by the editor.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Sections created without an explicit position go to the end.
pub const APPEND_ORDER: i32 = 999;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CvSection {
    pub id: Uuid,
    pub cv_id: Uuid,
    pub section_type: String,
    pub label: Option<String>,
    pub content: Value,
    pub display_order: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CvSection {
    /// Reads a string field from object content, ignoring other shapes.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.content.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub section_type: String,
    pub label: Option<String>,
    pub content: Value,
    pub display_order: i32,
}

/// Partial section update.
///
/// `label: Some(None)` clears the label; `None` leaves it as is.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub content: Option<Value>,
    pub label: Option<Option<String>>,
    pub is_visible: Option<bool>,
    pub display_order: Option<i32>,
}
