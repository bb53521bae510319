//! CV entity and its creation/update inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use super::section::{CvSection, NewSection};

pub const DEFAULT_TEMPLATE: &str = "ats_clean";
pub const DEFAULT_PRIMARY_COLOR: &str = "#4285f4";

/// A resume owned by exactly one user. Soft-deleted CVs keep their rows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cv {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_slug: String,
    pub primary_color: Option<String>,
    pub font_pair: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cv {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// A CV together with its ordered sections, as returned by the meta API.
#[derive(Debug, Clone, Serialize)]
pub struct CvDetail {
    #[serde(flatten)]
    pub cv: Cv,
    pub sections: Vec<CvSection>,
}

/// Input for creating a CV. `sections` are inserted in the same transaction.
#[derive(Debug, Clone)]
pub struct NewCv {
    pub user_id: Uuid,
    pub title: String,
    pub template_slug: String,
    pub primary_color: Option<String>,
    pub font_pair: Option<String>,
    pub sections: Vec<NewSection>,
}

impl NewCv {
    /// A fresh CV with the default color and a pre-filled personal section.
    pub fn with_defaults(user_id: Uuid, email: &str, title: String, template_slug: String) -> Self {
        Self {
            user_id,
            title,
            template_slug,
            primary_color: Some(DEFAULT_PRIMARY_COLOR.to_string()),
            font_pair: None,
            sections: vec![default_personal_section(email)],
        }
    }
}

/// The personal-information section every new CV starts with.
pub fn default_personal_section(email: &str) -> NewSection {
    NewSection {
        section_type: "personal".to_string(),
        label: Some("Personal Information".to_string()),
        content: json!({
            "name": "",
            "email": email,
            "phone": "",
            "location": "",
            "linkedin": "",
            "github": "",
            "portfolio": "",
            "headline": "",
        }),
        display_order: 0,
    }
}

/// Partial update of CV metadata. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CvPatch {
    pub title: Option<String>,
    pub template_slug: Option<String>,
    pub primary_color: Option<String>,
    pub font_pair: Option<String>,
}

impl CvPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.template_slug.is_none()
            && self.primary_color.is_none()
            && self.font_pair.is_none()
    }
}
