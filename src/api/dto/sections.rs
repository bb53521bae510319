//! DTOs for the section endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::entities::section::APPEND_ORDER;
use crate::domain::entities::{CvSection, NewSection, SectionPatch};

/// Request body for `POST /cv/api/{id}/sections`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSectionRequest {
    #[validate(length(min = 1, max = 50, message = "section_type is required (max 50 characters)"))]
    pub section_type: String,

    #[validate(length(max = 255))]
    pub label: Option<String>,

    /// Opaque editor content. Defaults to `{}`.
    #[serde(default = "empty_object")]
    pub content: Value,

    pub display_order: Option<i32>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl From<CreateSectionRequest> for NewSection {
    fn from(req: CreateSectionRequest) -> Self {
        NewSection {
            section_type: req.section_type.trim().to_string(),
            label: req.label,
            content: req.content,
            display_order: req.display_order.unwrap_or(APPEND_ORDER),
        }
    }
}

/// Request body for `PUT /cv/api/{id}/sections/{section_id}`.
///
/// # `label` semantics
///
/// - **Absent** → leave unchanged
/// - **`null`** → clear the label
/// - **String** → set
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSectionRequest {
    pub content: Option<Value>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[validate(length(max = 255))]
    pub label: Option<Option<String>>,

    pub is_visible: Option<bool>,

    pub display_order: Option<i32>,
}

impl From<UpdateSectionRequest> for SectionPatch {
    fn from(req: UpdateSectionRequest) -> Self {
        SectionPatch {
            content: req.content,
            label: req.label,
            is_visible: req.is_visible,
            display_order: req.display_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SectionListResponse {
    pub sections: Vec<CvSection>,
}

#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub success: bool,
    pub section: CvSection,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
