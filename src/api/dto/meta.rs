//! DTO for CV metadata updates.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::{CvDetail, CvPatch};

static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

/// Request body for `PUT /cv/api/{id}/meta`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMetaRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub template_slug: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must be #RRGGBB"))]
    pub primary_color: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub font_pair: Option<String>,
}

impl From<UpdateMetaRequest> for CvPatch {
    fn from(req: UpdateMetaRequest) -> Self {
        CvPatch {
            title: req.title,
            template_slug: req.template_slug,
            primary_color: req.primary_color,
            font_pair: req.font_pair,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub success: bool,
    pub cv: CvDetail,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_color_validation() {
        let ok: UpdateMetaRequest =
            serde_json::from_value(json!({ "primary_color": "#1A2b3C" })).unwrap();
        assert!(ok.validate().is_ok());

        for bad in ["red", "#12345", "#1234567", "123456"] {
            let req: UpdateMetaRequest =
                serde_json::from_value(json!({ "primary_color": bad })).unwrap();
            assert!(req.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_empty_request_is_valid() {
        let req: UpdateMetaRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.validate().is_ok());
        assert!(CvPatch::from(req).is_empty());
    }
}
