//! Dashboard, CV creation and the editor page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::application::document::humanize;
use crate::domain::entities::{Cv, CvSection};
use crate::domain::templates::{self, CvTemplate, FONT_PAIRS, FontPair, TEMPLATES};
use crate::error::AppError;
use crate::state::AppState;
use crate::web::extractors::{MaybeUser, RequireUser};
use crate::web::flash::{Flash, IncomingFlashes};
use crate::web::page::{PageContext, PageError};

const PERSONAL_FIELDS: &[(&str, &str)] = &[
    ("name", "Full name"),
    ("headline", "Headline"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("location", "Location"),
    ("linkedin", "LinkedIn URL"),
    ("github", "GitHub URL"),
    ("portfolio", "Portfolio URL"),
];

const DEFAULT_SKILL_GROUPS: &[&str] = &["technical", "languages", "tools"];

pub struct CvCard {
    pub id: Uuid,
    pub title: String,
    pub template_name: String,
    pub is_ats_friendly: bool,
    pub updated: String,
}

impl From<&Cv> for CvCard {
    fn from(cv: &Cv) -> Self {
        let template = templates::find_template(&cv.template_slug);
        Self {
            id: cv.id,
            title: cv.title.clone(),
            template_name: template
                .map(|t| t.name.to_string())
                .unwrap_or_else(|| cv.template_slug.clone()),
            is_ats_friendly: template.is_some_and(|t| t.is_ats_friendly),
            updated: cv.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    ctx: PageContext,
    cvs: Vec<CvCard>,
    max_cvs: i64,
    can_create: bool,
    templates: &'static [CvTemplate],
}

/// # Endpoint
///
/// `GET /cv/dashboard`
///
/// Guests see an empty list with a prompt to log in.
pub async fn dashboard(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    flashes: IncomingFlashes,
) -> Result<Response, PageError> {
    let cvs = match &user {
        Some(user) => state.cv_service.list_for_user(user.id).await?,
        None => Vec::new(),
    };

    let max_cvs = state.cv_service.max_cvs_per_user();
    let template = DashboardTemplate {
        ctx: PageContext::new(user.as_ref(), flashes),
        can_create: user.is_some() && (cvs.len() as i64) < max_cvs,
        cvs: cvs.iter().map(CvCard::from).collect(),
        max_cvs,
        templates: TEMPLATES,
    };

    Ok(template.into_response())
}

#[derive(Debug, Deserialize)]
pub struct NewCvForm {
    #[serde(default)]
    pub title: String,
    pub template_slug: Option<String>,
}

/// # Endpoint
///
/// `POST /cv/new` (form: `title`, `template_slug`)
pub async fn create_cv(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<NewCvForm>,
) -> Result<Response, PageError> {
    match state
        .cv_service
        .create_cv(&user, &form.title, form.template_slug.as_deref())
        .await
    {
        Ok(cv) => Ok((
            Flash::new().success(format!("CV '{}' created successfully!", cv.title)),
            Redirect::to(&format!("/cv/{}/edit", cv.id)),
        )
            .into_response()),
        Err(e @ (AppError::Validation { .. } | AppError::Conflict { .. })) => Ok((
            Flash::new().error(e.message()),
            Redirect::to("/cv/dashboard"),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

pub struct KeyValueView {
    pub key: String,
    pub label: String,
    pub value: String,
}

pub struct ExperienceView {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
}

pub struct EducationView {
    pub id: Uuid,
    pub degree: String,
    pub field: String,
    pub institution: String,
    pub year: String,
    pub gpa: String,
}

/// Sections the editor has no form for; edited as raw JSON.
pub struct RawSectionView {
    pub id: Uuid,
    pub heading: String,
    pub json: String,
    pub is_visible: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "editor.html")]
struct EditorTemplate {
    ctx: PageContext,
    cv_id: Uuid,
    title: String,
    template_slug: String,
    primary_color: String,
    font_pair: String,
    personal: Vec<FieldView>,
    summary: String,
    skills: Vec<KeyValueView>,
    experience: Vec<ExperienceView>,
    education: Vec<EducationView>,
    other_sections: Vec<RawSectionView>,
    templates: &'static [CvTemplate],
    font_pairs: &'static [FontPair],
    pdf_available: bool,
}

fn text(content: &Value, key: &str) -> String {
    match content.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn editor_template(
    ctx: PageContext,
    cv: &Cv,
    sections: &[CvSection],
    pdf_available: bool,
) -> EditorTemplate {
    let personal_content = sections
        .iter()
        .find(|s| s.section_type == "personal")
        .map(|s| s.content.clone())
        .unwrap_or(Value::Null);

    let summary = sections
        .iter()
        .find(|s| s.section_type == "summary")
        .map(|s| match &s.content {
            Value::String(text) => text.clone(),
            other => text(other, "text"),
        })
        .unwrap_or_default();

    let mut skills: Vec<KeyValueView> = sections
        .iter()
        .find(|s| s.section_type == "skills")
        .and_then(|s| s.content.as_object())
        .map(|map| {
            map.iter()
                .map(|(key, value)| KeyValueView {
                    key: key.clone(),
                    label: humanize(key),
                    value: match value {
                        Value::String(s) => s.clone(),
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join(", "),
                        other => other.to_string(),
                    },
                })
                .collect()
        })
        .unwrap_or_default();
    if skills.is_empty() {
        skills = DEFAULT_SKILL_GROUPS
            .iter()
            .map(|key| KeyValueView {
                key: key.to_string(),
                label: humanize(key),
                value: String::new(),
            })
            .collect();
    }

    let experience = sections
        .iter()
        .filter(|s| s.section_type == "experience")
        .map(|s| ExperienceView {
            id: s.id,
            title: text(&s.content, "title"),
            company: text(&s.content, "company"),
            start_date: text(&s.content, "start_date"),
            end_date: text(&s.content, "end_date"),
            location: text(&s.content, "location"),
            description: text(&s.content, "description"),
        })
        .collect();

    let education = sections
        .iter()
        .filter(|s| s.section_type == "education")
        .map(|s| EducationView {
            id: s.id,
            degree: text(&s.content, "degree"),
            field: text(&s.content, "field"),
            institution: text(&s.content, "institution"),
            year: text(&s.content, "year"),
            gpa: text(&s.content, "gpa"),
        })
        .collect();

    let other_sections = sections
        .iter()
        .filter(|s| {
            !matches!(
                s.section_type.as_str(),
                "personal" | "summary" | "skills" | "experience" | "education"
            )
        })
        .map(|s| RawSectionView {
            id: s.id,
            heading: s.label.clone().unwrap_or_else(|| humanize(&s.section_type)),
            json: serde_json::to_string_pretty(&s.content).unwrap_or_default(),
            is_visible: s.is_visible,
        })
        .collect();

    EditorTemplate {
        ctx,
        cv_id: cv.id,
        title: cv.title.clone(),
        template_slug: cv.template_slug.clone(),
        primary_color: cv
            .primary_color
            .clone()
            .unwrap_or_else(|| crate::domain::entities::cv::DEFAULT_PRIMARY_COLOR.to_string()),
        font_pair: templates::font_pair_or_default(cv.font_pair.as_deref())
            .slug
            .to_string(),
        personal: PERSONAL_FIELDS
            .iter()
            .map(|&(key, label)| FieldView {
                key,
                label,
                value: text(&personal_content, key),
            })
            .collect(),
        summary,
        skills,
        experience,
        education,
        other_sections,
        templates: TEMPLATES,
        font_pairs: FONT_PAIRS,
        pdf_available,
    }
}

/// # Endpoint
///
/// `GET /cv/{id}/edit`
///
/// Owner only (403 page otherwise); soft-deleted CVs give 404.
pub async fn edit_cv(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    flashes: IncomingFlashes,
    Path(cv_id): Path<Uuid>,
) -> Result<Response, PageError> {
    let cv = state.cv_service.get_owned(cv_id, user.id).await?;
    let detail = state.cv_service.detail(cv).await?;

    let template = editor_template(
        PageContext::new(Some(&user), flashes),
        &detail.cv,
        &detail.sections,
        state.export_service.pdf_available(),
    );

    Ok(template.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn section(kind: &str, content: Value) -> CvSection {
        CvSection {
            id: Uuid::new_v4(),
            cv_id: Uuid::nil(),
            section_type: kind.to_string(),
            label: None,
            content,
            display_order: 0,
            is_visible: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cv() -> Cv {
        Cv {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "My CV".to_string(),
            template_slug: "pro_bold".to_string(),
            primary_color: None,
            font_pair: None,
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_editor_view_model() {
        let sections = vec![
            section("personal", json!({ "name": "Ada", "email": "ada@example.com" })),
            section("summary", json!({ "text": "Engineer." })),
            section("experience", json!({ "title": "Dev", "company": "Acme", "start_date": "2020" })),
            section("certifications", json!({ "name": "CKA" })),
        ];

        let page = editor_template(PageContext::default(), &cv(), &sections, false);

        assert_eq!(page.personal[0].value, "Ada");
        assert_eq!(page.summary, "Engineer.");
        assert_eq!(page.skills.len(), DEFAULT_SKILL_GROUPS.len());
        assert_eq!(page.experience[0].company, "Acme");
        assert!(page.education.is_empty());
        assert_eq!(page.other_sections.len(), 1);
        assert_eq!(page.other_sections[0].heading, "Certifications");
        assert_eq!(page.primary_color, "#4285f4");
        assert_eq!(page.font_pair, "inter_georgia");
    }

    #[test]
    fn test_card_uses_catalog_name() {
        let card = CvCard::from(&cv());
        assert_eq!(card.template_name, "Professional Bold");
        assert!(!card.is_ats_friendly);
    }
}
