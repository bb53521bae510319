//! Turns a CV and its sections into a standalone HTML document.
//!
//! Section content is arbitrary JSON, so rendering is generic: the `personal`
//! section becomes the page header, every other visible section becomes a
//! block of entries. Known keys (`title`, `company`, `start_date`, ...) are
//! lifted into an entry's heading line and everything else is shown as a
//! labelled field. All values are escaped by the template engine.

use askama::Template;
use serde_json::{Map, Value};

use crate::domain::entities::{Cv, CvSection};
use crate::domain::templates;
use crate::error::AppError;
use serde_json::json;

const PRIMARY_KEYS: &[&str] = &["title", "degree", "name", "position", "role"];
const SECONDARY_KEYS: &[&str] = &["company", "institution", "organization", "school", "issuer"];
const LOCATION_KEYS: &[&str] = &["location", "city"];
const PROSE_KEYS: &[&str] = &["description", "summary", "text"];
const LIST_KEYS: &[&str] = &["highlights", "bullets", "achievements", "items"];
const CONTACT_KEYS: &[&str] = &[
    "email", "phone", "location", "linkedin", "github", "portfolio", "website",
];

#[derive(Debug, Clone, Default)]
pub struct Field {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub primary: String,
    pub secondary: String,
    pub dates: String,
    pub location: String,
    pub paragraphs: Vec<String>,
    pub bullets: Vec<String>,
    pub fields: Vec<Field>,
}

impl Entry {
    fn is_empty(&self) -> bool {
        self.primary.is_empty()
            && self.secondary.is_empty()
            && self.dates.is_empty()
            && self.location.is_empty()
            && self.paragraphs.is_empty()
            && self.bullets.is_empty()
            && self.fields.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub heading: String,
    pub kind: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub struct Contact {
    pub value: String,
    /// Set for values that are safe to link (http(s) URLs and emails).
    pub href: String,
}

#[derive(Debug, Clone, Default)]
pub struct Header {
    pub name: String,
    pub headline: String,
    pub contacts: Vec<Contact>,
}

#[derive(Template)]
#[template(path = "cv/document.html")]
pub struct DocumentTemplate {
    pub title: String,
    pub template_slug: String,
    pub is_ats_friendly: bool,
    pub primary_color: String,
    pub heading_font: String,
    pub body_font: String,
    pub header: Header,
    pub blocks: Vec<Block>,
}

/// Renders the CV document as HTML.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the template fails to render.
pub fn render_document(cv: &Cv, sections: &[CvSection]) -> Result<String, AppError> {
    document(cv, sections).render().map_err(|e| {
        tracing::error!(cv_id = %cv.id, error = %e, "Failed to render CV document");
        AppError::internal("Failed to render CV", json!({ "cv_id": cv.id }))
    })
}

/// Builds the template model without rendering it.
pub fn document(cv: &Cv, sections: &[CvSection]) -> DocumentTemplate {
    let fonts = templates::font_pair_or_default(cv.font_pair.as_deref());

    let mut header = Header {
        name: cv.title.clone(),
        ..Header::default()
    };
    let mut blocks = Vec::new();

    for section in sections.iter().filter(|s| s.is_visible) {
        if section.section_type == "personal" {
            header = build_header(section, &cv.title);
            continue;
        }

        let entries = build_entries(&section.content);
        if entries.is_empty() {
            continue;
        }

        blocks.push(Block {
            heading: section
                .label
                .clone()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| humanize(&section.section_type)),
            kind: section.section_type.clone(),
            entries,
        });
    }

    DocumentTemplate {
        title: cv.title.clone(),
        template_slug: cv.template_slug.clone(),
        is_ats_friendly: templates::is_ats_friendly(&cv.template_slug),
        primary_color: cv
            .primary_color
            .clone()
            .unwrap_or_else(|| crate::domain::entities::cv::DEFAULT_PRIMARY_COLOR.to_string()),
        heading_font: fonts.heading.to_string(),
        body_font: fonts.body.to_string(),
        header,
        blocks,
    }
}

fn build_header(section: &CvSection, fallback_name: &str) -> Header {
    let text = |key: &str| section.text(key).map(str::trim).unwrap_or("").to_string();

    let name = text("name");
    let contacts = CONTACT_KEYS
        .iter()
        .filter_map(|key| {
            let value = text(key);
            if value.is_empty() {
                return None;
            }
            let href = if *key == "email" {
                format!("mailto:{value}")
            } else if value.starts_with("http://") || value.starts_with("https://") {
                value.clone()
            } else {
                String::new()
            };
            Some(Contact { value, href })
        })
        .collect();

    Header {
        name: if name.is_empty() {
            fallback_name.to_string()
        } else {
            name
        },
        headline: text("headline"),
        contacts,
    }
}

fn build_entries(content: &Value) -> Vec<Entry> {
    match content {
        Value::Object(map) => vec![entry_from_object(map)],
        Value::Array(items) if items.iter().all(Value::is_object) => items
            .iter()
            .filter_map(Value::as_object)
            .map(entry_from_object)
            .collect(),
        Value::Array(items) => vec![Entry {
            bullets: strings(items),
            ..Entry::default()
        }],
        Value::String(s) => {
            let (paragraphs, bullets) = prose(s);
            vec![Entry {
                paragraphs,
                bullets,
                ..Entry::default()
            }]
        }
        _ => Vec::new(),
    }
    .into_iter()
    .filter(|e| !e.is_empty())
    .collect()
}

/// First non-empty value among `keys`, with the key it came from.
fn pick<'a>(map: &Map<String, Value>, keys: &'a [&'a str]) -> Option<(&'a str, String)> {
    keys.iter()
        .find_map(|k| scalar(map.get(*k)).filter(|v| !v.is_empty()).map(|v| (*k, v)))
}

fn entry_from_object(map: &Map<String, Value>) -> Entry {
    let mut entry = Entry::default();
    let text = |key: &str| scalar(map.get(key)).unwrap_or_default();

    let primary = pick(map, PRIMARY_KEYS);
    let secondary = pick(map, SECONDARY_KEYS);
    let location = pick(map, LOCATION_KEYS);

    if let Some((_, v)) = &primary {
        entry.primary = v.clone();
    }
    if let Some((_, v)) = &secondary {
        entry.secondary = v.clone();
    }
    if let Some((_, v)) = &location {
        entry.location = v.clone();
    }

    let start = text("start_date");
    let end = text("end_date");
    entry.dates = match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} – {end}"),
        (false, true) => start,
        (true, false) => end,
        (true, true) => {
            let year = text("year");
            if year.is_empty() { text("date") } else { year }
        }
    };

    let consumed: Vec<&str> = [primary, secondary, location]
        .into_iter()
        .flatten()
        .map(|(k, _)| k)
        .chain(["start_date", "end_date", "year", "date", "id"])
        .collect();

    for (key, value) in map {
        if consumed.contains(&key.as_str()) {
            continue;
        }

        match value {
            Value::String(s) if PROSE_KEYS.contains(&key.as_str()) => {
                let (paragraphs, bullets) = prose(s);
                entry.paragraphs.extend(paragraphs);
                entry.bullets.extend(bullets);
            }
            Value::Array(items) if LIST_KEYS.contains(&key.as_str()) => {
                entry.bullets.extend(strings(items));
            }
            Value::Array(items) => {
                let joined = strings(items).join(", ");
                if !joined.is_empty() {
                    entry.fields.push(Field {
                        label: humanize(key),
                        value: joined,
                    });
                }
            }
            Value::Object(nested) => {
                for (k, v) in nested {
                    if let Some(v) = scalar(Some(v)).filter(|v| !v.is_empty()) {
                        entry.fields.push(Field {
                            label: humanize(k),
                            value: v,
                        });
                    }
                }
            }
            other => {
                if let Some(v) = scalar(Some(other)).filter(|v| !v.is_empty()) {
                    entry.fields.push(Field {
                        label: humanize(key),
                        value: v,
                    });
                }
            }
        }
    }

    entry
}

/// Splits free text into paragraphs and bullet lines.
///
/// Lines starting with a bullet marker, or any multi-line text, become bullets.
fn prose(text: &str) -> (Vec<String>, Vec<String>) {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let is_bullet = |l: &&str| l.starts_with(['-', '*', '•', '–']);
    if lines.len() > 1 || lines.iter().any(is_bullet) {
        let bullets = lines
            .iter()
            .map(|l| l.trim_start_matches(['-', '*', '•', '–']).trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        (Vec::new(), bullets)
    } else {
        (lines.into_iter().map(str::to_string).collect(), Vec::new())
    }
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        _ => None,
    }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| scalar(Some(v)))
        .filter(|s| !s.is_empty())
        .collect()
}

/// `start_date` -> `Start Date`
pub fn humanize(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
