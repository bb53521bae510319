//! ATS (Applicant Tracking System) friendliness scoring.
//!
//! The score is a deterministic heuristic over visible sections:
//!
//! | Area      | Points | Measures                                             |
//! |-----------|--------|------------------------------------------------------|
//! | sections  | 40     | personal + email, summary, experience, education, skills |
//! | content   | 25     | action verbs (15), bullet usage (10) in experience    |
//! | dates     | 15     | one consistent date format                            |
//! | template  | 20     | ATS-friendly template (20) vs. decorative (8)         |

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::entities::{Cv, CvSection};
use crate::domain::templates;

pub const MAX_SUGGESTIONS: usize = 5;

const PERSONAL_POINTS: u32 = 10;
const SUMMARY_POINTS: u32 = 5;
const EXPERIENCE_POINTS: u32 = 10;
const EDUCATION_POINTS: u32 = 10;
const SKILLS_POINTS: u32 = 5;
const ACTION_VERB_POINTS: u32 = 15;
const BULLET_POINTS: u32 = 10;
const DATE_POINTS: u32 = 15;
const ATS_TEMPLATE_POINTS: u32 = 20;
const OTHER_TEMPLATE_POINTS: u32 = 8;

const ACTION_VERBS: &[&str] = &[
    "accelerated", "achieved", "administered", "analyzed", "architected", "automated",
    "boosted", "built", "championed", "collaborated", "configured", "coordinated", "created",
    "cut", "debugged", "decreased", "defined", "delivered", "deployed", "designed", "developed",
    "directed", "drove", "eliminated", "enabled", "engineered", "established", "expanded",
    "facilitated", "founded", "generated", "grew", "guided", "implemented", "improved",
    "increased", "initiated", "integrated", "introduced", "launched", "led", "maintained",
    "managed", "mentored", "migrated", "modernized", "negotiated", "optimized", "orchestrated",
    "organized", "oversaw", "owned", "pioneered", "planned", "produced", "programmed",
    "published", "raised", "redesigned", "reduced", "refactored", "resolved", "restructured",
    "revamped", "saved", "scaled", "shipped", "simplified", "spearheaded", "standardized",
    "streamlined", "supervised", "tested", "trained", "transformed", "tripled", "wrote",
];

const DATE_KEYS: &[&str] = &["start_date", "end_date", "year", "date"];

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());
static YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap());
static MONTH_SLASH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0?[1-9]|1[0-2])/\d{4}$").unwrap());
static MONTH_NAME_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.? \d{4}$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DateFormat {
    Year,
    YearMonth,
    MonthSlashYear,
    MonthNameYear,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AreaScore {
    pub score: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AtsBreakdown {
    pub sections: AreaScore,
    pub content: AreaScore,
    pub dates: AreaScore,
    pub template: AreaScore,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AtsReport {
    pub score: u32,
    pub breakdown: AtsBreakdown,
    pub suggestions: Vec<String>,
}

/// A lost-points finding. Suggestions are ranked by `lost`.
struct Finding {
    lost: u32,
    tip: String,
}

#[derive(Default)]
struct Findings(Vec<Finding>);

impl Findings {
    fn lose(&mut self, lost: u32, tip: impl Into<String>) {
        if lost > 0 {
            self.0.push(Finding {
                lost,
                tip: tip.into(),
            });
        }
    }

    fn into_suggestions(mut self) -> Vec<String> {
        self.0.sort_by(|a, b| b.lost.cmp(&a.lost));
        self.0
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|f| f.tip)
            .collect()
    }
}

/// Scores a CV for ATS friendliness. Hidden sections are ignored.
pub fn calculate_ats_score(cv: &Cv, sections: &[CvSection]) -> AtsReport {
    let visible: Vec<&CvSection> = sections.iter().filter(|s| s.is_visible).collect();
    let mut findings = Findings::default();

    let breakdown = AtsBreakdown {
        sections: score_sections(&visible, &mut findings),
        content: score_content(&visible, &mut findings),
        dates: score_dates(&visible, &mut findings),
        template: score_template(&cv.template_slug, &mut findings),
    };

    let score = breakdown.sections.score
        + breakdown.content.score
        + breakdown.dates.score
        + breakdown.template.score;

    AtsReport {
        score: score.min(100),
        breakdown,
        suggestions: findings.into_suggestions(),
    }
}

/// Up to five actionable tips, most valuable first.
pub fn get_improvement_suggestions(cv: &Cv, sections: &[CvSection]) -> Vec<String> {
    calculate_ats_score(cv, sections).suggestions
}

fn of_type<'a>(sections: &'a [&'a CvSection], kind: &'a str) -> impl Iterator<Item = &'a CvSection> {
    sections
        .iter()
        .copied()
        .filter(move |s| s.section_type == kind)
}

fn has_text(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => items.iter().any(has_text),
        Value::Object(map) => map.values().any(has_text),
        Value::Number(_) | Value::Bool(_) => true,
        Value::Null => false,
    }
}

fn score_sections(sections: &[&CvSection], findings: &mut Findings) -> AreaScore {
    let mut score = 0;

    let personal: Vec<&CvSection> = of_type(sections, "personal").collect();
    let has_email = personal
        .iter()
        .any(|s| s.text("email").is_some_and(|e| !e.trim().is_empty()));
    if has_email {
        score += PERSONAL_POINTS;
    } else if personal.is_empty() {
        findings.lose(
            PERSONAL_POINTS,
            "Add a personal information section with your contact details",
        );
    } else {
        findings.lose(
            PERSONAL_POINTS,
            "Add an email address so recruiters can contact you",
        );
    }

    let checks = [
        (
            "summary",
            SUMMARY_POINTS,
            "Add a short professional summary at the top of your CV",
        ),
        (
            "experience",
            EXPERIENCE_POINTS,
            "Add your work experience, most recent role first",
        ),
        (
            "education",
            EDUCATION_POINTS,
            "Add an education section with your degrees or certifications",
        ),
        (
            "skills",
            SKILLS_POINTS,
            "List your key skills so keyword filters can match them",
        ),
    ];

    for (kind, points, tip) in checks {
        if of_type(sections, kind).any(|s| has_text(&s.content)) {
            score += points;
        } else {
            findings.lose(points, tip);
        }
    }

    AreaScore { score, max: 40 }
}

/// Splits an experience entry into individual lines, stripping bullet markers.
fn experience_lines(section: &CvSection) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(description) = section.text("description") {
        lines.extend(description.lines().map(str::to_string));
    }

    for key in ["highlights", "bullets", "achievements"] {
        if let Some(Value::Array(items)) = section.content.get(key) {
            lines.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
        }
    }

    lines
        .into_iter()
        .map(|l| {
            l.trim()
                .trim_start_matches(['-', '*', '•', '–', '·'])
                .trim()
                .to_string()
        })
        .filter(|l| !l.is_empty())
        .collect()
}

fn starts_with_action_verb(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .is_some_and(|w| ACTION_VERBS.contains(&w.as_str()))
}

fn ratio_points(points: u32, hits: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((points as f64) * (hits as f64) / (total as f64)).round() as u32
}

fn score_content(sections: &[&CvSection], findings: &mut Findings) -> AreaScore {
    let entries: Vec<Vec<String>> = of_type(sections, "experience")
        .map(experience_lines)
        .filter(|lines| !lines.is_empty())
        .collect();

    if entries.is_empty() {
        findings.lose(
            ACTION_VERB_POINTS + BULLET_POINTS,
            "Describe each role with bullet points that start with action verbs",
        );
        return AreaScore { score: 0, max: 25 };
    }

    let total_lines: usize = entries.iter().map(Vec::len).sum();
    let verb_lines = entries
        .iter()
        .flatten()
        .filter(|l| starts_with_action_verb(l))
        .count();
    let verb_score = ratio_points(ACTION_VERB_POINTS, verb_lines, total_lines);
    findings.lose(
        ACTION_VERB_POINTS - verb_score,
        "Start more bullet points with action verbs such as Led, Built or Improved",
    );

    let bulleted = entries.iter().filter(|lines| lines.len() >= 2).count();
    let bullet_score = ratio_points(BULLET_POINTS, bulleted, entries.len());
    findings.lose(
        BULLET_POINTS - bullet_score,
        "Break each role's description into at least two bullet points",
    );

    AreaScore {
        score: verb_score + bullet_score,
        max: 25,
    }
}

fn classify_date(value: &str) -> Option<DateFormat> {
    if YEAR.is_match(value) {
        Some(DateFormat::Year)
    } else if YEAR_MONTH.is_match(value) {
        Some(DateFormat::YearMonth)
    } else if MONTH_SLASH_YEAR.is_match(value) {
        Some(DateFormat::MonthSlashYear)
    } else if MONTH_NAME_YEAR.is_match(value) {
        Some(DateFormat::MonthNameYear)
    } else {
        None
    }
}

fn collect_dates<'a>(value: &'a Value, out: &mut Vec<(&'a str, &'a str)>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                match v {
                    Value::String(s) if DATE_KEYS.contains(&k.as_str()) && !s.trim().is_empty() => {
                        out.push((k.as_str(), s.trim()));
                    }
                    _ => collect_dates(v, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_dates(v, out)),
        _ => {}
    }
}

fn score_dates(sections: &[&CvSection], findings: &mut Findings) -> AreaScore {
    let mut dates = Vec::new();
    for section in sections {
        collect_dates(&section.content, &mut dates);
    }

    if dates.is_empty() {
        findings.lose(
            DATE_POINTS,
            "Add start and end dates to your experience and education entries",
        );
        return AreaScore { score: 0, max: 15 };
    }

    let mut counts: HashMap<DateFormat, usize> = HashMap::new();
    let mut considered = 0;

    for (key, value) in dates {
        if value.eq_ignore_ascii_case("present") {
            continue;
        }
        let format = classify_date(value);
        // A bare graduation year sits fine next to any other format.
        if key == "year" && format == Some(DateFormat::Year) {
            continue;
        }
        considered += 1;
        if let Some(f) = format {
            *counts.entry(f).or_default() += 1;
        }
    }

    let score = if considered == 0 {
        DATE_POINTS
    } else {
        let dominant = counts.values().copied().max().unwrap_or(0);
        ratio_points(DATE_POINTS, dominant, considered)
    };

    findings.lose(
        DATE_POINTS - score,
        "Use one date format throughout, for example 2021-03 or Mar 2021",
    );

    AreaScore { score, max: 15 }
}

fn score_template(slug: &str, findings: &mut Findings) -> AreaScore {
    let score = if templates::is_ats_friendly(slug) {
        ATS_TEMPLATE_POINTS
    } else {
        OTHER_TEMPLATE_POINTS
    };

    findings.lose(
        ATS_TEMPLATE_POINTS - score,
        "Switch to an ATS-friendly template such as ATS Clean or ATS Modern",
    );

    AreaScore { score, max: 20 }
}
