//! Static catalog of CV templates and font pairings.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Ats,
    Professional,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Ats => "ats",
            TemplateCategory::Professional => "professional",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CvTemplate {
    pub slug: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub description: &'static str,
    pub is_ats_friendly: bool,
    pub sort_order: u8,
}

pub const TEMPLATES: &[CvTemplate] = &[
    CvTemplate {
        slug: "ats_clean",
        name: "ATS Clean",
        category: TemplateCategory::Ats,
        description: "Single-column, no graphics, standard headings",
        is_ats_friendly: true,
        sort_order: 1,
    },
    CvTemplate {
        slug: "ats_modern",
        name: "ATS Modern",
        category: TemplateCategory::Ats,
        description: "Single-column, subtle accent color, clean dividers",
        is_ats_friendly: true,
        sort_order: 2,
    },
    CvTemplate {
        slug: "ats_executive",
        name: "ATS Executive",
        category: TemplateCategory::Ats,
        description: "Classic two-column header, single-column body",
        is_ats_friendly: true,
        sort_order: 3,
    },
    CvTemplate {
        slug: "pro_elegant",
        name: "Professional Elegant",
        category: TemplateCategory::Professional,
        description: "Cream paper tone, refined typography, tasteful icons",
        is_ats_friendly: false,
        sort_order: 4,
    },
    CvTemplate {
        slug: "pro_creative",
        name: "Professional Creative",
        category: TemplateCategory::Professional,
        description: "Accent sidebar with skills bars, photo slot",
        is_ats_friendly: false,
        sort_order: 5,
    },
    CvTemplate {
        slug: "pro_bold",
        name: "Professional Bold",
        category: TemplateCategory::Professional,
        description: "High-contrast header, card-style entries",
        is_ats_friendly: false,
        sort_order: 6,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct FontPair {
    pub slug: &'static str,
    pub heading: &'static str,
    pub body: &'static str,
}

pub const DEFAULT_FONT_PAIR: &str = "inter_georgia";

pub const FONT_PAIRS: &[FontPair] = &[
    FontPair {
        slug: "inter_georgia",
        heading: "Inter",
        body: "Georgia",
    },
    FontPair {
        slug: "roboto_merriweather",
        heading: "Roboto",
        body: "Merriweather",
    },
    FontPair {
        slug: "lato_playfair",
        heading: "Playfair Display",
        body: "Lato",
    },
    FontPair {
        slug: "source_sans_pro",
        heading: "Source Sans Pro",
        body: "Source Sans Pro",
    },
];

pub fn find_template(slug: &str) -> Option<&'static CvTemplate> {
    TEMPLATES.iter().find(|t| t.slug == slug)
}

pub fn is_known_template(slug: &str) -> bool {
    find_template(slug).is_some()
}

/// Unknown slugs are treated as not ATS-friendly.
pub fn is_ats_friendly(slug: &str) -> bool {
    find_template(slug).is_some_and(|t| t.is_ats_friendly)
}

pub fn find_font_pair(slug: &str) -> Option<&'static FontPair> {
    FONT_PAIRS.iter().find(|f| f.slug == slug)
}

/// Resolves a stored font pair, falling back to the default for missing or stale values.
pub fn font_pair_or_default(slug: Option<&str>) -> &'static FontPair {
    slug.and_then(find_font_pair)
        .or_else(|| find_font_pair(DEFAULT_FONT_PAIR))
        .unwrap_or(&FONT_PAIRS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_sorted_and_unique() {
        let orders: Vec<u8> = TEMPLATES.iter().map(|t| t.sort_order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);

        for (i, t) in TEMPLATES.iter().enumerate() {
            assert!(TEMPLATES[i + 1..].iter().all(|o| o.slug != t.slug));
        }
    }

    #[test]
    fn test_ats_friendly_lookup() {
        assert!(is_ats_friendly("ats_clean"));
        assert!(is_ats_friendly("ats_executive"));
        assert!(!is_ats_friendly("pro_bold"));
        assert!(!is_ats_friendly("does_not_exist"));
    }

    #[test]
    fn test_font_pair_fallback() {
        assert_eq!(font_pair_or_default(Some("lato_playfair")).heading, "Playfair Display");
        assert_eq!(font_pair_or_default(Some("comic_sans")).slug, "inter_georgia");
        assert_eq!(font_pair_or_default(None).slug, "inter_georgia");
    }
}
