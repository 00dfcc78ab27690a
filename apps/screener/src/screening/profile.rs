//! LinkedIn profile export detection.
//!
//! Profile PDFs exported from LinkedIn share a recognizable section layout.
//! Detection is informational: it is reported on the match record and logged,
//! never fed into the score.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PROFILE_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"Contact\s+www\.linkedin\.com",
        r"Top\s+Skills",
        r"Languages",
        r"Certifications",
        r"Summary",
        r"Experience",
        r"Education",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_TOP_SKILLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Top\s+Skills\s+(.*?)(?:\n\n|\n[A-Z]|$)").unwrap());

static RE_EXPERIENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Experience\s+(.*?)(?:Education|Certifications|$)").unwrap());

static RE_SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Summary\s+(.*?)(?:Experience|Education|$)").unwrap());

const MIN_MARKERS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSections {
    pub summary: String,
    pub experience: String,
    pub skills: String,
}

/// True when at least three of the LinkedIn section markers appear in the raw
/// (un-normalized) text. Markers are case-sensitive.
pub fn is_linkedin_profile(raw: &str) -> bool {
    PROFILE_MARKERS.iter().filter(|re| re.is_match(raw)).count() >= MIN_MARKERS
}

/// Pulls the summary, experience and top-skills blocks out of a profile export.
/// Missing sections are empty strings.
pub fn linkedin_sections(raw: &str) -> ProfileSections {
    let capture = |re: &Regex| {
        re.captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    ProfileSections {
        summary: capture(&RE_SUMMARY),
        experience: capture(&RE_EXPERIENCE),
        skills: capture(&RE_TOP_SKILLS),
    }
}
