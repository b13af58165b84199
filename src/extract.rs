//! Section extraction for free-text model responses.
//!
//! The model is asked for five labelled sections but nothing guarantees it
//! complies, so extraction is best-effort: each section's body runs from its
//! marker to the next marker found (in text order) or the end of the text.
//! A section without a marker comes back empty and is reported as missing.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{PlanRecord, Section};

struct SectionPattern {
    section: Section,
    /// Marker at the start of a line, optionally numbered, bulleted or bolded.
    heading: Regex,
    /// Marker anywhere in a line, but only when followed by a colon.
    inline: Regex,
}

fn label_pattern(section: Section) -> &'static str {
    match section {
        Section::BusinessGoals => r"business[ \t]+goals?",
        Section::Challenges => r"challenges?",
        Section::TargetAudience => r"target[ \t]+audiences?",
        Section::RevenueStreams => r"revenue[ \t]+streams?",
        Section::ProfitRange => r"profit[ \t]+ranges?",
    }
}

static PATTERNS: Lazy<Vec<SectionPattern>> = Lazy::new(|| {
    Section::ALL
        .iter()
        .map(|&section| {
            let label = label_pattern(section);
            let heading = format!(
                r"(?im)^[ \t>]*(?:#{{1,6}}[ \t]*)?(?:\*\*|__)?[ \t]*(?:(?:\d+[.)]|[-*+])[ \t]+)?(?:\*\*|__)?[ \t]*{label}(?:[ \t]*:[ \t]*(?:\*\*|__)?|[ \t]*(?:\*\*|__)[ \t]*:?|[ \t\r]*$)"
            );
            let inline = format!(r"(?i)(?:\*\*|__)?\b{label}(?:[ \t]*(?:\*\*|__))?[ \t]*:(?:\*\*|__)?");
            SectionPattern {
                section,
                heading: Regex::new(&heading).expect("heading marker regex should compile"),
                inline: Regex::new(&inline).expect("inline marker regex should compile"),
            }
        })
        .collect()
});

/// A plan extracted from model text plus the sections that had no marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPlan {
    pub record: PlanRecord,
    pub missing: Vec<Section>,
}

/// Extract the five plan sections from raw model output.
///
/// Never fails: sections without a marker become empty strings (`None` for
/// the profit range) and are listed in [`ExtractedPlan::missing`].
pub fn extract_plan(raw: &str) -> ExtractedPlan {
    let mut markers: Vec<(Section, usize, usize)> = PATTERNS
        .iter()
        .filter_map(|p| {
            p.heading
                .find(raw)
                .or_else(|| p.inline.find(raw))
                .map(|m| (p.section, m.start(), m.end()))
        })
        .collect();
    markers.sort_by_key(|&(_, start, _)| start);

    let mut bodies: HashMap<Section, String> = HashMap::with_capacity(markers.len());
    for (i, &(section, _, end)) in markers.iter().enumerate() {
        let stop = markers
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(raw.len());
        let body = if stop > end { &raw[end..stop] } else { "" };
        bodies.insert(section, clean_body(body));
    }

    let missing: Vec<Section> = Section::ALL
        .iter()
        .copied()
        .filter(|s| !bodies.contains_key(s))
        .collect();

    let mut take = |s: Section| bodies.remove(&s);
    let record = PlanRecord {
        business_goals: take(Section::BusinessGoals).unwrap_or_default(),
        challenges: take(Section::Challenges).unwrap_or_default(),
        target_audience: take(Section::TargetAudience).unwrap_or_default(),
        revenue_streams: take(Section::RevenueStreams).unwrap_or_default(),
        profit_range: take(Section::ProfitRange),
    };

    ExtractedPlan { record, missing }
}

/// Trim surrounding whitespace and one leading colon.
fn clean_body(body: &str) -> String {
    let trimmed = body.trim();
    trimmed
        .strip_prefix(':')
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
