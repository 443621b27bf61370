//! Section parsers: split a match explanation into its labeled subsections.
//!
//! Default: `OrderedSectionParser` (one pattern per section, assumes the fixed order).
//! Alternative: `PositionalSectionParser` (locates every heading, slices between offsets).
//!
//! `AppState` holds an `Arc<dyn SectionParser>`, chosen at startup via config.

use regex::Regex;

use crate::explanation::sections::{ParsedSections, SectionSpec};

/// Turns one explanation string into per-section bodies. Never fails: text
/// that matches nothing yields an empty `ParsedSections`.
pub trait SectionParser: Send + Sync {
    /// The sections this parser looks for, in display order.
    fn sections(&self) -> &[SectionSpec];

    fn parse(&self, explanation: &str) -> ParsedSections;

    /// "ordered" | "positional", surfaced in logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// OrderedSectionParser
// ────────────────────────────────────────────────────────────────────────────

/// Matches `<heading i>(.*?)(<heading i+1>|end of text)` for each section,
/// across line breaks, first occurrence only.
///
/// The end marker is always the next heading in the fixed section list, not
/// whichever heading follows in the text. When section i+1 is missing, the body
/// of section i runs to the end of the text, later headings included.
pub struct OrderedSectionParser {
    sections: Vec<SectionSpec>,
    patterns: Vec<Regex>,
}

impl OrderedSectionParser {
    pub fn new(sections: &[SectionSpec]) -> Result<Self, regex::Error> {
        let patterns = sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let start = regex::escape(&section.heading());
                let pattern = match sections.get(i + 1) {
                    Some(next) => {
                        let end = regex::escape(&next.heading());
                        format!("(?s){start}(.*?)(?:{end}|$)")
                    }
                    None => format!("(?s){start}(.*?)$"),
                };
                Regex::new(&pattern)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sections: sections.to_vec(),
            patterns,
        })
    }
}

impl SectionParser for OrderedSectionParser {
    fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    fn parse(&self, explanation: &str) -> ParsedSections {
        let mut parsed = ParsedSections::new();
        for (section, pattern) in self.sections.iter().zip(&self.patterns) {
            if let Some(body) = pattern.captures(explanation).and_then(|c| c.get(1)) {
                parsed.insert(section, body.as_str());
            }
        }
        parsed
    }

    fn backend(&self) -> &'static str {
        "ordered"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PositionalSectionParser
// ────────────────────────────────────────────────────────────────────────────

/// Single pass over the text collecting every heading occurrence with its
/// offset. Each section's body runs from the end of its first heading to the
/// start of the next heading occurrence (any section), or to the end of text.
pub struct PositionalSectionParser {
    sections: Vec<SectionSpec>,
    headings: Vec<String>,
    pattern: Regex,
}

impl PositionalSectionParser {
    pub fn new(sections: &[SectionSpec]) -> Result<Self, regex::Error> {
        let headings: Vec<String> = sections.iter().map(SectionSpec::heading).collect();
        let alternation = headings
            .iter()
            .map(|h| regex::escape(h))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation)?;

        Ok(Self {
            sections: sections.to_vec(),
            headings,
            pattern,
        })
    }
}

/// A heading found in the text: which section, and where it sits.
struct HeadingHit {
    section: usize,
    start: usize,
    end: usize,
}

impl SectionParser for PositionalSectionParser {
    fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    fn parse(&self, explanation: &str) -> ParsedSections {
        let hits: Vec<HeadingHit> = self
            .pattern
            .find_iter(explanation)
            .filter_map(|m| {
                self.headings
                    .iter()
                    .position(|h| h == m.as_str())
                    .map(|section| HeadingHit {
                        section,
                        start: m.start(),
                        end: m.end(),
                    })
            })
            .collect();

        let mut parsed = ParsedSections::new();
        for (i, hit) in hits.iter().enumerate() {
            let section = &self.sections[hit.section];
            if parsed.contains(section.key) {
                continue;
            }
            let body_end = hits.get(i + 1).map_or(explanation.len(), |next| next.start);
            parsed.insert(section, &explanation[hit.end..body_end]);
        }
        parsed
    }

    fn backend(&self) -> &'static str {
        "positional"
    }
}
