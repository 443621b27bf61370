use std::collections::BTreeMap;

use serde::Serialize;

/// One expected subsection of a match explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpec {
    pub key: &'static str,
    pub title: &'static str,
}

impl SectionSpec {
    /// The literal heading text, e.g. `a. Industry and Focus Area Alignment:`.
    pub fn heading(&self) -> String {
        format!("{}. {}:", self.key, self.title)
    }
}

/// The six subsections the matching service writes into every explanation, in order.
pub const EXPLANATION_SECTIONS: [SectionSpec; 6] = [
    SectionSpec {
        key: "a",
        title: "Industry and Focus Area Alignment",
    },
    SectionSpec {
        key: "b",
        title: "Emissions Reduction Impact",
    },
    SectionSpec {
        key: "c",
        title: "Project Type Compatibility",
    },
    SectionSpec {
        key: "d",
        title: "Environmental and Social Impact Relevance",
    },
    SectionSpec {
        key: "e",
        title: "Technology and Co-benefits Analysis",
    },
    SectionSpec {
        key: "f",
        title: "Overall Match Assessment",
    },
];

/// Section key → trimmed body text. Only keys from the section list given to
/// the parser can appear; a key is absent when its heading was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedSections(BTreeMap<&'static str, String>);

impl ParsedSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, section: &SectionSpec, body: &str) {
        self.0.insert(section.key, body.trim().to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}
