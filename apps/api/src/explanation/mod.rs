// Match explanation parsing.
// The matching service writes each explanation as six "<key>. <title>:" headed
// subsections; this module splits it back apart for display.

pub mod parser;
pub mod sections;

use std::str::FromStr;
use std::sync::Arc;

use crate::explanation::parser::{OrderedSectionParser, PositionalSectionParser, SectionParser};
use crate::explanation::sections::EXPLANATION_SECTIONS;

/// Which `SectionParser` backend to run. Selected via `EXPLANATION_PARSER`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserKind {
    #[default]
    Ordered,
    Positional,
}

impl FromStr for ParserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordered" => Ok(ParserKind::Ordered),
            "positional" => Ok(ParserKind::Positional),
            other => Err(format!(
                "unknown explanation parser '{other}' (expected 'ordered' or 'positional')"
            )),
        }
    }
}

/// Builds the parser for the fixed explanation sections.
pub fn build_parser(kind: ParserKind) -> Result<Arc<dyn SectionParser>, regex::Error> {
    let parser: Arc<dyn SectionParser> = match kind {
        ParserKind::Ordered => Arc::new(OrderedSectionParser::new(&EXPLANATION_SECTIONS)?),
        ParserKind::Positional => Arc::new(PositionalSectionParser::new(&EXPLANATION_SECTIONS)?),
    };
    Ok(parser)
}
