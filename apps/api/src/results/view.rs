//! Results view: turns a matching-service response into what the front end renders:
//! a summary panel, the score/CO2 chart series and one card per match.

use serde::Serialize;
use tracing::debug;

use crate::explanation::parser::SectionParser;
use crate::models::opportunity::{MatchResponse, MatchResult, MatchSummary};

/// One explanation subsection as displayed. `body` is empty when the heading
/// was not found in the explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub key: &'static str,
    pub title: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub average_score: String,
    pub median_score: String,
    pub best_score: String,
    pub average_co2_reduction: String,
    pub total_co2_reduction: String,
    pub number_of_matches: usize,
    /// true when the matching service sent no summary and it was computed here
    pub computed_locally: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub match_score: f64,
    pub annual_co2_reduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCard {
    pub name: String,
    pub match_score: String,
    pub project_type: String,
    pub location: String,
    pub description: String,
    pub sdgs: Vec<String>,
    pub environmental_impact: String,
    pub social_impact: String,
    pub annual_co2_reduction: String,
    pub total_co2_reduction: String,
    pub project_duration: String,
    pub co_benefits: Vec<String>,
    pub technology_used: String,
    pub short_summary: String,
    pub match_explanation: String,
    pub explanation_sections: Vec<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub summary: SummaryView,
    pub chart: Vec<ChartPoint>,
    pub matches: Vec<MatchCard>,
}

/// Splits an explanation into every expected section, in display order.
pub fn section_views(parser: &dyn SectionParser, explanation: &str) -> Vec<SectionView> {
    let parsed = parser.parse(explanation);
    if parsed.len() < parser.sections().len() {
        debug!(
            "Explanation parsed with {} of {} sections ({} parser)",
            parsed.len(),
            parser.sections().len(),
            parser.backend()
        );
    }

    parser
        .sections()
        .iter()
        .map(|section| SectionView {
            key: section.key,
            title: section.title,
            body: parsed.get(section.key).unwrap_or_default().to_string(),
        })
        .collect()
}

pub fn build_results_view(response: &MatchResponse, parser: &dyn SectionParser) -> ResultsView {
    let (summary, computed_locally) = match &response.summary {
        Some(summary) => (summary.clone(), false),
        None => (MatchSummary::from_matches(&response.matches), true),
    };

    ResultsView {
        summary: summary_view(&summary, computed_locally),
        chart: response
            .matches
            .iter()
            .map(|m| ChartPoint {
                name: m.opportunity.name.clone(),
                match_score: m.match_score,
                annual_co2_reduction: m.opportunity.annual_co2_reduction,
            })
            .collect(),
        matches: response
            .matches
            .iter()
            .map(|m| match_card(m, parser))
            .collect(),
    }
}

fn summary_view(summary: &MatchSummary, computed_locally: bool) -> SummaryView {
    SummaryView {
        average_score: format!("{:.2}", summary.average_score),
        median_score: format!("{:.2}", summary.median_score),
        best_score: format!("{:.2}", summary.best_score),
        average_co2_reduction: format!("{:.2} tons/year", summary.average_co2_reduction),
        total_co2_reduction: format!("{:.2} tons/year", summary.total_co2_reduction),
        number_of_matches: summary.number_of_matches,
        computed_locally,
    }
}

fn match_card(result: &MatchResult, parser: &dyn SectionParser) -> MatchCard {
    let opportunity = &result.opportunity;
    MatchCard {
        name: opportunity.name.clone(),
        match_score: format!("{:.2}", result.match_score),
        project_type: opportunity.project_type.clone(),
        location: opportunity.location.clone(),
        description: opportunity.description.clone(),
        sdgs: opportunity.sdgs.iter().map(|n| format!("SDG {n}")).collect(),
        environmental_impact: opportunity.environmental_impact.clone(),
        social_impact: opportunity.social_impact.clone(),
        annual_co2_reduction: format!("{} tons", opportunity.annual_co2_reduction),
        total_co2_reduction: format!("{} tons", opportunity.total_co2_reduction),
        project_duration: format!("{} years", opportunity.project_duration),
        co_benefits: opportunity.co_benefits.clone(),
        technology_used: opportunity.technology_used.clone(),
        short_summary: result.short_summary.clone(),
        match_explanation: result.match_explanation.clone(),
        explanation_sections: section_views(parser, &result.match_explanation),
    }
}
