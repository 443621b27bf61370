use serde::{Deserialize, Serialize};

/// A carbon-offset project as described by the matching service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonCreditOpportunity {
    pub id: i64,
    pub name: String,
    pub project_type: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub detailed_explanation: String,
    #[serde(default)]
    pub sdgs: Vec<u32>,
    pub environmental_impact: String,
    pub social_impact: String,
    /// tons CO2 per year
    pub annual_co2_reduction: f64,
    /// tons CO2 over the project lifetime
    pub total_co2_reduction: f64,
    /// years
    pub project_duration: f64,
    #[serde(default)]
    pub co_benefits: Vec<String>,
    #[serde(default)]
    pub technology_used: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub opportunity: CarbonCreditOpportunity,
    pub match_explanation: String,
    #[serde(default)]
    pub short_summary: String,
    /// 0.0 – 1.0
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub average_score: f64,
    pub median_score: f64,
    pub best_score: f64,
    pub average_co2_reduction: f64,
    pub total_co2_reduction: f64,
    pub number_of_matches: usize,
}

/// Body of `POST /api/v1/match_opportunities`. Matches arrive ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matches: Vec<MatchResult>,
    #[serde(default)]
    pub summary: Option<MatchSummary>,
}

impl MatchSummary {
    /// Summary statistics over a set of matches, used when the service omits them.
    pub fn from_matches(matches: &[MatchResult]) -> Self {
        if matches.is_empty() {
            return MatchSummary {
                average_score: 0.0,
                median_score: 0.0,
                best_score: 0.0,
                average_co2_reduction: 0.0,
                total_co2_reduction: 0.0,
                number_of_matches: 0,
            };
        }

        let count = matches.len() as f64;
        let mut scores: Vec<f64> = matches.iter().map(|m| m.match_score).collect();
        scores.sort_by(f64::total_cmp);

        let mid = scores.len() / 2;
        let median_score = if scores.len() % 2 == 0 {
            (scores[mid - 1] + scores[mid]) / 2.0
        } else {
            scores[mid]
        };

        let total_co2_reduction: f64 = matches
            .iter()
            .map(|m| m.opportunity.annual_co2_reduction)
            .sum();

        MatchSummary {
            average_score: scores.iter().sum::<f64>() / count,
            median_score,
            best_score: scores[scores.len() - 1],
            average_co2_reduction: total_co2_reduction / count,
            total_co2_reduction,
            number_of_matches: matches.len(),
        }
    }
}
