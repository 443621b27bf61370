//! ESG profile form: the fixed set of fields the front end renders, and the
//! typed profile sent to the matching service.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Highest UN Sustainable Development Goal number.
pub const MAX_SDG: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
}

/// Describes one input of the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Text,
    }
}

const fn number(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Number,
    }
}

/// Form fields in display order. Names match the `ProfileForm` JSON keys.
pub const PROFILE_FIELDS: [FieldSpec; 11] = [
    text("company_name", "company name"),
    text("industry", "industry"),
    text("description", "description"),
    number("annual_emissions", "annual emissions"),
    number("carbon_reduction_goal", "carbon reduction goal"),
    text("preferred_project_types", "preferred project types"),
    text("preferred_locations", "preferred locations"),
    text("sdgs", "sdgs"),
    text("environmental_focus", "environmental focus"),
    text("social_focus", "social focus"),
    text("technology_interests", "technology interests"),
];

/// Raw form state as submitted. List-valued fields are comma-separated text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub company_name: String,
    pub industry: String,
    pub description: String,
    pub annual_emissions: f64,
    pub carbon_reduction_goal: f64,
    pub preferred_project_types: String,
    pub preferred_locations: String,
    pub sdgs: String,
    pub environmental_focus: String,
    pub social_focus: String,
    pub technology_interests: String,
}

/// The profile in the shape the matching service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgProfile {
    pub company_name: String,
    pub industry: String,
    pub description: String,
    pub annual_emissions: f64,
    /// percentage, 0 – 100
    pub carbon_reduction_goal: f64,
    pub preferred_project_types: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub sdgs: Vec<u8>,
    pub environmental_focus: String,
    pub social_focus: String,
    pub technology_interests: Vec<String>,
}

impl ProfileForm {
    /// Validates the form and converts it into an `EsgProfile`.
    pub fn into_profile(self) -> Result<EsgProfile, AppError> {
        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            return Err(AppError::Validation(
                "company_name cannot be empty".to_string(),
            ));
        }

        let annual_emissions = non_negative("annual_emissions", self.annual_emissions)?;
        let carbon_reduction_goal =
            non_negative("carbon_reduction_goal", self.carbon_reduction_goal)?;
        if carbon_reduction_goal > 100.0 {
            return Err(AppError::Validation(
                "carbon_reduction_goal must be a percentage between 0 and 100".to_string(),
            ));
        }

        Ok(EsgProfile {
            company_name,
            industry: self.industry.trim().to_string(),
            description: self.description.trim().to_string(),
            annual_emissions,
            carbon_reduction_goal,
            preferred_project_types: split_list(&self.preferred_project_types),
            preferred_locations: split_list(&self.preferred_locations),
            sdgs: parse_sdgs(&self.sdgs)?,
            environmental_focus: self.environmental_focus.trim().to_string(),
            social_focus: self.social_focus.trim().to_string(),
            technology_interests: split_list(&self.technology_interests),
        })
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(value)
}

/// Splits comma-separated input, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_sdgs(raw: &str) -> Result<Vec<u8>, AppError> {
    split_list(raw)
        .iter()
        .map(|entry| match entry.parse::<u8>() {
            Ok(n) if (1..=MAX_SDG).contains(&n) => Ok(n),
            _ => Err(AppError::Validation(format!(
                "sdgs entry '{entry}' is not an SDG number between 1 and {MAX_SDG}"
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            company_name: "  Acme Renewables ".to_string(),
            industry: "Energy".to_string(),
            description: "Utility-scale wind operator".to_string(),
            annual_emissions: 50_000.0,
            carbon_reduction_goal: 30.0,
            preferred_project_types: "Reforestation, Solar ,, Wind".to_string(),
            preferred_locations: "Brazil, Kenya".to_string(),
            sdgs: "7, 13,15".to_string(),
            environmental_focus: "Biodiversity".to_string(),
            social_focus: "Community jobs".to_string(),
            technology_interests: "".to_string(),
        }
    }

    #[test]
    fn test_into_profile_splits_lists_and_trims() {
        let profile = form().into_profile().unwrap();
        assert_eq!(profile.company_name, "Acme Renewables");
        assert_eq!(
            profile.preferred_project_types,
            vec!["Reforestation", "Solar", "Wind"]
        );
        assert_eq!(profile.preferred_locations, vec!["Brazil", "Kenya"]);
        assert_eq!(profile.sdgs, vec![7, 13, 15]);
        assert!(profile.technology_interests.is_empty());
    }

    #[test]
    fn test_empty_company_name_rejected() {
        let mut f = form();
        f.company_name = "   ".to_string();
        assert!(matches!(f.into_profile(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_emissions_rejected() {
        let mut f = form();
        f.annual_emissions = -1.0;
        assert!(matches!(f.into_profile(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_finite_emissions_rejected() {
        let mut f = form();
        f.annual_emissions = f64::NAN;
        assert!(matches!(f.into_profile(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_goal_above_hundred_percent_rejected() {
        let mut f = form();
        f.carbon_reduction_goal = 120.0;
        assert!(matches!(f.into_profile(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_sdg_rejected() {
        let mut f = form();
        f.sdgs = "7, 18".to_string();
        match f.into_profile() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("'18'")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_sdg_rejected() {
        let mut f = form();
        f.sdgs = "climate".to_string();
        assert!(matches!(f.into_profile(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_field_list_matches_form_keys() {
        let json = serde_json::to_value(ProfileForm::default()).unwrap();
        let mut form_keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        let mut field_names: Vec<_> = PROFILE_FIELDS.iter().map(|f| f.name.to_string()).collect();
        form_keys.sort();
        field_names.sort();
        assert_eq!(form_keys, field_names);
    }

    #[test]
    fn test_labels_are_names_without_underscores() {
        for field in PROFILE_FIELDS {
            assert_eq!(field.label, field.name.replace('_', " "));
        }
    }

    #[test]
    fn test_numeric_fields_marked_as_numbers() {
        let numeric: Vec<_> = PROFILE_FIELDS
            .iter()
            .filter(|f| f.kind == FieldKind::Number)
            .map(|f| f.name)
            .collect();
        assert_eq!(numeric, vec!["annual_emissions", "carbon_reduction_goal"]);
    }

    #[test]
    fn test_form_deserializes_with_missing_fields() {
        let f: ProfileForm =
            serde_json::from_str(r#"{"company_name": "Acme", "annual_emissions": 10}"#).unwrap();
        assert_eq!(f.company_name, "Acme");
        assert_eq!(f.annual_emissions, 10.0);
        assert!(f.sdgs.is_empty());
    }
}
