mod config;
mod rules;

pub use config::EstimateConfig;

use super::domain::NeedProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless estimator applying the fixed additive rubric to a need profile.
///
/// Physical health, school enrollment and the police interaction answers are
/// collected but do not contribute to the amount.
#[derive(Debug, Clone, Default)]
pub struct SupportEstimator {
    config: EstimateConfig,
}

impl SupportEstimator {
    pub fn new(config: EstimateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimateConfig {
        &self.config
    }

    pub fn estimate(&self, profile: &NeedProfile) -> EstimateResult {
        let (explanation_trail, total_amount) = rules::score_profile(profile, &self.config);
        debug!(
            total_amount,
            applied_rules = explanation_trail.len(),
            "support estimate computed"
        );

        EstimateResult {
            total_amount,
            explanation_trail,
        }
    }
}

/// Estimates with the default rubric.
pub fn estimate(profile: &NeedProfile) -> EstimateResult {
    SupportEstimator::default().estimate(profile)
}

/// Scoring rules in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateRule {
    Base,
    FinancialNeed,
    Shelter,
    Food,
    MentalHealth,
    Children,
    Unemployment,
}

impl EstimateRule {
    pub fn title(&self) -> &'static str {
        match self {
            EstimateRule::Base => "Base emergency support",
            EstimateRule::FinancialNeed => "Requested financial assistance",
            EstimateRule::Shelter => "Temporary housing support",
            EstimateRule::Food => "Food assistance",
            EstimateRule::MentalHealth => "Mental health support",
            EstimateRule::Children => "Childcare support",
            EstimateRule::Unemployment => "Employment transition support",
        }
    }
}

/// One applied rule and its dollar contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateLine {
    pub rule: EstimateRule,
    pub label: String,
    pub amount: u32,
}

/// Estimated support amount with the trail of rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub total_amount: u32,
    pub explanation_trail: Vec<EstimateLine>,
}

impl EstimateResult {
    pub fn labels(&self) -> Vec<&str> {
        self.explanation_trail
            .iter()
            .map(|line| line.label.as_str())
            .collect()
    }
}
