use serde::Serialize;

/// Dollar amounts contributed by each scoring rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateConfig {
    pub base_amount: u32,
    pub financial_cap: u32,
    pub shelter_amount: u32,
    pub food_amount: u32,
    pub mental_health_amount: u32,
    pub children_amount: u32,
    pub unemployment_amount: u32,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            base_amount: 500,
            financial_cap: 3000,
            shelter_amount: 500,
            food_amount: 300,
            mental_health_amount: 400,
            children_amount: 500,
            unemployment_amount: 600,
        }
    }
}
