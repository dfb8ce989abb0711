use super::super::domain::NeedProfile;
use super::config::EstimateConfig;
use super::{EstimateLine, EstimateRule};

pub(crate) fn score_profile(
    profile: &NeedProfile,
    config: &EstimateConfig,
) -> (Vec<EstimateLine>, u32) {
    let mut lines = Vec::new();
    let mut total: u32 = 0;

    let mut apply = |rule: EstimateRule, amount: u32| {
        lines.push(EstimateLine {
            rule,
            label: format!("{}: ${}", rule.title(), amount),
            amount,
        });
        total = total.saturating_add(amount);
    };

    apply(EstimateRule::Base, config.base_amount);

    if profile.needs_financial {
        apply(
            EstimateRule::FinancialNeed,
            profile.financial_amount_requested.min(config.financial_cap),
        );
    }
    if profile.needs_shelter {
        apply(EstimateRule::Shelter, config.shelter_amount);
    }
    if profile.needs_food {
        apply(EstimateRule::Food, config.food_amount);
    }
    if profile.mental_health_concern {
        apply(EstimateRule::MentalHealth, config.mental_health_amount);
    }
    if profile.has_children_present {
        apply(EstimateRule::Children, config.children_amount);
    }
    if profile.unemployed {
        apply(EstimateRule::Unemployment, config.unemployment_amount);
    }

    (lines, total)
}
