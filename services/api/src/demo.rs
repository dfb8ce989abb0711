use crate::infra::{demo_geocoder, intake_settings, load_catalog, parse_category};
use crate::routes::NATIONAL_HOTLINES;
use clap::Args;
use std::sync::Arc;
use support_intake::config::AppConfig;
use support_intake::error::AppError;
use support_intake::intake::{
    estimate, flatten, parse_financial_amount, Coordinate, EstimateResult, IntakeAssessment,
    IntakeService, IntakeSubmission, LocationStatus, MatchResult, NeedProfile,
    NominatimGeocoder, ResourceCategory, ResourceMatcher,
};

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct NeedFlags {
    /// Financial help is needed
    #[arg(long)]
    pub(crate) needs_financial: bool,
    /// Requested amount in USD (e.g. "1200" or "$1,200")
    #[arg(long, default_value = "")]
    pub(crate) amount: String,
    /// Shelter or housing is needed
    #[arg(long)]
    pub(crate) shelter: bool,
    /// Food support is needed
    #[arg(long)]
    pub(crate) food: bool,
    /// Mental health concerns
    #[arg(long)]
    pub(crate) mental_health: bool,
    /// Other health concerns
    #[arg(long)]
    pub(crate) physical_health: bool,
    /// Children are present
    #[arg(long)]
    pub(crate) children: bool,
    /// Currently unemployed
    #[arg(long)]
    pub(crate) unemployed: bool,
    /// Currently in school
    #[arg(long)]
    pub(crate) in_school: bool,
}

impl NeedFlags {
    pub(crate) fn into_profile(self) -> Result<NeedProfile, AppError> {
        let financial_amount_requested = parse_financial_amount(&self.amount)?;
        Ok(NeedProfile {
            needs_financial: self.needs_financial,
            financial_amount_requested,
            mental_health_concern: self.mental_health,
            physical_health_concern: self.physical_health,
            needs_shelter: self.shelter,
            needs_food: self.food,
            has_children_present: self.children,
            unemployed: self.unemployed,
            in_school: self.in_school,
            ..NeedProfile::default()
        })
    }
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    #[command(flatten)]
    pub(crate) needs: NeedFlags,
    /// Print the estimate as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ResourcesArgs {
    /// Latitude of the search origin
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lat: f64,
    /// Longitude of the search origin
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lon: f64,
    /// Category to search; repeat for several (defaults to every category)
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Vec<ResourceCategory>,
    /// Maximum distance in miles (defaults to the configured radius)
    #[arg(long)]
    pub(crate) radius: Option<f64>,
    /// Maximum results per category (defaults to the configured limit)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Free-text location for the sample submission
    #[arg(long, default_value = "Lower Manhattan")]
    pub(crate) location: String,
    /// Resolve the location with the configured online geocoder
    #[arg(long)]
    pub(crate) online: bool,
    #[command(flatten)]
    pub(crate) needs: NeedFlags,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let profile = args.needs.into_profile()?.normalized();
    let result = estimate(&profile);

    if args.json {
        println!("{}", estimate_json(&result)?);
    } else {
        render_estimate(&result);
    }

    Ok(())
}

pub(crate) fn run_resources(args: ResourcesArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = Arc::new(load_catalog(&config.catalog)?);
    let matcher = ResourceMatcher::new(catalog, config.matching.clone());

    let origin = Coordinate::new(args.lat, args.lon);
    if !origin.is_valid() {
        println!(
            "Unable to locate ({}, {}): coordinate out of range",
            args.lat, args.lon
        );
        return Ok(());
    }

    let categories = if args.category.is_empty() {
        ResourceCategory::ALL.to_vec()
    } else {
        args.category
    };
    let results = matcher.find_resources_with(
        origin,
        &categories,
        args.radius.unwrap_or(config.matching.max_radius_miles),
        args.limit.unwrap_or(config.matching.per_category_limit),
    )?;

    render_resources(&results);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        location,
        online,
        needs,
    } = args;

    let config = AppConfig::load()?;
    let catalog = Arc::new(load_catalog(&config.catalog)?);
    let settings = intake_settings(&config);

    let mut profile = needs.into_profile()?;
    if profile == NeedProfile::default() {
        profile = sample_profile();
    }
    let submission = IntakeSubmission { profile, location };

    println!("Support intake demo");
    println!("Location: {}", submission.location);

    let assessment = if online {
        let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
        IntakeService::new(catalog, geocoder, settings)
            .assess(submission)
            .await?
    } else {
        let geocoder = Arc::new(demo_geocoder());
        IntakeService::new(catalog, geocoder, settings)
            .assess(submission)
            .await?
    };

    render_assessment(&assessment);
    Ok(())
}

fn estimate_json(result: &EstimateResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn sample_profile() -> NeedProfile {
    NeedProfile {
        needs_financial: true,
        financial_amount_requested: 1200,
        financial_use_narrative: "First month of rent".to_string(),
        mental_health_concern: true,
        needs_shelter: true,
        has_children_present: true,
        ..NeedProfile::default()
    }
}

pub(crate) fn render_assessment(assessment: &IntakeAssessment) {
    render_estimate(&assessment.estimate);

    match &assessment.location {
        LocationStatus::Located { coordinate } => {
            println!(
                "\nLocated at ({:.4}, {:.4})",
                coordinate.latitude, coordinate.longitude
            );
            render_resources(&assessment.resources);
        }
        LocationStatus::Unresolved { reason } => {
            println!("\nLocation unresolved ({reason:?})");
        }
    }

    if !assessment.notices.is_empty() {
        println!("\nNotices");
        for notice in &assessment.notices {
            println!("- {}", notice.message());
        }
    }

    println!("\nNational hotlines");
    for hotline in NATIONAL_HOTLINES {
        println!(
            "- {}: {} ({})",
            hotline.name, hotline.contact, hotline.availability
        );
    }
}

fn render_estimate(result: &EstimateResult) {
    println!("\nEstimated emergency support");
    println!(
        "You may be eligible to receive up to ${} in financial support.",
        result.total_amount
    );
    for line in &result.explanation_trail {
        println!("- {}", line.label);
    }
}

fn render_resources(results: &[MatchResult]) {
    if flatten(results).is_empty() {
        println!("\nSuggested local resources: none found nearby");
        return;
    }

    println!("\nSuggested local resources");
    for group in results {
        for entry in &group.entries {
            let resource = &entry.resource;
            println!(
                "- {} - {} ({:.1} miles away)",
                resource.name,
                group.category.label(),
                entry.distance_miles
            );
            println!(
                "  {} | {} | {}",
                resource.address, resource.phone, resource.hours_text
            );
        }
    }
}
