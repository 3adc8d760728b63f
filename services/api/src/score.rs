use clap::Args;
use gap_score::config::FetchConfig;
use gap_score::error::AppError;
use gap_score::scoring::{
    CarbonAdvice, Clock, ComplianceModel, CompositeWeights, FixedClock, HttpSiteFetcher,
    PageFetch, ReadinessEngine, ReadinessService, ScoreReport, ScoreRequest, ScoringConfig,
    SignalCatalog, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON request body in the same shape the HTTP endpoint accepts
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Saved HTML for the request's website; skips the live fetch
    #[arg(long)]
    pub(crate) html: Option<PathBuf>,
    /// Year used when the carbon figures omit a current year (defaults to this year)
    #[arg(long)]
    pub(crate) current_year: Option<i32>,
    /// Compliance model: penalty or ratio
    #[arg(long, default_value = "penalty", value_parser = parse_model)]
    pub(crate) model: ComplianceModel,
    /// Composite weighting: three_factor or two_factor
    #[arg(long, default_value = "three_factor", value_parser = parse_weights)]
    pub(crate) weights: CompositeWeights,
    /// Print the raw JSON report instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_model(raw: &str) -> Result<ComplianceModel, String> {
    ComplianceModel::from_name(raw).ok_or_else(|| format!("unknown compliance model '{raw}'"))
}

fn parse_weights(raw: &str) -> Result<CompositeWeights, String> {
    CompositeWeights::from_name(raw).ok_or_else(|| format!("unknown weighting '{raw}'"))
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        request,
        html,
        current_year,
        model,
        weights,
        json,
    } = args;

    let raw = std::fs::read_to_string(&request)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let request = ScoreRequest::from_value(&value);

    let engine = Arc::new(ReadinessEngine::new(
        Arc::new(SignalCatalog::standard()),
        ScoringConfig {
            compliance_model: model,
            weights,
            ..ScoringConfig::default()
        },
    ));
    let year = current_year.unwrap_or_else(|| SystemClock.current_year());

    let report = match html {
        Some(path) => {
            let page = PageFetch::fetched(std::fs::read_to_string(path)?);
            engine.score(&request, Some(&page), year)
        }
        None => {
            let fetcher = HttpSiteFetcher::new(&FetchConfig::default())?;
            let service =
                ReadinessService::new(engine, Arc::new(fetcher), Arc::new(FixedClock(year)));
            service.assess(&request).await
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&request, &report);
    }
    Ok(())
}

fn render_report(request: &ScoreRequest, report: &ScoreReport) {
    println!("Public-sector readiness (indicative)");
    match request.website.as_deref() {
        Some(site) => println!("Website: {site}"),
        None => println!("Website: not supplied"),
    }

    println!("\nOverall: {}% - {}", report.overall_pct, report.band_label);
    let subscore = &report.subscore;
    print!(
        "Compliance {}% | Perception {}%",
        subscore.compliance_pct, subscore.perception_pct
    );
    match subscore.carbon_pct {
        Some(carbon) => println!(" | Carbon {carbon}%"),
        None => println!(),
    }

    println!(
        "\nIssues: {} red, {} amber, {} green",
        report.rag.red, report.rag.amber, report.rag.green
    );
    for issue in &report.issues {
        println!("- [{}] {}", issue.severity.label(), issue.label);
    }

    if let Some(findings) = &report.website_findings {
        println!("\nWebsite signals");
        println!("- present: {}", join_or_none(&findings.present));
        println!("- missing: {}", join_or_none(&findings.missing));
    }

    match &report.carbon_advice {
        Some(CarbonAdvice::Data {
            target_year,
            annual_reduction_tco2e,
            annual_reduction_pct_of_current,
            ..
        }) => println!(
            "\nCarbon: cut ~{annual_reduction_tco2e} tCO2e/year ({annual_reduction_pct_of_current}% of current) to reach net zero by {target_year}"
        ),
        Some(CarbonAdvice::Indicative { message, .. }) => println!("\nCarbon: {message}"),
        None => {}
    }

    println!("\nNext steps");
    for bullet in &report.bullets {
        println!("- {bullet}");
    }
}

fn join_or_none(labels: &[&str]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}
