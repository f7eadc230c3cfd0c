mod cli;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use farmops::config::Config;
use farmops::logic::{analyze, carbon_recommendations, CarbonLedger, RulesEngine};
use farmops::models::{CarbonActivity, CropProfile, TelemetrySample, TimeWindow};
use farmops::store::TelemetryStore;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check => run_check(cli.config),
        Commands::Crops => run_crops(cli.config),
        Commands::Report {
            telemetry,
            activities,
            crop,
            farm,
            as_of,
        } => {
            let config = Config::load(cli.config).context("Configuration error")?;
            run_report(
                &config,
                &telemetry,
                activities.as_deref(),
                crop,
                farm,
                as_of,
            )
        }
    }
}

fn run_check(config_path: Option<std::path::PathBuf>) -> Result<()> {
    if !Config::exists(config_path.as_ref()) {
        anyhow::bail!("No config file found. Create config/config.yaml first.");
    }

    let config = Config::load(config_path)?;
    println!("Config OK");
    println!("  Farm:         {}", config.farm.farm_id);
    println!("  Window:       {}h", config.evaluation.window_hours);
    println!(
        "  Target:       {:.1} t CO2e @ {:.2} {}",
        config.ledger.annual_target_tons, config.ledger.credit_price, config.ledger.currency
    );

    let registry = config.crop_registry()?;
    println!("  Crop catalog: {} profiles", registry.len());

    match registry.get(&config.farm.crop_id) {
        Ok(profile) => println!("  Crop:         {} ({})", profile.name, profile.crop_id),
        Err(e) => anyhow::bail!("farm.crop_id is not in the catalog: {}", e),
    }

    Ok(())
}

fn run_crops(config_path: Option<std::path::PathBuf>) -> Result<()> {
    let config = if Config::exists(config_path.as_ref()) {
        Config::load(config_path)?
    } else {
        Config::default()
    };
    let registry = config.crop_registry()?;
    println!("{}", serde_json::to_string_pretty(&registry.list())?);
    Ok(())
}

fn run_report(
    config: &Config,
    telemetry_path: &Path,
    activities_path: Option<&Path>,
    crop: Option<String>,
    farm: Option<String>,
    as_of: Option<NaiveDate>,
) -> Result<()> {
    let farm_id = farm.unwrap_or_else(|| config.farm.farm_id.clone());
    let crop_id = crop.unwrap_or_else(|| config.farm.crop_id.clone());

    let registry = config.crop_registry()?;
    let profile = registry.get(&crop_id)?;

    let (window_end, as_of_date) = match as_of {
        Some(date) => {
            let end = date
                .and_hms_opt(23, 59, 59)
                .map(|dt| dt.and_utc())
                .with_context(|| format!("Invalid date {}", date))?;
            (end, date)
        }
        None => {
            let now: DateTime<Utc> = Utc::now();
            (now, now.date_naive())
        }
    };
    let window = TimeWindow::trailing_hours(window_end, config.evaluation.window_hours)?;

    let samples: Vec<TelemetrySample> = read_json(telemetry_path)?;
    let mut store = TelemetryStore::new();
    let loaded = store.extend(samples);
    tracing::info!(loaded, path = %telemetry_path.display(), "Loaded telemetry");

    let mut ledger = CarbonLedger::new();
    if let Some(path) = activities_path {
        let activities: Vec<CarbonActivity> = read_json(path)?;
        for activity in activities {
            ledger.record(activity)?;
        }
        tracing::info!(count = ledger.activities().len(), "Loaded carbon activities");
    }

    let output = build_output(config, &store, &ledger, profile, &farm_id, &window, as_of_date)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Farm analysis and ledger summary as one JSON document. An analysis that
/// cannot be produced is reported under `report.error` without hiding the
/// ledger section.
fn build_output(
    config: &Config,
    store: &TelemetryStore,
    ledger: &CarbonLedger,
    profile: &CropProfile,
    farm_id: &str,
    window: &TimeWindow,
    as_of: NaiveDate,
) -> Result<Value> {
    let report = match analyze(store, &RulesEngine::new(), profile, farm_id, window) {
        Ok(report) => serde_json::to_value(&report)?,
        Err(e) => {
            tracing::warn!(farm_id, crop_id = %profile.crop_id, "Farm analysis unavailable: {}", e);
            json!({ "farmId": farm_id, "cropId": profile.crop_id, "error": e.to_string() })
        }
    };

    let period = config.ledger.reporting_period();
    let summary = ledger.summarize(farm_id, config.ledger.annual_target_tons, period.as_ref())?;
    let carbon_recs = carbon_recommendations(&summary, period.as_ref(), as_of);

    Ok(json!({
        "report": report,
        "carbon": {
            "summary": summary,
            "estimatedValue": summary.estimated_value(config.ledger.credit_price),
            "currency": config.ledger.currency,
            "recommendations": carbon_recs,
        },
    }))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
