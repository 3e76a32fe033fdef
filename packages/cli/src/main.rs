#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the pangolin incident density map.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gppg_analytics::classify;
use gppg_analytics_models::CategoryCounts;
use gppg_choropleth::session::load_boundaries;
use gppg_choropleth::{MapSession, SearchOutcome, export};
use gppg_incident_models::{IncidentCategory, TimeWindow};
use gppg_source::IncidentSource;
use gppg_source::config::MapConfig;
use gppg_source::file::FileSource;

#[derive(Parser)]
#[command(name = "gppg_map", about = "Pangolin incident density map")]
struct Cli {
    /// Configuration file (defaults to the built-in configuration)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Time window in months: 3, 6 or 12
    #[arg(long, global = true)]
    months: Option<u32>,
    /// Read incidents from a JSON export instead of the hosted backend
    #[arg(long, global = true)]
    incidents: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print window totals, per-municipality counts and the monthly trend
    Summary,
    /// List municipalities matching a search query
    Suggest {
        /// Search text
        query: String,
    },
    /// Resolve a search query and print the selected municipality
    Inspect {
        /// Search text (exact name or substring)
        query: String,
    },
    /// Export the styled map as `GeoJSON`
    Export {
        /// Output file. A `.geojsonseq` extension writes one feature per
        /// line. Prints to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = MapConfig::load(cli.config.as_deref())?;
    let window = match cli.months {
        Some(months) => TimeWindow::from_months(months)?,
        None => config.map.default_window,
    };

    let client = reqwest::Client::new();
    let boundaries = load_boundaries(&client, &config.boundaries).await?;
    let mut session = MapSession::from_config(boundaries, &config.map).with_time_window(window);

    if let Commands::Suggest { query } = &cli.command {
        session.set_search_query(query);
        if session.suggestions().shows_no_matches() {
            println!("No matches");
        }
        for name in session.suggestions().items() {
            println!("{name}");
        }
        return Ok(());
    }

    let source: Box<dyn IncidentSource> = match &cli.incidents {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(config.incident_source(client.clone())?),
    };
    session.refresh(source.as_ref()).await?;

    match cli.command {
        Commands::Summary => print_summary(&session),
        Commands::Suggest { .. } => {}
        Commands::Inspect { query } => match session.on_search_submit(&query) {
            SearchOutcome::Resolved { viewport, .. } => {
                let report = serde_json::json!({
                    "detail": session.selected_detail(),
                    "viewport": viewport,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            SearchOutcome::NoMatch => println!("No municipality matches '{query}'"),
        },
        Commands::Export { out } => match out {
            Some(path) if path.extension().is_some_and(|ext| ext == "geojsonseq") => {
                let writer = BufWriter::new(File::create(&path)?);
                let count = export::write_geojsonseq(&session, writer)?;
                log::info!("Wrote {count} features to {}", path.display());
            }
            Some(path) => {
                let mut writer = BufWriter::new(File::create(&path)?);
                serde_json::to_writer(&mut writer, &export::feature_collection(&session))?;
                writer.flush()?;
                log::info!("Wrote map to {}", path.display());
            }
            None => println!(
                "{}",
                serde_json::to_string_pretty(&export::feature_collection(&session))?
            ),
        },
    }

    Ok(())
}

fn print_summary(session: &MapSession) {
    let summary = session.summary();
    println!(
        "Showing {} records from last {} months",
        summary.record_count,
        summary.window.months()
    );
    print_counts("Total", &summary.totals);
    println!("Municipalities with data: {}", summary.regions_with_data);
    println!();

    let mut regions: Vec<_> = session.aggregates().values().collect();
    regions.sort_by(|a, b| {
        b.counts
            .total()
            .cmp(&a.counts.total())
            .then_with(|| a.region_name.cmp(&b.region_name))
    });

    println!("{:<28} {:>6}  TIER", "MUNICIPALITY", "TOTAL");
    println!("{}", "-".repeat(44));
    for region in &regions {
        let tier = classify(region.counts.total());
        let marker = if session.boundaries().lookup(&region.region_name).is_some() {
            ""
        } else {
            "  (no boundary)"
        };
        println!(
            "{:<28} {:>6}  {}{marker}",
            region.region_name,
            region.counts.total(),
            tier.label()
        );
    }

    println!();
    println!("{:<8} {:>6} {:>6} {:>6} {:>6}", "MONTH", "ALIVE", "DEAD", "TRADE", "POACH");
    for month in session.monthly_series() {
        println!(
            "{:<8} {:>6} {:>6} {:>6} {:>6}",
            month.period,
            month.counts.alive(),
            month.counts.dead(),
            month.counts.illegal_trade(),
            month.counts.poaching()
        );
    }
}

fn print_counts(label: &str, counts: &CategoryCounts) {
    let parts: Vec<String> = IncidentCategory::all()
        .iter()
        .map(|&category| format!("{} {}", category.label(), counts.get(category)))
        .collect();
    println!("{label}: {} ({})", counts.total(), parts.join(", "));
}
