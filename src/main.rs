use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use donor_lookup::config::Config;
use donor_lookup::export;
use donor_lookup::infra::OpenSecretsClient;
use donor_lookup::observability::init_logging;
use donor_lookup::parser::parse_donation_table;
use donor_lookup::pipeline::orchestrator::process_rows;
use donor_lookup::pipeline::processing::donors::{aggregate_donors, DonorProfiles};
use donor_lookup::pipeline::processing::{TableExtractor, VariantGrouper};
use donor_lookup::pipeline::{LookupPipeline, RunSummary};
use donor_lookup::roster::Roster;

#[derive(Parser)]
#[command(name = "donor-lookup")]
#[command(about = "Looks up campaign donations for a roster of names and profiles each donor")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to donor_lookup.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up every name in a roster and write the report and CSVs
    Lookup {
        /// JSON array of organizations with their members
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Extract and group donations from a saved results page
    Parse {
        #[arg(long)]
        html: PathBuf,
        /// The name that was queried, used to split contributor name from address
        #[arg(long)]
        name: String,
    },
    /// Rebuild donor profiles from a saved report
    Profiles {
        #[arg(long)]
        report: PathBuf,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = init_logging(Path::new("logs"));

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Lookup { input, output_dir } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            run_lookup(&config, &input).await?;
        }
        Commands::Parse { html, name } => {
            let page = std::fs::read_to_string(&html)
                .with_context(|| format!("reading results page {}", html.display()))?;
            let rows = parse_donation_table(&page, config.matching.contributor_format);
            let result = process_rows(
                &name,
                html.display().to_string(),
                200,
                &rows,
                &TableExtractor::new(config.matching.contributor_format),
                &VariantGrouper::new(config.matching.similarity_threshold),
            );
            println!("{}", serde_json::to_string_pretty(&result.variants)?);
        }
        Commands::Profiles { report, output_dir } => {
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            let results = export::load_results_json(&report)?;
            let profiles = aggregate_donors(&results);
            write_profiles(&config, &profiles)?;
            println!("✅ Rebuilt {} donor profiles from {}", profiles.len(), report.display());
        }
    }
    Ok(())
}

async fn run_lookup(config: &Config, input: &Path) -> Result<()> {
    let roster = Roster::load(input)?;
    if roster.is_empty() {
        println!("⚠️  No names found in {}", input.display());
        return Ok(());
    }

    let client = OpenSecretsClient::new(&config.lookup, config.matching.contributor_format)?;
    let pipeline = LookupPipeline::from_config(Arc::new(client), config);

    println!("🔄 Looking up {} names...", roster.len());
    let run = pipeline.run(roster.names()).await;

    let report_path = config.output.report_path();
    if let Err(e) = export::save_results_json(&run.results, &report_path) {
        error!("Failed to save results: {}", e);
        return Err(e.into());
    }
    write_profiles(config, &run.profiles)?;

    let summary = RunSummary::from_results(&run.results);
    info!(?summary, "Lookup run finished");
    println!("\n📊 {}", summary);
    println!("   Results saved to: {}", report_path.display());
    Ok(())
}

fn write_profiles(config: &Config, profiles: &DonorProfiles) -> Result<()> {
    export::export_donor_profiles_csv(profiles, &config.output.donors_csv_path())?;
    export::export_donations_csv(profiles, &config.output.donations_csv_path())?;
    println!("   Donor profiles: {}", config.output.donors_csv_path().display());
    println!("   Donations: {}", config.output.donations_csv_path().display());
    Ok(())
}
