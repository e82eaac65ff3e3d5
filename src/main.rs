use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use rating_consolidator::app::{ConsolidationUseCase, SourceStatus};
use rating_consolidator::config::Config;
use rating_consolidator::constants;
use rating_consolidator::infra::{FsDocumentStore, XmlFileOutputAdapter};
use rating_consolidator::logging;
use rating_consolidator::pipeline::normalize::SourceFormat;

#[derive(Parser)]
#[command(name = "rating_consolidator")]
#[command(about = "Normalize rating feeds and consolidate them into one scored document")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every configured source, consolidate and write the output document
    Run {
        /// Config file (defaults to $RATING_CONSOLIDATOR_CONFIG or consolidator.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured output path
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Normalize a single document and print its records as JSON
    Normalize {
        /// Source format. Available: attribute_xml, element_xml, json, delimited
        #[arg(long)]
        format: SourceFormat,
        #[arg(long)]
        file: PathBuf,
        /// Config file supplying titles and anchors
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List supported source formats
    Formats,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(Config::locate);
    let config = Config::load(&path).with_context(|| format!("loading {}", path.display()))?;
    info!(
        "Loaded config from {} ({} groups, {} sources, {} titles)",
        path.display(),
        config.groups.len(),
        config.source_count(),
        config.titles.len()
    );
    Ok(config)
}

fn build_use_case(config: &Config, output: Option<PathBuf>) -> anyhow::Result<ConsolidationUseCase> {
    let titles = Arc::new(config.title_lookup()?);
    Ok(ConsolidationUseCase::new(
        titles,
        &config.anchors,
        Arc::new(FsDocumentStore::new()),
        Arc::new(XmlFileOutputAdapter::new(output)),
    ))
}

fn run(config_path: Option<PathBuf>, output_override: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let destination = output_override.or_else(|| config.output.clone());
    let use_case = build_use_case(&config, destination)?;

    let report = use_case.run(&config.groups);

    println!("\n📊 Consolidation results:");
    for source in &report.sources {
        match &source.status {
            SourceStatus::Used { records } => {
                println!("   ✅ {}/{} ({}): {} records", source.group, source.source_id, source.format, records)
            }
            SourceStatus::Incomplete => {
                println!("   ⚠️  {}/{} ({}): anchor missing, skipped", source.group, source.source_id, source.format)
            }
            SourceStatus::Failed(message) => {
                println!("   ❌ {}/{} ({}): {}", source.group, source.source_id, source.format, message)
            }
        }
    }
    println!("   Sources used: {}/{}", report.sources_used(), report.sources.len());
    println!("   Records consolidated: {}", report.records_consolidated());
    println!("   Entries: {}", report.consolidated.len());

    match (&report.output.written_to, &report.output.error) {
        (_, Some(message)) => {
            error!("Output failed: {}", message);
            return Err(anyhow!("{}", message));
        }
        (Some(path), None) => println!("   Output file: {}", path.display()),
        (None, None) => println!("   Output file: none configured"),
    }
    Ok(())
}

fn normalize(format: SourceFormat, file: PathBuf, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => load_config(Some(path))?,
        None => Config::default(),
    };
    let use_case = build_use_case(&config, None)?;

    let raw = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
    let outcome = use_case.normalize_text(format, &raw);

    let body = serde_json::json!({
        "format": format.as_str(),
        "complete": outcome.is_complete(),
        "error": outcome.error(),
        "records": outcome.records(),
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => run(config, output),
        Commands::Normalize { format, file, config } => normalize(format, file, config),
        Commands::Formats => {
            for format in constants::get_supported_formats() {
                println!("{}", format);
            }
            Ok(())
        }
    }
}
