use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{
    self,
    filter::{EnvFilter, LevelFilter},
};

use promrule_extract::{
    config::{ExtractConfig, FilterOptions, SourceConfig},
    extract::Extractor,
    output::DirectoryWriter,
    source::{ClusterSource, ManifestSource, RuleSource},
};

/// Extract PrometheusRule resources into one rule file per namespace
#[derive(Parser, Debug)]
#[command(name = "promrule-extract")]
#[command(about = "Extract PrometheusRule resources into per-namespace rule files")]
#[command(version)]
struct Args {
    /// Exclude alert rules from PrometheusRule resources
    #[arg(long = "exclude-alert-rules")]
    exclude_alert_rules: bool,

    /// Exclude recording rules from PrometheusRule resources
    #[arg(long = "exclude-recording-rules")]
    exclude_recording_rules: bool,

    /// Directory to save extracted rules
    #[arg(
        long = "output-dir",
        help = "Directory to save extracted rules (default: current directory)",
        value_name = "PATH"
    )]
    output_dir: Option<PathBuf>,

    /// Create the output directory if it does not exist
    #[arg(long = "create-output-dir")]
    create_output_dir: bool,

    /// Read exported manifests instead of querying the cluster
    #[arg(
        short = 'i',
        long = "input",
        help = "Manifest file or directory to read instead of the cluster",
        value_name = "PATH"
    )]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::debug!("Starting with arguments: {:?}", args);

    let config = create_config_from_args(args)?;

    let source: Box<dyn RuleSource> = match &config.source {
        SourceConfig::Cluster => Box::new(ClusterSource::connect().await?),
        SourceConfig::Manifests(path) => Box::new(ManifestSource::new(path.clone())),
    };

    let mut writer = if config.create_output_dir {
        DirectoryWriter::create(&config.output_dir)?
    } else {
        DirectoryWriter::new(&config.output_dir)?
    };

    let summary = Extractor::new(config.filter)
        .run(source.as_ref(), &mut writer)
        .await?;

    tracing::info!(
        "wrote [{}] groups for [{}] namespaces from [{}] resources",
        summary.groups,
        summary.namespaces,
        summary.resources
    );
    Ok(())
}

/// Log filter from a `RUST_LOG` style spec, falling back to `info`
fn env_filter(spec: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(spec.unwrap_or_default())
}

/// Create an ExtractConfig from command line arguments
fn create_config_from_args(args: Args) -> Result<ExtractConfig> {
    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let source = match args.input {
        Some(path) => SourceConfig::Manifests(path),
        None => SourceConfig::Cluster,
    };

    Ok(ExtractConfig {
        filter: FilterOptions::new(args.exclude_alert_rules, args.exclude_recording_rules),
        output_dir,
        create_output_dir: args.create_output_dir,
        source,
    })
}
