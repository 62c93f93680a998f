//! plotmark: command-line inspector for annotation imports.
//!
//! Runs the import pipeline on a local file and prints what would be
//! uploaded, plus helpers for the color palette, templates and the
//! identifiers the mapping platform expects.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use plotmark_core::palette::find_by_name;
use plotmark_core::{
    nearest_palette_match, normalize_hex, plan_node_id, validate_api_key, Annotation, Geometry,
    PALETTE,
};
use plotmark_import::{
    import_file, template, FileFormat, ImportConfig, ImportError, ImportReport, RejectedRecord,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "plotmark")]
#[command(author, version, about = "Inspect geospatial annotation imports")]
#[command(propagate_version = true)]
struct Cli {
    /// Import config file (default: ~/.config/plotmark/import.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and normalize a CSV, GeoJSON, KML or KMZ file
    Inspect {
        /// File to import
        file: PathBuf,

        /// Snap colors to the nearest palette entry
        #[arg(short, long)]
        standardize_colors: bool,

        /// Override the maximum accepted file size in bytes
        #[arg(long)]
        max_file_bytes: Option<usize>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a template file to fill in
    Template {
        /// Template format
        #[arg(value_enum)]
        format: TemplateFormat,
    },

    /// List the color palette
    Palette {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the palette entry nearest to a color
    MatchColor {
        /// Hex color (#rrggbb, rrggbb or #rgb) or a palette name
        color: String,
    },

    /// Validate a map plan id and print its node id
    CheckPlan {
        /// Bare 24-character hex id or MapPlan:<id>
        id: String,
    },

    /// Validate the shape of an API key
    CheckKey {
        /// API key to check
        #[arg(env = "PLOTMARK_API_KEY", hide_env_values = true)]
        key: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TemplateFormat {
    Csv,
    Geojson,
    Kml,
}

impl From<TemplateFormat> for FileFormat {
    fn from(format: TemplateFormat) -> Self {
        match format {
            TemplateFormat::Csv => FileFormat::Csv,
            TemplateFormat::Geojson => FileFormat::GeoJson,
            TemplateFormat::Kml => FileFormat::Kml,
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _log_guard = init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, replaces stderr output)
///   LOG_ANSI    - "true"/"false" override ANSI colors
///   RUST_LOG    - standard env filter (default: "plotmark=info")
///
/// Console logs go to stderr so stdout stays machine readable.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plotmark=info,plotmark_import=info,plotmark_core=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = log_file {
        let path = Path::new(path);
        let file_dir = path.parent().unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("plotmark.log");
        let file_appender = tracing_appender::rolling::never(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(log_ansi.unwrap_or(false))
                        .with_writer(non_blocking),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Inspect {
            file,
            standardize_colors,
            max_file_bytes,
            json,
        } => cmd_inspect(
            cli.config.as_deref(),
            &file,
            standardize_colors,
            max_file_bytes,
            json,
        ),
        Commands::Template { format } => cmd_template(format),
        Commands::Palette { json } => cmd_palette(json),
        Commands::MatchColor { color } => cmd_match_color(&color),
        Commands::CheckPlan { id } => cmd_check_plan(&id),
        Commands::CheckKey { key } => cmd_check_key(&key),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ImportConfig> {
    match path {
        Some(path) => ImportConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ImportConfig::load().context("Failed to load import config"),
    }
}

fn cmd_inspect(
    config_path: Option<&Path>,
    file: &Path,
    standardize_colors: bool,
    max_file_bytes: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut options = config.to_options();
    options.standardize_colors |= standardize_colors;
    if let Some(limit) = max_file_bytes {
        options.max_file_bytes = limit;
    }
    debug!(subsystem = "cli", ?options, "Resolved import options");

    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or_default();

    let report = match import_file(&bytes, file_name, &options) {
        Ok(report) => report,
        Err(e @ ImportError::EmptyResult { .. }) => {
            print_rejected(e.rejected());
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!(
        "{}: {}, {} (import {})",
        report.file_name,
        report.format,
        report.summary(),
        report.import_id
    );
    for annotation in &report.annotations {
        println!("  {}", describe(annotation));
    }
    print_rejected(&report.rejected);
}

fn describe(annotation: &Annotation) -> String {
    let shape = match annotation.geometry() {
        Geometry::Location(point) => format!("at {:.6}, {:.6}", point.lat, point.lng),
        Geometry::Area(points) | Geometry::Line(points) => format!("{} points", points.len()),
    };
    format!(
        "{:<8} {:<32} {} / {}  {}",
        annotation.annotation_type().as_str(),
        annotation.title(),
        annotation.color(),
        annotation.fill_color(),
        shape
    )
}

fn print_rejected(rejected: &[RejectedRecord]) {
    if rejected.is_empty() {
        return;
    }
    eprintln!("Skipped:");
    for record in rejected {
        eprintln!("  {record}");
    }
}

fn cmd_template(format: TemplateFormat) -> anyhow::Result<()> {
    let format = FileFormat::from(format);
    let text = template(format).with_context(|| format!("No template for {format}"))?;
    print!("{text}");
    Ok(())
}

fn cmd_palette(json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&PALETTE[..])?);
        return Ok(());
    }
    for (i, entry) in PALETTE.iter().enumerate() {
        println!(
            "{i}  {:<8} {}  {}",
            entry.name, entry.color, entry.fill_color
        );
    }
    Ok(())
}

fn cmd_match_color(input: &str) -> anyhow::Result<()> {
    if let Some(entry) = find_by_name(input) {
        println!("{}  {}  {}", entry.name, entry.color, entry.fill_color);
        return Ok(());
    }
    let Some(hex) = normalize_hex(input) else {
        bail!("'{input}' is neither a hex color nor a palette name");
    };
    let (entry, distance) =
        nearest_palette_match(&hex).with_context(|| format!("Cannot match '{hex}'"))?;
    println!(
        "{hex} -> {}  {}  {}  (distance {distance:.2})",
        entry.name, entry.color, entry.fill_color
    );
    Ok(())
}

fn cmd_check_plan(id: &str) -> anyhow::Result<()> {
    println!("{}", plan_node_id(id)?);
    Ok(())
}

fn cmd_check_key(key: &str) -> anyhow::Result<()> {
    validate_api_key(key)?;
    println!("API key format OK");
    Ok(())
}
