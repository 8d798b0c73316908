use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use extractors::{ProfileDocument, ProfileInput, ProfilePipeline, StaticSections};
use shared_types::{ErrorResponse, PipelineOutput, ProfileError};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

mod settings;

#[derive(Parser, Debug)]
#[command(
    name = "profile-extract",
    about = "Extract a normalized candidate profile from a saved profile page"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["html", "text"]),
))]
struct Cli {
    /// Saved profile page (HTML)
    #[arg(long, value_name = "PATH", group = "input")]
    html: Option<PathBuf>,

    /// Profile page already flattened to text
    #[arg(long, value_name = "PATH", group = "input")]
    text: Option<PathBuf>,

    /// Pre-located sections as JSON (about, experience, education, skills)
    #[arg(long, value_name = "PATH")]
    sections: Option<PathBuf>,

    /// Display name shown on the profile
    #[arg(long)]
    name: String,

    /// Stable profile identifier, used to look up role overrides
    #[arg(long)]
    profile_id: Option<String>,

    /// Pipeline config (defaults to <config dir>/talentlens/pipeline.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    log_file_path: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file_path.as_deref());

    match run(&cli) {
        Ok(output) => print_json(&output, cli.pretty),
        Err(err) => {
            let response = match err.downcast_ref::<ProfileError>() {
                Some(profile_err) => ErrorResponse::from(profile_err),
                None => ErrorResponse {
                    error: format!("{:#}", err),
                },
            };
            print_json(&response, cli.pretty)?;
            Err(err)
        }
    }
}

fn run(cli: &Cli) -> Result<PipelineOutput> {
    let (config, config_path) = settings::load_pipeline_config(cli.config.as_deref())?;
    match &config_path {
        Some(path) => tracing::info!("Loaded pipeline config from {:?}", path),
        None => tracing::debug!("No pipeline config found, using defaults"),
    }

    let pipeline = ProfilePipeline::from_config(&config).context("Invalid pipeline config")?;

    let document = match (&cli.html, &cli.text) {
        (Some(path), None) => ProfileDocument::from_html(&read_page(path)?),
        (None, Some(path)) => ProfileDocument::from_text(&read_page(path)?),
        _ => unreachable!("clap enforces exactly one input"),
    };

    let sections = match &cli.sections {
        Some(path) => StaticSections::from_json(&read_input(path)?)
            .with_context(|| format!("Failed to parse sections file at {:?}", path))?,
        None => StaticSections::default(),
    };

    Ok(pipeline.run(&ProfileInput {
        document: &document,
        display_name: &cli.name,
        sections: &sections,
        profile_id: cli.profile_id.as_deref(),
    }))
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn read_page(path: &Path) -> Result<String> {
    let page = read_input(path)?;
    if page.trim().is_empty() {
        return Err(ProfileError::InvalidInput(format!("Profile page {:?} is empty", path)).into());
    }
    Ok(page)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON
fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("profile-extract.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
