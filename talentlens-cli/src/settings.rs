use anyhow::{Context, Result};
use config::{Config, Environment, File};
use extractors::PipelineConfig;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "TALENTLENS";
const LIST_KEYS: &[&str] = &[
    "host_domains",
    "extra_blocked_email_prefixes",
    "extra_public_figures",
    "extra_employers",
];

/// Load pipeline settings from `explicit`, or the default location when it exists.
/// `TALENTLENS_*` environment variables override file values.
pub fn load_pipeline_config(explicit: Option<&Path>) -> Result<(PipelineConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(anyhow::anyhow!("Config file not found at {:?}", path));
        }
        Some(path) => Some(path.to_path_buf()),
        None => Some(get_config_path()).filter(|p| p.exists()),
    };

    let config = build_config(path.as_deref(), environment())
        .with_context(|| format!("Failed to load pipeline config from {:?}", path))?;

    Ok((config, path))
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("talentlens").join("pipeline.toml")
    } else {
        PathBuf::from("pipeline.toml")
    }
}

fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

fn build_config(path: Option<&Path>, env: Environment) -> Result<PipelineConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path.to_path_buf()));
    }

    let config: PipelineConfig = builder.add_source(env).build()?.try_deserialize()?;
    Ok(config)
}
