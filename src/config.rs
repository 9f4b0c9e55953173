use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Config;

const SAMPLE_CONFIG: &str = include_str!("../config.sample.toml");

/// Config file read when no --config is given. It may be absent.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment override for `api.base_url`.
pub const ENV_API_BASE_URL: &str = "ADDRSUGGEST_API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("config file already exists: {0}")]
    Exists(PathBuf),
}

/// Load and merge one or more config files. Keys in later files override
/// earlier ones. With no paths, the default config file is loaded if present.
pub fn load_all(paths: &[PathBuf]) -> Result<Config, ConfigError> {
    let mut merged = toml::Table::new();

    if paths.is_empty() {
        let def = Path::new(DEFAULT_CONFIG_PATH);
        if def.exists() {
            log::info!("loading config: {}", def.display());
            merge(&mut merged, read_file(def)?);
        }
    }

    for path in paths {
        log::info!("loading config: {}", path.display());
        merge(&mut merged, read_file(path)?);
    }

    let cfg: Config = toml::Value::Table(merged).try_into()?;
    Ok(cfg)
}

/// Apply environment overrides. `lookup` is `std::env::var` outside tests.
pub fn apply_env<F>(cfg: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        log::debug!("api.base_url from ${}", ENV_API_BASE_URL);
        cfg.api.base_url = url;
    }
}

/// Build the effective config. Files are merged first, then the environment
/// applies, then `api_base` (the --api-base flag) wins over both.
pub fn resolve<F>(paths: &[PathBuf], api_base: Option<&str>, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = load_all(paths)?;
    apply_env(&mut cfg, lookup);

    if let Some(url) = api_base {
        log::debug!("api.base_url from --api-base");
        cfg.api.base_url = url.to_string();
    }

    Ok(cfg)
}

/// Generate sample config file.
pub fn generate_sample(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::Exists(path.to_path_buf()));
    }
    std::fs::write(path, SAMPLE_CONFIG).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a TOML file into a raw table.
fn read_file(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge the src table into dest. Nested tables merge key by key, any other
/// value replaces the existing one.
fn merge(dest: &mut toml::Table, src: toml::Table) {
    for (key, val) in src {
        match (dest.get_mut(&key), val) {
            (Some(toml::Value::Table(d)), toml::Value::Table(s)) => merge(d, s),
            (_, v) => {
                dest.insert(key, v);
            }
        }
    }
}
