use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub(crate) const DATA_FILE_ENV: &str = "POCKETBOOK_FILE";
pub(crate) const LOG_FILTER_ENV: &str = "POCKETBOOK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_file: PathBuf,
    pub(crate) log_file: PathBuf,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let data_file = match std::env::var_os(DATA_FILE_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_data_dir()?.join("data.json"),
        };
        let data_dir = data_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            log_file: data_dir.join("pocketbook.log"),
            data_file,
        })
    }

    /// `tracing_subscriber` directive from the environment, or the default.
    pub(crate) fn log_filter() -> String {
        std::env::var(LOG_FILTER_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "pocketbook", "Pocketbook")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
