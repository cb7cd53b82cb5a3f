//! Server configuration loaded from environment variables.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::catalog::RequirementCatalog;
use crate::demo_data::DemoData;

const DEFAULT_PORT: u16 = 7860;
const DEFAULT_LOG_FILTER: &str = "nurse_scheduling=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// JSON requirement catalog; the built-in week when unset.
    pub requirements_path: Option<PathBuf>,
    /// Roster seeded into the nurse store at start-up; none when unset.
    pub demo_data: Option<DemoData>,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            requirements_path: None,
            demo_data: Some(DemoData::Small),
            rust_log: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        let demo_data = match lookup("DEMO_DATA") {
            Some(name) if name.eq_ignore_ascii_case("none") => None,
            Some(name) => Some(
                name.parse::<DemoData>()
                    .map_err(|_| anyhow::anyhow!("DEMO_DATA must be SMALL, LARGE or NONE, got '{name}'"))?,
            ),
            None => defaults.demo_data,
        };

        Ok(Config {
            port,
            requirements_path: lookup("REQUIREMENTS_PATH").map(PathBuf::from),
            demo_data,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    /// Loads the configured requirement catalog.
    pub fn requirement_catalog(&self) -> Result<RequirementCatalog> {
        match &self.requirements_path {
            Some(path) => RequirementCatalog::load(path)
                .with_context(|| format!("Failed to load requirements from {}", path.display())),
            None => Ok(RequirementCatalog::default_week()),
        }
    }
}
