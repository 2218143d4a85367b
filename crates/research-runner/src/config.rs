use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

/// Where the runner finds its reference data. Every catalog is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerConfig {
    pub positions_path: Option<PathBuf>,
    pub earnings_path: Option<PathBuf>,
    pub sentiment_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub headlines_path: Option<PathBuf>,
    /// Overrides the batch date for earnings proximity
    pub as_of: Option<NaiveDate>,
    pub parallel: bool,
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        let as_of = match lookup("RESEARCH_AS_OF").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .with_context(|| format!("RESEARCH_AS_OF must be YYYY-MM-DD, got {:?}", raw))?,
            ),
            None => None,
        };

        let config = Self {
            positions_path: path("RESEARCH_POSITIONS_PATH"),
            earnings_path: path("RESEARCH_EARNINGS_PATH"),
            sentiment_path: path("RESEARCH_SENTIMENT_PATH"),
            history_path: path("RESEARCH_HISTORY_PATH"),
            headlines_path: path("RESEARCH_HEADLINES_PATH"),
            as_of,
            parallel: lookup("RESEARCH_PARALLEL")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .context("RESEARCH_PARALLEL must be true or false")?,
        };

        Ok(config)
    }
}
