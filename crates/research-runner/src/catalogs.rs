use analysis_core::{PriceHistory, SentimentSource};
use analysis_orchestrator::ReferenceData;
use anyhow::{Context, Result};
use earnings_calendar::EarningsCalendar;
use portfolio_manager::PositionCatalog;
use sentiment_analysis::{FallbackSentiment, KeywordSentiment, SentimentCatalog};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::config::RunnerConfig;

/// Reference data loaded from disk for one run
#[derive(Default)]
pub struct Catalogs {
    pub history: Option<PriceHistory>,
    pub earnings: Option<EarningsCalendar>,
    pub positions: Option<PositionCatalog>,
    pub sentiment: Option<Box<dyn SentimentSource>>,
}

impl Catalogs {
    pub fn load(config: &RunnerConfig) -> Result<Self> {
        let history: Option<PriceHistory> = load_optional(config.history_path.as_deref(), "price history")?;
        let earnings = load_optional(config.earnings_path.as_deref(), "earnings calendar")?;
        let positions: Option<PositionCatalog> = load_optional(config.positions_path.as_deref(), "positions")?;
        let scored: Option<SentimentCatalog> = load_optional(config.sentiment_path.as_deref(), "sentiment")?;
        let headlines: Option<KeywordSentiment> = load_optional(config.headlines_path.as_deref(), "headlines")?;

        if let Some(positions) = &positions {
            let weight = positions.total_weight();
            if (weight - 1.0).abs() > 0.01 {
                tracing::warn!("Position weights sum to {:.3}, not 1.0", weight);
            }
        }
        if let Some(history) = &history {
            tracing::info!("Loaded price history for {} tickers", history.len());
        }

        Ok(Self {
            history,
            earnings,
            positions,
            sentiment: sentiment_source(scored, headlines),
        })
    }

    pub fn reference_data(&self) -> ReferenceData<'_> {
        ReferenceData {
            history: self.history.as_ref(),
            earnings: self.earnings.as_ref(),
            positions: self.positions.as_ref(),
            sentiment: self.sentiment.as_deref(),
            as_of: None,
        }
    }
}

/// Scored sentiment wins; headlines fill in whatever it does not cover
pub fn sentiment_source(
    scored: Option<SentimentCatalog>,
    headlines: Option<KeywordSentiment>,
) -> Option<Box<dyn SentimentSource>> {
    match (scored, headlines) {
        (Some(catalog), Some(keywords)) => Some(Box::new(FallbackSentiment::new(catalog, keywords))),
        (Some(catalog), None) => Some(Box::new(catalog)),
        (None, Some(keywords)) => Some(Box::new(keywords)),
        (None, None) => None,
    }
}

fn load_optional<T: DeserializeOwned>(path: Option<&Path>, what: &str) -> Result<Option<T>> {
    path.map(|p| load_json(p, what)).transpose()
}

pub fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
    let parsed = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {} in {}", what, path.display()))?;
    tracing::debug!("Loaded {} from {}", what, path.display());
    Ok(parsed)
}
