use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closing prices per ticker, oldest first.
pub type PriceHistory = BTreeMap<String, Vec<f64>>;

/// Quote snapshot for one ticker within a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    #[serde(default)]
    pub ticker: Option<String>,
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub change_percent: f64,
    #[serde(default)]
    pub high52: Option<f64>,
    #[serde(default)]
    pub low52: Option<f64>,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A ticker the data source could not fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchFailure {
    pub ticker: String,
    pub error: String,
}

/// One fully materialized batch of quotes from the data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBatch {
    pub timestamp: DateTime<Utc>,
    pub stocks: BTreeMap<String, QuoteSnapshot>,
    #[serde(default)]
    pub errors: Vec<FetchFailure>,
}

/// Primary directional signal derived from the day's change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimarySignal {
    BuySignal,
    SellSignal,
    Bullish,
    Bearish,
    Neutral,
}

impl PrimarySignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimarySignal::BuySignal => "BUY_SIGNAL",
            PrimarySignal::SellSignal => "SELL_SIGNAL",
            PrimarySignal::Bullish => "BULLISH",
            PrimarySignal::Bearish => "BEARISH",
            PrimarySignal::Neutral => "NEUTRAL",
        }
    }

    /// Whether this tier raises an alert
    pub fn is_actionable(&self) -> bool {
        matches!(self, PrimarySignal::BuySignal | PrimarySignal::SellSignal)
    }
}

/// Sign of a value, used for position status and portfolio direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn from_value(value: f64) -> Self {
        if value > 0.0 {
            Direction::Up
        } else if value < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }
}

/// Sentiment label attached to a reading.
///
/// `Neutral` and `Unknown` only ever come from reference data or a missing
/// entry; scores map onto the six directional labels. Providers may supply
/// labels outside this set (e.g. `MODERATELY_BULLISH`); those are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SentimentLabel {
    StronglyBullish,
    Bullish,
    SlightlyBullish,
    Neutral,
    SlightlyBearish,
    Bearish,
    StronglyBearish,
    Unknown,
    Other(String),
}

impl SentimentLabel {
    /// Map a score in [-1, 1] to a label.
    ///
    /// The bands are not symmetric around zero: (-0.4, 0.1] is
    /// `SlightlyBearish`, so a score of exactly 0 reads bearish.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s > 0.7 => SentimentLabel::StronglyBullish,
            s if s > 0.4 => SentimentLabel::Bullish,
            s if s > 0.1 => SentimentLabel::SlightlyBullish,
            s if s > -0.4 => SentimentLabel::SlightlyBearish,
            s if s > -0.7 => SentimentLabel::Bearish,
            _ => SentimentLabel::StronglyBearish,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SentimentLabel::StronglyBullish => "STRONGLY_BULLISH",
            SentimentLabel::Bullish => "BULLISH",
            SentimentLabel::SlightlyBullish => "SLIGHTLY_BULLISH",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::SlightlyBearish => "SLIGHTLY_BEARISH",
            SentimentLabel::Bearish => "BEARISH",
            SentimentLabel::StronglyBearish => "STRONGLY_BEARISH",
            SentimentLabel::Unknown => "UNKNOWN",
            SentimentLabel::Other(label) => label,
        }
    }
}

impl From<String> for SentimentLabel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "STRONGLY_BULLISH" => SentimentLabel::StronglyBullish,
            "BULLISH" => SentimentLabel::Bullish,
            "SLIGHTLY_BULLISH" => SentimentLabel::SlightlyBullish,
            "NEUTRAL" => SentimentLabel::Neutral,
            "SLIGHTLY_BEARISH" => SentimentLabel::SlightlyBearish,
            "BEARISH" => SentimentLabel::Bearish,
            "STRONGLY_BEARISH" => SentimentLabel::StronglyBearish,
            "UNKNOWN" => SentimentLabel::Unknown,
            _ => SentimentLabel::Other(label),
        }
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Sentiment for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReading {
    pub ticker: String,
    pub score: f64,
    pub label: SentimentLabel,
    pub articles: u32,
}

impl SentimentReading {
    /// Reading for a ticker no provider knows about
    pub fn unknown(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            score: 0.0,
            label: SentimentLabel::Unknown,
            articles: 0,
        }
    }
}
