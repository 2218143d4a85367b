use analysis_core::{SentimentLabel, SentimentReading, SentimentSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BULLISH_KEYWORDS: &[&str] = &[
    "surge", "rally", "gain", "beat", "upgrade", "momentum", "bullish", "strong", "growth",
    "profit",
];

pub const BEARISH_KEYWORDS: &[&str] = &[
    "plunge", "crash", "loss", "miss", "downgrade", "decline", "bearish", "weak", "cut",
];

/// Non-overlapping occurrences of each keyword inside already-lowercased text
fn count_keywords(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|word| text_lower.matches(word).count()).sum()
}

/// Bullish/bearish keyword counts for a piece of text
pub fn keyword_counts(text: &str) -> (usize, usize) {
    let text_lower = text.to_lowercase();
    (
        count_keywords(&text_lower, BULLISH_KEYWORDS),
        count_keywords(&text_lower, BEARISH_KEYWORDS),
    )
}

/// Score in [-1, 1]: (bullish - bearish) / (bullish + bearish), 0 when no keyword matched
pub fn keyword_score(text: &str) -> f64 {
    let (bullish, bearish) = keyword_counts(text);
    score_from_counts(bullish, bearish)
}

fn score_from_counts(bullish: usize, bearish: usize) -> f64 {
    let total = bullish + bearish;
    if total == 0 {
        return 0.0;
    }
    (bullish as f64 - bearish as f64) / total as f64
}

/// One reference sentiment entry. The label is derived from the score
/// unless the data provider supplied one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentEntry {
    pub score: f64,
    #[serde(default)]
    pub articles: u32,
    #[serde(default)]
    pub label: Option<SentimentLabel>,
}

impl SentimentEntry {
    fn to_reading(&self, ticker: &str) -> SentimentReading {
        SentimentReading {
            ticker: ticker.to_string(),
            score: self.score,
            label: self.label.clone().unwrap_or_else(|| SentimentLabel::from_score(self.score)),
            articles: self.articles,
        }
    }
}

/// Pre-scored sentiment supplied by the reference-data provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentCatalog {
    entries: BTreeMap<String, SentimentEntry>,
}

impl SentimentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, ticker: &str, entry: SentimentEntry) -> Self {
        self.entries.insert(ticker.to_string(), entry);
        self
    }

    pub fn get(&self, ticker: &str) -> Option<SentimentReading> {
        self.entries.get(ticker).map(|entry| entry.to_reading(ticker))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SentimentSource for SentimentCatalog {
    fn reading(&self, ticker: &str) -> SentimentReading {
        self.get(ticker).unwrap_or_else(|| SentimentReading::unknown(ticker))
    }
}

/// Keyword-count scoring over headlines or article text, for when no
/// scored sentiment is available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSentiment {
    texts: BTreeMap<String, Vec<String>>,
}

impl KeywordSentiment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texts<I, S>(mut self, ticker: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts
            .entry(ticker.to_string())
            .or_default()
            .extend(texts.into_iter().map(Into::into));
        self
    }

    /// Score all texts for a ticker as one body. `None` when there is no text.
    pub fn score(&self, ticker: &str) -> Option<SentimentReading> {
        let texts = self.texts.get(ticker).filter(|t| !t.is_empty())?;

        let (bullish, bearish) = texts.iter().fold((0, 0), |(bull, bear), text| {
            let (b, s) = keyword_counts(text);
            (bull + b, bear + s)
        });
        let score = score_from_counts(bullish, bearish);

        tracing::debug!(
            "{}: keyword sentiment {:.2} ({} bullish, {} bearish over {} texts)",
            ticker, score, bullish, bearish, texts.len()
        );

        Some(SentimentReading {
            ticker: ticker.to_string(),
            score,
            label: SentimentLabel::from_score(score),
            articles: texts.len() as u32,
        })
    }
}

impl SentimentSource for KeywordSentiment {
    fn reading(&self, ticker: &str) -> SentimentReading {
        self.score(ticker).unwrap_or_else(|| SentimentReading::unknown(ticker))
    }
}

/// Reference catalog first, keyword scoring for tickers the catalog lacks
#[derive(Debug, Clone, Default)]
pub struct FallbackSentiment {
    catalog: SentimentCatalog,
    keywords: KeywordSentiment,
}

impl FallbackSentiment {
    pub fn new(catalog: SentimentCatalog, keywords: KeywordSentiment) -> Self {
        Self { catalog, keywords }
    }
}

impl SentimentSource for FallbackSentiment {
    fn reading(&self, ticker: &str) -> SentimentReading {
        self.catalog
            .get(ticker)
            .or_else(|| self.keywords.score(ticker))
            .unwrap_or_else(|| SentimentReading::unknown(ticker))
    }
}
