use analysis_core::{
    round2, PriceHistory, PrimarySignal, QuoteBatch, QuoteSnapshot, SentimentReading,
    SentimentSource,
};
use chrono::{DateTime, NaiveDate, Utc};
use earnings_calendar::{EarningsCalendar, EarningsImpact};
use portfolio_manager::{rollup, PortfolioRollup, PositionCatalog, PositionImpact};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use technical_analysis::{classify_change, position_in_52w, TechnicalAnalysisEngine, TechnicalSnapshot};

pub mod summary;
pub use summary::{EarningsSoon, SentimentShift, Summary, SummaryEntry};

/// Everything known about one ticker after a research pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRecord {
    pub ticker: String,
    pub signal: PrimarySignal,
    /// 0 to 100
    pub confidence: u8,
    pub change: f64,
    pub change_percent: f64,
    pub current: f64,
    pub position_in_52w: i64,
    pub volume: u64,
    /// Present only when a price history was supplied
    pub technical: Option<TechnicalSnapshot>,
    pub sentiment: Option<SentimentReading>,
    pub earnings: Option<EarningsImpact>,
    pub portfolio: Option<PositionImpact>,
}

/// Result of one research pass over a quote batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub timestamp: DateTime<Utc>,
    pub stocks: BTreeMap<String, SignalRecord>,
    pub summary: Summary,
    pub portfolio: PortfolioRollup,
}

/// Read-only reference data for one research pass. Every source is
/// optional; a missing source leaves the matching sub-record empty.
#[derive(Clone, Copy, Default)]
pub struct ReferenceData<'a> {
    pub history: Option<&'a PriceHistory>,
    pub earnings: Option<&'a EarningsCalendar>,
    pub positions: Option<&'a PositionCatalog>,
    pub sentiment: Option<&'a dyn SentimentSource>,
    /// Date earnings proximity is measured from; defaults to the batch date
    pub as_of: Option<NaiveDate>,
}

impl<'a> ReferenceData<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, history: &'a PriceHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_earnings(mut self, calendar: &'a EarningsCalendar) -> Self {
        self.earnings = Some(calendar);
        self
    }

    pub fn with_positions(mut self, positions: &'a PositionCatalog) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn with_sentiment(mut self, source: &'a dyn SentimentSource) -> Self {
        self.sentiment = Some(source);
        self
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

/// Stateless research pass: classify, enrich, bucket and roll up a batch.
pub struct ResearchAggregator {
    technical_analyzer: TechnicalAnalysisEngine,
    parallel: bool,
}

impl ResearchAggregator {
    pub fn new() -> Self {
        Self {
            technical_analyzer: TechnicalAnalysisEngine::new(),
            parallel: false,
        }
    }

    /// Analyze tickers on the rayon pool. Output is identical to a
    /// sequential pass.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_technical_engine(mut self, engine: TechnicalAnalysisEngine) -> Self {
        self.technical_analyzer = engine;
        self
    }

    /// Public accessor for the technical analysis engine
    pub fn technical_engine(&self) -> &TechnicalAnalysisEngine {
        &self.technical_analyzer
    }

    /// Run one research pass over `batch`
    pub fn research(&self, batch: &QuoteBatch, refs: &ReferenceData<'_>) -> AnalysisResult {
        let as_of = refs.as_of.unwrap_or_else(|| batch.timestamp.date_naive());
        tracing::info!(
            "Researching {} tickers (as of {}, parallel: {})",
            batch.stocks.len(),
            as_of,
            self.parallel
        );

        let records: Vec<SignalRecord> = if self.parallel {
            batch
                .stocks
                .par_iter()
                .map(|(ticker, quote)| self.analyze_ticker(ticker, quote, refs, as_of))
                .collect()
        } else {
            batch
                .stocks
                .iter()
                .map(|(ticker, quote)| self.analyze_ticker(ticker, quote, refs, as_of))
                .collect()
        };

        let summary = Summary::from_records(&records);
        let portfolio = rollup(records.iter().filter_map(|r| r.portfolio.clone()));

        tracing::info!(
            "Research complete: {} bullish, {} bearish, {} neutral, {} alerts, portfolio {:+.3}%",
            summary.bullish.len(),
            summary.bearish.len(),
            summary.neutral.len(),
            summary.alerts.len(),
            portfolio.total_day_impact
        );

        AnalysisResult {
            timestamp: batch.timestamp,
            stocks: records.into_iter().map(|r| (r.ticker.clone(), r)).collect(),
            summary,
            portfolio,
        }
    }

    fn analyze_ticker(
        &self,
        ticker: &str,
        quote: &QuoteSnapshot,
        refs: &ReferenceData<'_>,
        as_of: NaiveDate,
    ) -> SignalRecord {
        let classification = classify_change(quote.change_percent);
        let position_52w = position_in_52w(quote.current, quote.high52, quote.low52);

        let technical = refs
            .history
            .and_then(|history| history.get(ticker))
            .map(|closes| self.technical_analyzer.analyze(ticker, quote.current, closes));

        let sentiment = refs.sentiment.map(|source| source.reading(ticker));

        let earnings = refs
            .earnings
            .and_then(|calendar| calendar.impact(ticker, quote.current, as_of));

        let portfolio = refs
            .positions
            .and_then(|positions| positions.impact(ticker, quote.current, quote.change_percent));
        if refs.positions.is_some() && portfolio.is_none() {
            tracing::debug!("{}: not in position catalog, excluded from rollup", ticker);
        }

        SignalRecord {
            ticker: ticker.to_string(),
            signal: classification.signal,
            confidence: classification.confidence,
            change: quote.change,
            change_percent: round2(quote.change_percent),
            current: round2(quote.current),
            position_in_52w: position_52w.round() as i64,
            volume: quote.volume,
            technical,
            sentiment,
            earnings,
            portfolio,
        }
    }
}

impl Default for ResearchAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
