use crate::SentimentReading;

/// Anything that can produce a sentiment reading for a ticker.
///
/// Providers are read-only for the duration of a run, so a single instance
/// can be shared across concurrent aggregator invocations.
pub trait SentimentSource: Send + Sync {
    fn reading(&self, ticker: &str) -> SentimentReading;
}

impl<T: SentimentSource + ?Sized> SentimentSource for Box<T> {
    fn reading(&self, ticker: &str) -> SentimentReading {
        (**self).reading(ticker)
    }
}
