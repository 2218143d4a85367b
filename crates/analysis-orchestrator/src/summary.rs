use analysis_core::{PrimarySignal, SentimentLabel};
use chrono::NaiveDate;
use earnings_calendar::Urgency;
use serde::{Deserialize, Serialize};

use crate::SignalRecord;

/// Price moves beyond this many points are checked against sentiment
const DIVERGENCE_THRESHOLD: f64 = 2.0;

/// A bullish or bearish pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEntry {
    pub ticker: String,
    pub reason: String,
    /// Only set for the actionable BUY/SELL tiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default)]
    pub sentiment: Option<SentimentLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSoon {
    pub ticker: String,
    pub date: NaiveDate,
    pub days_until: i64,
    pub urgency: Urgency,
}

/// Price action and news sentiment disagree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentShift {
    pub ticker: String,
    pub price_action: PrimarySignal,
    pub sentiment: SentimentLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub bullish: Vec<SummaryEntry>,
    pub bearish: Vec<SummaryEntry>,
    pub neutral: Vec<String>,
    pub alerts: Vec<String>,
    pub earnings_soon: Vec<EarningsSoon>,
    pub sentiment_shift: Vec<SentimentShift>,
}

impl Summary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SignalRecord>,
    {
        let mut summary = Summary::default();
        for record in records {
            summary.add(record);
        }
        summary
    }

    /// Bucket one record and raise whatever alerts it warrants
    pub fn add(&mut self, record: &SignalRecord) {
        let ticker = record.ticker.clone();
        let pct = record.change_percent;
        let sentiment = record.sentiment.as_ref().map(|s| s.label.clone());

        match record.signal {
            PrimarySignal::BuySignal => {
                self.bullish.push(SummaryEntry {
                    ticker: ticker.clone(),
                    reason: format!("{}% up", pct),
                    confidence: Some(record.confidence),
                    sentiment,
                });
                self.alerts.push(format!("🟢 {}: BUY SIGNAL +{}%", ticker, pct));
            }
            PrimarySignal::SellSignal => {
                self.bearish.push(SummaryEntry {
                    ticker: ticker.clone(),
                    reason: format!("{}% down", pct),
                    confidence: Some(record.confidence),
                    sentiment,
                });
                self.alerts.push(format!("🔴 {}: SELL SIGNAL {}%", ticker, pct));
            }
            PrimarySignal::Bullish => self.bullish.push(SummaryEntry {
                ticker: ticker.clone(),
                reason: format!("Mild uptrend +{}%", pct),
                confidence: None,
                sentiment,
            }),
            PrimarySignal::Bearish => self.bearish.push(SummaryEntry {
                ticker: ticker.clone(),
                reason: format!("Mild downtrend {}%", pct),
                confidence: None,
                sentiment,
            }),
            PrimarySignal::Neutral => self.neutral.push(ticker.clone()),
        }

        if let Some(earnings) = record.earnings.as_ref().filter(|e| e.is_soon()) {
            self.earnings_soon.push(EarningsSoon {
                ticker: ticker.clone(),
                date: earnings.earnings_date,
                days_until: earnings.days_until,
                urgency: earnings.urgency,
            });
        }

        // Literal label comparison: BUY_SIGNAL / SELL_SIGNAL never match a
        // sentiment label, so every large move without one diverges.
        if let Some(reading) = &record.sentiment {
            if pct.abs() > DIVERGENCE_THRESHOLD && reading.label.as_str() != record.signal.as_str() {
                self.sentiment_shift.push(SentimentShift {
                    ticker,
                    price_action: record.signal,
                    sentiment: reading.label.clone(),
                });
            }
        }
    }
}
