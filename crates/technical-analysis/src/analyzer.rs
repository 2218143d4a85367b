use serde::{Deserialize, Serialize};

use crate::indicators::*;

/// Indicator family an advisory signal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indicator {
    Rsi,
    Macd,
    Ma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisoryKind {
    Overbought,
    Oversold,
    BullishCrossover,
    BearishCrossover,
    UptrendConfirmed,
    DowntrendConfirmed,
}

/// Secondary annotation. Never fused into the primary signal; callers that
/// want a combined view apply their own policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorySignal {
    pub indicator: Indicator,
    pub signal: AdvisoryKind,
    pub strength: f64,
}

/// Indicators computed from one ticker's price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSnapshot {
    pub rsi: Option<u32>,
    pub macd: Option<MacdResult>,
    pub moving_averages: MovingAverages,
    pub signals: Vec<AdvisorySignal>,
}

/// Derive advisory signals from (rounded) indicator outputs
pub fn advisory_signals(
    current: f64,
    rsi: Option<u32>,
    macd: Option<&MacdResult>,
    averages: &MovingAverages,
) -> Vec<AdvisorySignal> {
    let mut signals = Vec::new();

    if let Some(rsi) = rsi {
        if rsi > 70 {
            signals.push(AdvisorySignal {
                indicator: Indicator::Rsi,
                signal: AdvisoryKind::Overbought,
                strength: (rsi - 70) as f64,
            });
        } else if rsi < 30 {
            signals.push(AdvisorySignal {
                indicator: Indicator::Rsi,
                signal: AdvisoryKind::Oversold,
                strength: (30 - rsi) as f64,
            });
        }
    }

    if let Some(histogram) = macd.and_then(|m| m.histogram) {
        if histogram > 0.0 {
            signals.push(AdvisorySignal {
                indicator: Indicator::Macd,
                signal: AdvisoryKind::BullishCrossover,
                strength: histogram,
            });
        } else if histogram < 0.0 {
            signals.push(AdvisorySignal {
                indicator: Indicator::Macd,
                signal: AdvisoryKind::BearishCrossover,
                strength: histogram.abs(),
            });
        }
    }

    if let (Some(ma20), Some(ma50)) = (averages.ma20, averages.ma50) {
        if current > ma20 && ma20 > ma50 {
            signals.push(AdvisorySignal {
                indicator: Indicator::Ma,
                signal: AdvisoryKind::UptrendConfirmed,
                strength: (current - ma50) / ma50,
            });
        } else if current < ma20 && ma20 < ma50 {
            signals.push(AdvisorySignal {
                indicator: Indicator::Ma,
                signal: AdvisoryKind::DowntrendConfirmed,
                strength: (ma50 - current) / ma50,
            });
        }
    }

    signals
}

pub struct TechnicalAnalysisEngine {
    rsi_period: usize,
}

impl TechnicalAnalysisEngine {
    pub fn new() -> Self {
        Self { rsi_period: RSI_PERIOD }
    }

    pub fn with_rsi_period(mut self, period: usize) -> Self {
        self.rsi_period = period;
        self
    }

    /// Compute every indicator the history supports. An indicator with too
    /// little history is left empty; the others are still reported.
    pub fn analyze(&self, ticker: &str, current: f64, closes: &[f64]) -> TechnicalSnapshot {
        let rsi = match rsi(closes, self.rsi_period) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("{}: RSI skipped: {}", ticker, e);
                None
            }
        };

        let macd = match macd(closes) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!("{}: MACD skipped: {}", ticker, e);
                None
            }
        };

        let moving_averages = moving_averages(closes);
        let signals = advisory_signals(current, rsi, macd.as_ref(), &moving_averages);

        TechnicalSnapshot {
            rsi,
            macd,
            moving_averages,
            signals,
        }
    }
}

impl Default for TechnicalAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
