use analysis_core::PrimarySignal;
use serde::{Deserialize, Serialize};

/// Moves beyond this many percentage points are actionable
const ACTION_THRESHOLD: f64 = 3.0;
/// Moves beyond this many percentage points lean one way
const TREND_THRESHOLD: f64 = 1.0;

/// Primary signal with its confidence as an integer percent (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub signal: PrimarySignal,
    pub confidence: u8,
}

/// Classify the day's change. Thresholds are strict, so a move of exactly
/// 3% is `Bullish`, not `BuySignal`.
pub fn classify_change(change_percent: f64) -> Classification {
    let (signal, confidence) = if change_percent.abs() > ACTION_THRESHOLD {
        let signal = if change_percent > 0.0 {
            PrimarySignal::BuySignal
        } else {
            PrimarySignal::SellSignal
        };
        (signal, (change_percent.abs() / 5.0).min(1.0))
    } else if change_percent > TREND_THRESHOLD {
        (PrimarySignal::Bullish, (change_percent / 2.0).min(0.8))
    } else if change_percent < -TREND_THRESHOLD {
        (PrimarySignal::Bearish, (change_percent.abs() / 2.0).min(0.8))
    } else {
        (PrimarySignal::Neutral, 0.0)
    };

    Classification {
        signal,
        confidence: (confidence * 100.0).round() as u8,
    }
}

/// Where `current` sits between the 52-week low (0) and high (100).
///
/// Zero when either bound is missing or the range is empty.
pub fn position_in_52w(current: f64, high52: Option<f64>, low52: Option<f64>) -> f64 {
    match (high52, low52) {
        (Some(high), Some(low)) if high != low => (current - low) / (high - low) * 100.0,
        _ => 0.0,
    }
}
