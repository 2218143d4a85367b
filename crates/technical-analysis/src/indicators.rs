use analysis_core::{round2, AnalysisError};
use serde::{Deserialize, Serialize};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

fn require_period(indicator: &'static str, period: usize) -> Result<(), AnalysisError> {
    if period == 0 {
        return Err(AnalysisError::InvalidData(format!("{indicator} period must be positive")));
    }
    Ok(())
}

/// Simple Moving Average of the last `period` prices
pub fn sma(data: &[f64], period: usize) -> Result<f64, AnalysisError> {
    require_period("SMA", period)?;
    if data.len() < period {
        return Err(AnalysisError::insufficient("SMA", period, data.len()));
    }

    let window = &data[data.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average carried forward one price at a time.
///
/// Seeds with the simple average of the first `period` prices, then applies
/// `price * k + prev * (1 - k)` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct EmaState {
    period: usize,
    multiplier: f64,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl EmaState {
    pub fn new(period: usize) -> Result<Self, AnalysisError> {
        require_period("EMA", period)?;
        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seen: 0,
            value: None,
        })
    }

    /// Feed the next price; returns the EMA once the seed window is full.
    pub fn update(&mut self, price: f64) -> Option<f64> {
        self.seen += 1;
        self.value = match self.value {
            None => {
                self.seed_sum += price;
                if self.seen == self.period {
                    Some(self.seed_sum / self.period as f64)
                } else {
                    None
                }
            }
            Some(prev) => Some(price * self.multiplier + prev * (1.0 - self.multiplier)),
        };
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Exponential Moving Average over the whole series (final value)
pub fn ema(data: &[f64], period: usize) -> Result<f64, AnalysisError> {
    let mut state = EmaState::new(period)?;
    for &price in data {
        state.update(price);
    }
    state
        .value()
        .ok_or_else(|| AnalysisError::insufficient("EMA", period, data.len()))
}

/// Relative Strength Index from simple averages of the last `period` moves.
///
/// A window with no losses reads 100, or 50 when it had no gains either.
pub fn rsi(data: &[f64], period: usize) -> Result<u32, AnalysisError> {
    require_period("RSI", period)?;
    if data.len() < period + 1 {
        return Err(AnalysisError::insufficient("RSI", period + 1, data.len()));
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    // Most recent move first
    for pair in data[data.len() - period - 1..].windows(2).rev() {
        let diff = pair[1] - pair[0];
        if diff > 0.0 {
            gains += diff;
        } else {
            losses += diff.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    let rsi = if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            50.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };

    Ok(rsi.round() as u32)
}

/// MACD (Moving Average Convergence Divergence), rounded to cents.
///
/// `signal` and `histogram` stay empty until the MACD series has at least
/// `MACD_SIGNAL` points, i.e. for histories shorter than 35 prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

pub fn macd(data: &[f64]) -> Result<MacdResult, AnalysisError> {
    if data.len() < MACD_SLOW {
        return Err(AnalysisError::insufficient("MACD", MACD_SLOW, data.len()));
    }

    let mut fast = EmaState::new(MACD_FAST)?;
    let mut slow = EmaState::new(MACD_SLOW)?;
    let mut signal = EmaState::new(MACD_SIGNAL)?;
    let mut macd_line = 0.0;

    // One pass: the running EMAs at index i equal EMAs recomputed on data[..=i].
    // The MACD series feeding the signal line starts one index after the slow seed.
    for (i, &price) in data.iter().enumerate() {
        let fast_value = fast.update(price);
        let slow_value = slow.update(price);
        if let (Some(f), Some(s)) = (fast_value, slow_value) {
            macd_line = f - s;
            if i >= MACD_SLOW {
                signal.update(macd_line);
            }
        }
    }

    let signal_line = signal.value();
    Ok(MacdResult {
        macd: round2(macd_line),
        signal: signal_line.map(round2),
        histogram: signal_line.map(|s| round2(macd_line - s)),
    })
}

/// MA20 / MA50 / MA200 bundle; each is absent when history is too short
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub ma20: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
}

pub fn moving_averages(data: &[f64]) -> MovingAverages {
    let rounded = |period| sma(data, period).ok().map(round2);
    MovingAverages {
        ma20: rounded(20),
        ma50: rounded(50),
        ma200: rounded(200),
    }
}
