use analysis_core::Direction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A held position from the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub shares: f64,
    pub avg_cost: f64,
    /// Target allocation as a fraction of the portfolio (0.25 = 25%)
    pub weight: f64,
}

/// Read-only position catalog keyed by ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionCatalog {
    positions: BTreeMap<String, Position>,
}

impl PositionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, ticker: &str, position: Position) -> Self {
        self.positions.insert(ticker.to_string(), position);
        self
    }

    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of all target weights; a full allocation sums to 1.0
    pub fn total_weight(&self) -> f64 {
        self.positions.values().map(|p| p.weight).sum()
    }
}

/// Financial impact of today's move on one held position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionImpact {
    pub ticker: String,
    pub shares: f64,
    pub avg_cost: f64,
    pub current_price: f64,
    pub current_value: f64,
    pub cost_basis: f64,
    pub gain: f64,
    pub gain_percent: f64,
    pub weight: f64,
    pub change_percent: f64,
    /// Portfolio-level move contributed by this position, in percentage points
    pub today_impact: f64,
    pub status: Direction,
}

/// Portfolio rollup over every position present in the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRollup {
    pub positions: Vec<PositionImpact>,
    pub total_day_impact: f64,
    pub total_value: f64,
    pub total_cost_basis: f64,
    pub total_gain: f64,
    pub total_gain_percent: f64,
    pub direction: Direction,
}
