use crate::models::*;
use analysis_core::{round2, round_to, Direction};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Value, gain and weighted day impact for one position at `current_price`
pub fn position_impact(
    ticker: &str,
    position: &Position,
    current_price: f64,
    change_percent: f64,
) -> PositionImpact {
    let current_value = position.shares * current_price;
    let cost_basis = position.shares * position.avg_cost;
    let gain = current_value - cost_basis;
    let gain_percent = if cost_basis != 0.0 {
        round2(gain / cost_basis * 100.0)
    } else {
        0.0
    };

    PositionImpact {
        ticker: ticker.to_string(),
        shares: position.shares,
        avg_cost: position.avg_cost,
        current_price,
        current_value: round2(current_value),
        cost_basis: round2(cost_basis),
        gain: round2(gain),
        gain_percent,
        weight: position.weight,
        change_percent,
        today_impact: round_to(change_percent * position.weight, 3),
        status: Direction::from_value(gain_percent),
    }
}

impl PositionCatalog {
    /// Impact for `ticker`, or `None` when the portfolio does not hold it
    pub fn impact(&self, ticker: &str, current_price: f64, change_percent: f64) -> Option<PositionImpact> {
        self.get(ticker)
            .map(|position| position_impact(ticker, position, current_price, change_percent))
    }
}

/// Aggregate position impacts. Totals are summed in `Decimal` from the
/// reported (rounded) per-position figures so they reconcile exactly.
pub fn rollup<I>(impacts: I) -> PortfolioRollup
where
    I: IntoIterator<Item = PositionImpact>,
{
    let positions: Vec<PositionImpact> = impacts.into_iter().collect();

    let mut total_day_impact = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;
    let mut total_gain = Decimal::ZERO;
    for p in &positions {
        total_day_impact += to_decimal(p.today_impact);
        total_value += to_decimal(p.current_value);
        total_cost += to_decimal(p.cost_basis);
        total_gain += to_decimal(p.gain);
    }

    let total_gain_percent = if total_cost > Decimal::ZERO {
        ((total_gain / total_cost) * Decimal::from(100))
            .round_dp(2)
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let total_day_impact = total_day_impact.round_dp(3).to_f64().unwrap_or(0.0);

    PortfolioRollup {
        positions,
        total_day_impact,
        total_value: total_value.round_dp(2).to_f64().unwrap_or(0.0),
        total_cost_basis: total_cost.round_dp(2).to_f64().unwrap_or(0.0),
        total_gain: total_gain.round_dp(2).to_f64().unwrap_or(0.0),
        total_gain_percent,
        direction: Direction::from_value(total_day_impact),
    }
}
