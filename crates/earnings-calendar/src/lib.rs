//! Earnings proximity: how close each ticker's next report is, and how far
//! the consensus price target sits from today's price.

use analysis_core::round2;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reports within this many days are "soon"
pub const EARNINGS_SOON_DAYS: i64 = 7;

/// A scheduled earnings report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsEvent {
    pub date: NaiveDate,
    /// Consensus EPS estimate
    pub estimate: f64,
    /// Analyst consensus price target
    pub price_target: f64,
}

/// The most recent reported quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedEarnings {
    pub date: NaiveDate,
    pub eps: f64,
    pub estimate: f64,
    /// Surprise versus estimate, in percent
    pub surprise: f64,
    pub beat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn from_days(days_until: i64) -> Self {
        if days_until <= 3 {
            Urgency::High
        } else if days_until <= EARNINGS_SOON_DAYS {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

/// Earnings proximity for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsImpact {
    pub ticker: String,
    pub earnings_date: NaiveDate,
    pub days_until: i64,
    pub estimate: f64,
    pub price_target: f64,
    pub current_price: f64,
    /// Distance from current price to the price target, in percent
    pub upside: f64,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_report: Option<ReportedEarnings>,
}

impl EarningsImpact {
    pub fn is_soon(&self) -> bool {
        self.days_until <= EARNINGS_SOON_DAYS
    }
}

/// Read-only earnings reference data, keyed by ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EarningsCalendar {
    #[serde(default)]
    pub upcoming: BTreeMap<String, EarningsEvent>,
    #[serde(default)]
    pub recent: BTreeMap<String, ReportedEarnings>,
}

impl EarningsCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, ticker: &str, event: EarningsEvent) -> Self {
        self.upcoming.insert(ticker.to_string(), event);
        self
    }

    pub fn with_report(mut self, ticker: &str, report: ReportedEarnings) -> Self {
        self.recent.insert(ticker.to_string(), report);
        self
    }

    pub fn upcoming(&self, ticker: &str) -> Option<&EarningsEvent> {
        self.upcoming.get(ticker)
    }

    /// Earnings proximity for `ticker` as of `as_of`.
    ///
    /// `None` when nothing is scheduled, including events already in the past.
    pub fn impact(&self, ticker: &str, current_price: f64, as_of: NaiveDate) -> Option<EarningsImpact> {
        let event = self.upcoming(ticker)?;

        let days_until = (event.date - as_of).num_days();
        if days_until < 0 {
            tracing::debug!("{}: earnings on {} already passed, ignoring", ticker, event.date);
            return None;
        }

        let upside = if current_price > 0.0 {
            round2((event.price_target - current_price) / current_price * 100.0)
        } else {
            0.0
        };

        Some(EarningsImpact {
            ticker: ticker.to_string(),
            earnings_date: event.date,
            days_until,
            estimate: event.estimate,
            price_target: event.price_target,
            current_price,
            upside,
            urgency: Urgency::from_days(days_until),
            last_report: self.recent.get(ticker).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> EarningsCalendar {
        EarningsCalendar::new()
            .with_event("NVDA", EarningsEvent { date: date(2026, 2, 26), estimate: 0.92, price_target: 210.0 })
            .with_event("MRVL", EarningsEvent { date: date(2026, 2, 28), estimate: 0.65, price_target: 85.0 })
            .with_report(
                "NVDA",
                ReportedEarnings { date: date(2025, 11, 19), eps: 0.91, estimate: 0.88, surprise: 3.4, beat: true },
            )
    }

    #[test]
    fn test_urgency_tiers() {
        assert_eq!(Urgency::from_days(0), Urgency::High);
        assert_eq!(Urgency::from_days(3), Urgency::High);
        assert_eq!(Urgency::from_days(4), Urgency::Medium);
        assert_eq!(Urgency::from_days(7), Urgency::Medium);
        assert_eq!(Urgency::from_days(8), Urgency::Low);
    }

    #[test]
    fn test_impact_for_scheduled_ticker() {
        let impact = calendar().impact("NVDA", 195.0, date(2026, 2, 25)).unwrap();

        assert_eq!(impact.days_until, 1);
        assert_eq!(impact.urgency, Urgency::High);
        assert_eq!(impact.upside, 7.69);
        assert_eq!(impact.estimate, 0.92);
        assert!(impact.is_soon());
        assert_eq!(impact.last_report.as_ref().map(|r| r.beat), Some(true));
    }

    #[test]
    fn test_days_until_drives_urgency() {
        let cal = calendar();
        let medium = cal.impact("MRVL", 80.0, date(2026, 2, 24)).unwrap();
        assert_eq!(medium.days_until, 4);
        assert_eq!(medium.urgency, Urgency::Medium);
        assert!(medium.last_report.is_none());

        let low = cal.impact("MRVL", 80.0, date(2026, 2, 20)).unwrap();
        assert_eq!(low.days_until, 8);
        assert_eq!(low.urgency, Urgency::Low);
        assert!(!low.is_soon());
    }

    #[test]
    fn test_negative_upside_when_above_target() {
        let impact = calendar().impact("MRVL", 100.0, date(2026, 2, 27)).unwrap();
        assert_eq!(impact.upside, -15.0);
    }

    #[test]
    fn test_missing_or_past_event_yields_none() {
        let cal = calendar();
        assert!(cal.impact("ANET", 120.0, date(2026, 2, 25)).is_none());
        assert!(cal.impact("NVDA", 195.0, date(2026, 3, 1)).is_none());
    }

    #[test]
    fn test_zero_price_has_no_upside() {
        let impact = calendar().impact("NVDA", 0.0, date(2026, 2, 25)).unwrap();
        assert_eq!(impact.upside, 0.0);
    }

    #[test]
    fn test_calendar_from_json() {
        let raw = r#"{
            "upcoming": { "PLTR": { "date": "2026-03-15", "estimate": 0.08, "priceTarget": 140 } }
        }"#;
        let cal: EarningsCalendar = serde_json::from_str(raw).unwrap();
        let event = cal.upcoming("PLTR").unwrap();
        assert_eq!(event.price_target, 140.0);
        assert!(cal.recent.is_empty());
    }
}
