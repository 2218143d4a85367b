use super::*;
use analysis_core::{Direction, PriceHistory, QuoteBatch, QuoteSnapshot, SentimentLabel};
use chrono::TimeZone;
use earnings_calendar::{EarningsCalendar, EarningsEvent, Urgency};
use portfolio_manager::{Position, PositionCatalog};
use sentiment_analysis::{FallbackSentiment, KeywordSentiment, SentimentCatalog, SentimentEntry};

fn quote(ticker: &str, current: f64, change_percent: f64) -> QuoteSnapshot {
    let previous = current / (1.0 + change_percent / 100.0);
    QuoteSnapshot {
        ticker: Some(ticker.to_string()),
        current,
        previous,
        change: current - previous,
        change_percent,
        high52: Some(current * 1.2),
        low52: Some(current * 0.6),
        volume: 1_000_000,
        market_cap: None,
        timestamp: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn batch() -> QuoteBatch {
    let mut nvda = quote("NVDA", 195.0, 2.5);
    nvda.high52 = Some(212.0);
    nvda.low52 = Some(86.6);

    let stocks = [
        ("NVDA", nvda),
        ("PLTR", quote("PLTR", 134.0, 3.0)),
        ("NET", quote("NET", 185.0, 3.01)),
        ("MRVL", quote("MRVL", 70.0, -4.2)),
        ("ANET", quote("ANET", 125.0, 0.4)),
        ("VRT", quote("VRT", 240.0, -1.5)),
    ]
    .into_iter()
    .map(|(t, q)| (t.to_string(), q))
    .collect();

    QuoteBatch {
        timestamp: Utc.with_ymd_and_hms(2026, 2, 25, 21, 0, 0).unwrap(),
        stocks,
        errors: Vec::new(),
    }
}

fn positions() -> PositionCatalog {
    PositionCatalog::new()
        .with_position("NVDA", Position { shares: 100.0, avg_cost: 180.0, weight: 0.25 })
        .with_position("PLTR", Position { shares: 250.0, avg_cost: 130.0, weight: 0.18 })
        .with_position("NET", Position { shares: 75.0, avg_cost: 160.0, weight: 0.12 })
        .with_position("MRVL", Position { shares: 150.0, avg_cost: 75.0, weight: 0.10 })
        .with_position("AMD", Position { shares: 20.0, avg_cost: 150.0, weight: 0.05 })
}

fn earnings() -> EarningsCalendar {
    let event = |d, estimate, price_target| EarningsEvent { date: d, estimate, price_target };
    EarningsCalendar::new()
        .with_event("NVDA", event(date(2026, 2, 26), 0.92, 210.0))
        .with_event("PLTR", event(date(2026, 3, 4), 0.08, 140.0))
        .with_event("NET", event(date(2026, 3, 10), 0.28, 180.0))
        .with_event("MRVL", event(date(2026, 2, 28), 0.65, 85.0))
}

fn sentiment() -> SentimentCatalog {
    SentimentCatalog::new()
        .with_entry("NVDA", SentimentEntry { score: 0.45, articles: 12, label: Some(SentimentLabel::Neutral) })
        .with_entry("PLTR", SentimentEntry { score: 0.65, articles: 15, label: Some(SentimentLabel::Bullish) })
        .with_entry("NET", SentimentEntry { score: 0.78, articles: 10, label: None })
        .with_entry("MRVL", SentimentEntry { score: -0.5, articles: 6, label: None })
}

fn history() -> PriceHistory {
    let mut history = PriceHistory::new();
    history.insert("NVDA".to_string(), (0..60).map(|i| 150.0 + i as f64 * 0.7).collect());
    history.insert("VRT".to_string(), (0..10).map(|i| 230.0 + i as f64).collect());
    history
}

fn full_run(parallel: bool) -> AnalysisResult {
    let (history, earnings, positions, sentiment) = (history(), earnings(), positions(), sentiment());
    let refs = ReferenceData::new()
        .with_history(&history)
        .with_earnings(&earnings)
        .with_positions(&positions)
        .with_sentiment(&sentiment);
    ResearchAggregator::new().with_parallel(parallel).research(&batch(), &refs)
}

#[test]
fn test_every_ticker_appears_once() {
    let result = full_run(false);
    let tickers: Vec<&str> = result.stocks.keys().map(String::as_str).collect();
    assert_eq!(tickers, vec!["ANET", "MRVL", "NET", "NVDA", "PLTR", "VRT"]);

    let bucketed = result.summary.bullish.len() + result.summary.bearish.len() + result.summary.neutral.len();
    assert_eq!(bucketed, 6);
}

#[test]
fn test_signal_boundaries_through_aggregator() {
    let result = full_run(false);

    let pltr = &result.stocks["PLTR"];
    assert_eq!(pltr.signal, PrimarySignal::Bullish);
    assert_eq!(pltr.confidence, 80);

    let net = &result.stocks["NET"];
    assert_eq!(net.signal, PrimarySignal::BuySignal);
    assert_eq!(net.confidence, 60);

    let mrvl = &result.stocks["MRVL"];
    assert_eq!(mrvl.signal, PrimarySignal::SellSignal);
    assert_eq!(mrvl.confidence, 84);
}

#[test]
fn test_buckets_and_alerts() {
    let summary = full_run(false).summary;

    let bullish: Vec<(&str, &str, Option<u8>)> = summary
        .bullish
        .iter()
        .map(|e| (e.ticker.as_str(), e.reason.as_str(), e.confidence))
        .collect();
    assert_eq!(
        bullish,
        vec![
            ("NET", "3.01% up", Some(60)),
            ("NVDA", "Mild uptrend +2.5%", None),
            ("PLTR", "Mild uptrend +3%", None),
        ]
    );

    let bearish: Vec<(&str, &str)> = summary.bearish.iter().map(|e| (e.ticker.as_str(), e.reason.as_str())).collect();
    assert_eq!(bearish, vec![("MRVL", "-4.2% down"), ("VRT", "Mild downtrend -1.5%")]);
    assert_eq!(summary.bearish[0].sentiment, Some(SentimentLabel::Bearish));

    assert_eq!(summary.neutral, vec!["ANET".to_string()]);
    assert_eq!(
        summary.alerts,
        vec!["🔴 MRVL: SELL SIGNAL -4.2%".to_string(), "🟢 NET: BUY SIGNAL +3.01%".to_string()]
    );
}

#[test]
fn test_earnings_soon_within_a_week() {
    let summary = full_run(false).summary;
    let soon: Vec<(&str, i64, Urgency)> = summary
        .earnings_soon
        .iter()
        .map(|e| (e.ticker.as_str(), e.days_until, e.urgency))
        .collect();

    assert_eq!(
        soon,
        vec![("MRVL", 3, Urgency::High), ("NVDA", 1, Urgency::High), ("PLTR", 7, Urgency::Medium)]
    );
}

#[test]
fn test_as_of_override_moves_urgency() {
    let earnings = earnings();
    let refs = ReferenceData::new().with_earnings(&earnings).as_of(date(2026, 2, 20));
    let result = ResearchAggregator::new().research(&batch(), &refs);

    let nvda = result.stocks["NVDA"].earnings.as_ref().unwrap();
    assert_eq!(nvda.days_until, 6);
    assert_eq!(nvda.urgency, Urgency::Medium);
    assert!(result.stocks["ANET"].earnings.is_none());
}

#[test]
fn test_sentiment_divergence() {
    let result = full_run(false);
    let shifts: Vec<(&str, PrimarySignal, SentimentLabel)> = result
        .summary
        .sentiment_shift
        .iter()
        .map(|s| (s.ticker.as_str(), s.price_action, s.sentiment.clone()))
        .collect();

    assert_eq!(
        shifts,
        vec![
            ("MRVL", PrimarySignal::SellSignal, SentimentLabel::Bearish),
            ("NET", PrimarySignal::BuySignal, SentimentLabel::StronglyBullish),
            ("NVDA", PrimarySignal::Bullish, SentimentLabel::Neutral),
        ]
    );

    // Outside the catalog the reading is UNKNOWN rather than absent
    let vrt = result.stocks["VRT"].sentiment.as_ref().unwrap();
    assert_eq!(vrt.label, SentimentLabel::Unknown);
    assert_eq!(vrt.articles, 0);
}

#[test]
fn test_provider_label_compared_as_text() {
    let catalog = sentiment()
        .with_entry("NVDA", SentimentEntry {
            score: 0.58,
            articles: 5,
            label: Some(SentimentLabel::Other("MODERATELY_BULLISH".to_string())),
        });
    let refs = ReferenceData::new().with_sentiment(&catalog);
    let result = ResearchAggregator::new().research(&batch(), &refs);

    let shift = result
        .summary
        .sentiment_shift
        .iter()
        .find(|s| s.ticker == "NVDA")
        .unwrap();
    assert_eq!(shift.price_action, PrimarySignal::Bullish);
    assert_eq!(shift.sentiment.as_str(), "MODERATELY_BULLISH");

    let value = serde_json::to_value(&result.summary).unwrap();
    assert!(value["sentimentShift"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["sentiment"] == "MODERATELY_BULLISH"));
}

#[test]
fn test_portfolio_rollup_covers_held_tickers_only() {
    let result = full_run(false);
    let portfolio = &result.portfolio;

    let held: Vec<&str> = portfolio.positions.iter().map(|p| p.ticker.as_str()).collect();
    assert_eq!(held, vec!["MRVL", "NET", "NVDA", "PLTR"]);
    assert!(result.stocks["ANET"].portfolio.is_none());
    assert!(result.stocks["VRT"].portfolio.is_none());

    let expected: f64 = portfolio.positions.iter().map(|p| p.change_percent * p.weight).sum();
    assert!((portfolio.total_day_impact - expected).abs() < 0.002);
    let reported: f64 = portfolio.positions.iter().map(|p| p.today_impact).sum();
    assert!((portfolio.total_day_impact - reported).abs() < 1e-9);
    assert!((portfolio.total_day_impact - 1.106).abs() < 1e-9);
    assert_eq!(portfolio.direction, Direction::Up);

    let nvda = result.stocks["NVDA"].portfolio.as_ref().unwrap();
    assert_eq!(nvda.current_value, 19500.0);
    assert_eq!(nvda.gain_percent, 8.33);
    assert_eq!(nvda.status, Direction::Up);
}

#[test]
fn test_technical_only_with_history() {
    let result = full_run(false);

    let nvda = result.stocks["NVDA"].technical.as_ref().unwrap();
    assert_eq!(nvda.rsi, Some(100));
    assert!(nvda.macd.is_some());
    assert!(nvda.moving_averages.ma50.is_some());
    assert!(nvda.moving_averages.ma200.is_none());

    // Ten prices: nothing computable, but the record is still there
    let vrt = result.stocks["VRT"].technical.as_ref().unwrap();
    assert!(vrt.rsi.is_none());
    assert!(vrt.macd.is_none());
    assert!(vrt.signals.is_empty());

    assert!(result.stocks["PLTR"].technical.is_none());
}

#[test]
fn test_custom_technical_engine() {
    let history = history();
    let refs = ReferenceData::new().with_history(&history);
    let aggregator = ResearchAggregator::new()
        .with_technical_engine(TechnicalAnalysisEngine::new().with_rsi_period(5));

    let result = aggregator.research(&batch(), &refs);

    // Ten rising closes are too few for RSI-14 but enough for RSI-5
    let vrt = result.stocks["VRT"].technical.as_ref().unwrap();
    assert_eq!(vrt.rsi, Some(100));
    assert_eq!(
        aggregator.technical_engine().analyze("VRT", 240.0, &history["VRT"]),
        *vrt
    );
}

#[test]
fn test_no_reference_data() {
    let result = ResearchAggregator::new().research(&batch(), &ReferenceData::new());

    assert_eq!(result.stocks.len(), 6);
    for record in result.stocks.values() {
        assert!(record.technical.is_none());
        assert!(record.sentiment.is_none());
        assert!(record.earnings.is_none());
        assert!(record.portfolio.is_none());
    }
    assert!(result.summary.sentiment_shift.is_empty());
    assert!(result.summary.earnings_soon.is_empty());
    assert!(result.portfolio.positions.is_empty());
    assert_eq!(result.portfolio.direction, Direction::Flat);
}

#[test]
fn test_parallel_matches_sequential() {
    assert_eq!(full_run(true), full_run(false));
}

#[test]
fn test_keyword_fallback_source() {
    let keywords = KeywordSentiment::new().with_texts("VRT", ["Vertiv shares plunge after guidance cut"]);
    let source = FallbackSentiment::new(sentiment(), keywords);
    let refs = ReferenceData::new().with_sentiment(&source);
    let result = ResearchAggregator::new().research(&batch(), &refs);

    let vrt = result.stocks["VRT"].sentiment.as_ref().unwrap();
    assert_eq!(vrt.score, -1.0);
    assert_eq!(vrt.label, SentimentLabel::StronglyBearish);
    assert_eq!(result.stocks["ANET"].sentiment.as_ref().unwrap().label, SentimentLabel::Unknown);
}

#[test]
fn test_record_fields_rounded() {
    let result = full_run(false);
    let nvda = &result.stocks["NVDA"];

    assert_eq!(nvda.current, 195.0);
    assert_eq!(nvda.change_percent, 2.5);
    // (195 - 86.6) / (212 - 86.6) = 86.4%
    assert_eq!(nvda.position_in_52w, 86);
    assert_eq!(nvda.volume, 1_000_000);
}

#[test]
fn test_output_json_shape() {
    let value = serde_json::to_value(full_run(false)).unwrap();

    assert!(value["summary"]["earningsSoon"].is_array());
    assert_eq!(value["summary"]["sentimentShift"][0]["price_action"], "SELL_SIGNAL");
    assert_eq!(value["summary"]["sentimentShift"][2]["sentiment"], "NEUTRAL");
    assert_eq!(value["stocks"]["NVDA"]["positionIn52w"], 86);
    assert_eq!(value["stocks"]["NVDA"]["signal"], "BULLISH");
    assert!(value["stocks"]["ANET"]["portfolio"].is_null());
    assert!(value["portfolio"]["totalDayImpact"].is_number());
    assert_eq!(value["portfolio"]["direction"], "UP");
    assert!(value["summary"]["bullish"][1].get("confidence").is_none());
}
