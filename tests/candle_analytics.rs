//! Behavior-driven tests for candle analytics
//!
//! These tests verify the shape derived from raw OHLC data as a charting
//! caller would consume it.

use tinvest_core::{analyze, Candle, CandleDirection, CandleInterval, RawCandle};

fn raw(open: f64, close: f64, high: f64, low: f64, time: &str) -> RawCandle {
    let json = format!(
        r#"{{"figi":"BBG000B9XRY4","interval":"day","o":{open},"c":{close},"h":{high},"l":{low},"v":1200,"time":"{time}"}}"#
    );
    serde_json::from_str(&json).expect("raw candle must decode")
}

// =============================================================================
// Candles: Direction and Shadows
// =============================================================================

#[test]
fn rising_candle_measures_shadows_from_close_and_open() {
    // Given: A candle that closed above its open
    let candle = Candle::from_raw(&raw(10.0, 12.0, 15.0, 8.0, "2020-03-02T07:00:00Z"));

    // Then: It is up, and shadows extend beyond the body on each side
    assert_eq!(candle.direction, CandleDirection::Up);
    assert_eq!(candle.body, 2.0);
    assert_eq!(candle.upper_shadow, 3.0);
    assert_eq!(candle.lower_shadow, 2.0);
}

#[test]
fn falling_candle_measures_shadows_from_open_and_close() {
    // Given: A candle that closed below its open
    let candle = Candle::from_raw(&raw(12.0, 10.0, 15.0, 8.0, "2020-03-02T07:00:00Z"));

    // Then: It is down, with a positive body
    assert_eq!(candle.direction, CandleDirection::Down);
    assert_eq!(candle.body, 2.0);
    assert_eq!(candle.upper_shadow, 3.0);
    assert_eq!(candle.lower_shadow, 2.0);
}

#[test]
fn flat_candle_counts_as_rising() {
    // Given: A candle with no price movement
    let shape = analyze(10.0, 10.0, 10.0, 10.0);

    // Then: It is classified as up with an empty body and no shadows
    assert_eq!(shape.direction, CandleDirection::Up);
    assert_eq!(shape.body, 0.0);
    assert_eq!(shape.upper_shadow, 0.0);
    assert_eq!(shape.lower_shadow, 0.0);
}

#[test]
fn inconsistent_extremes_propagate_as_negative_shadows() {
    // Given: A candle whose reported high is below its close
    let shape = analyze(10.0, 12.0, 11.0, 8.0);

    // Then: The shadow is reported as computed, not clamped
    assert_eq!(shape.upper_shadow, -1.0);
}

// =============================================================================
// Candles: Series
// =============================================================================

#[test]
fn derived_series_keeps_count_order_and_raw_values() {
    // Given: A short daily series
    let series = vec![
        raw(10.0, 12.0, 15.0, 8.0, "2020-03-02T07:00:00Z"),
        raw(12.0, 11.0, 12.5, 10.5, "2020-03-03T07:00:00Z"),
        raw(11.0, 11.0, 11.5, 10.0, "2020-03-04T07:00:00Z"),
    ];

    // When: Each raw candle is analyzed
    let candles: Vec<Candle> = series.iter().map(Candle::from_raw).collect();

    // Then: Count and order match the input
    assert_eq!(candles.len(), series.len());
    for (candle, raw) in candles.iter().zip(&series) {
        assert_eq!(candle.time, raw.time);
        assert_eq!(candle.open, raw.o);
        assert_eq!(candle.close, raw.c);
        assert_eq!(candle.volume, raw.v);
    }

    // And: Directions follow close versus open
    let directions: Vec<CandleDirection> = candles.iter().map(|c| c.direction).collect();
    assert_eq!(
        directions,
        [CandleDirection::Up, CandleDirection::Down, CandleDirection::Up]
    );
    assert_eq!(series[0].interval, CandleInterval::Day);
}

#[test]
fn derived_candle_serializes_direction_in_snake_case() {
    let candle = Candle::from_raw(&raw(12.0, 10.0, 15.0, 8.0, "2020-03-02T07:00:00Z"));
    let json = serde_json::to_value(&candle).expect("serialize");
    assert_eq!(json["direction"], "down");
    assert_eq!(json["time"], "2020-03-02T07:00:00Z");
}
