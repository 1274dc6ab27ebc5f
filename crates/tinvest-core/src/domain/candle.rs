use serde::{Deserialize, Serialize};

use crate::{CandleInterval, Figi, UtcDateTime};

/// Candle colour: `Up` when the close is at or above the open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleDirection {
    Up,
    Down,
}

/// Body and shadow lengths of a single candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleShape {
    pub direction: CandleDirection,
    pub body: f64,
    pub upper_shadow: f64,
    pub lower_shadow: f64,
}

/// Decompose an OHLC quadruple into direction, body and shadows.
///
/// Total over every input. `close == open` is classified as `Up` with a zero
/// body. Inputs outside `low <= {open, close} <= high` are not rejected; the
/// resulting lengths may be negative.
pub fn analyze(open: f64, close: f64, high: f64, low: f64) -> CandleShape {
    if close >= open {
        CandleShape {
            direction: CandleDirection::Up,
            body: close - open,
            upper_shadow: high - close,
            lower_shadow: open - low,
        }
    } else {
        CandleShape {
            direction: CandleDirection::Down,
            body: open - close,
            upper_shadow: high - open,
            lower_shadow: close - low,
        }
    }
}

/// Candle exactly as the price-history endpoint reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCandle {
    pub figi: Figi,
    pub interval: CandleInterval,
    pub o: f64,
    pub c: f64,
    pub h: f64,
    pub l: f64,
    pub v: f64,
    pub time: UtcDateTime,
}

/// Raw candle augmented with its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub direction: CandleDirection,
    pub body: f64,
    pub upper_shadow: f64,
    pub lower_shadow: f64,
}

impl Candle {
    pub fn from_raw(raw: &RawCandle) -> Self {
        let shape = analyze(raw.o, raw.c, raw.h, raw.l);
        Self {
            time: raw.time,
            open: raw.o,
            high: raw.h,
            low: raw.l,
            close: raw.c,
            volume: raw.v,
            direction: shape.direction,
            body: shape.body,
            upper_shadow: shape.upper_shadow,
            lower_shadow: shape.lower_shadow,
        }
    }

    pub fn shape(&self) -> CandleShape {
        CandleShape {
            direction: self.direction,
            body: self.body,
            upper_shadow: self.upper_shadow,
            lower_shadow: self.lower_shadow,
        }
    }
}

impl From<RawCandle> for Candle {
    fn from(raw: RawCandle) -> Self {
        Self::from_raw(&raw)
    }
}
