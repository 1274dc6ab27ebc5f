//! # Domain Models
//!
//! Canonical types for the broker API.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Figi`] | Broker instrument identifier |
//! | [`Ticker`] | Human-facing exchange ticker |
//! | [`InstrumentRef`] | Either of the above, as supplied by callers |
//! | [`UtcDateTime`] | RFC3339 timestamp normalized to UTC |
//! | [`CandleInterval`] | Price-history bucket size |
//! | [`RawCandle`] / [`Candle`] | OHLCV record and its derived shape |
//! | [`RawOperation`] / [`Operation`] | Feed record and its normalized form |
//! | [`Account`], [`Instrument`], [`Position`], [`Order`] | Account and trading records |
//!
//! Identifier and interval types validate on construction; feed records are
//! decoded leniently and validated by the normalizer.

mod candle;
mod identifier;
mod interval;
mod models;
mod operation;
mod timestamp;

pub use candle::{analyze, Candle, CandleDirection, CandleShape, RawCandle};
pub use identifier::{Figi, InstrumentRef, Ticker};
pub use interval::CandleInterval;
pub(crate) use models::validate_positive;
pub use models::{
    validate_currency_code, Account, Instrument, InstrumentType, Order, OrderSide, OrderType,
    PlacedOrder, Position,
};
pub use operation::{
    MoneyAmount, Operation, OperationKind, OperationStatus, OperationType, RawOperation,
};
pub use timestamp::{TimeRange, UtcDateTime};
