use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Figi, Ticker, ValidationError};

/// Brokerage account the client can scope requests to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// Account type as reported by the broker (`Tinkoff`, `TinkoffIis`, ...).
    pub kind: String,
}

/// Instrument class as reported by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstrumentType {
    Currency,
    Stock,
    Bond,
    Etf,
    Unrecognized(String),
}

impl InstrumentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Currency => "Currency",
            Self::Stock => "Stock",
            Self::Bond => "Bond",
            Self::Etf => "Etf",
            Self::Unrecognized(value) => value,
        }
    }
}

impl From<String> for InstrumentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Currency" => Self::Currency,
            "Stock" => Self::Stock,
            "Bond" => Self::Bond,
            "Etf" => Self::Etf,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<InstrumentType> for String {
    fn from(value: InstrumentType) -> Self {
        match value {
            InstrumentType::Unrecognized(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

/// Catalog entry for a tradable instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub figi: Figi,
    pub ticker: Ticker,
    pub isin: Option<String>,
    pub name: String,
    pub instrument_type: InstrumentType,
    pub currency: Option<String>,
    pub lot: u32,
    pub min_price_increment: Option<f64>,
}

/// Portfolio holding with the broker-supplied average price and expected yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub figi: Figi,
    pub ticker: Option<Ticker>,
    pub name: String,
    pub instrument_type: InstrumentType,
    pub balance: f64,
    pub blocked: f64,
    pub lots: i64,
    pub currency: Option<String>,
    pub average_price: Option<f64>,
    pub expected_yield: Option<f64>,
}

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }
}

impl Display for OrderSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order execution style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[serde(alias = "Limit")]
    Limit,
    #[serde(alias = "Market")]
    Market,
}

impl OrderType {
    /// Path segment of the order placement endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::Market => "market",
        }
    }
}

/// Active order as listed by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub figi: Figi,
    pub order_type: OrderType,
    pub side: OrderSide,
    pub price: f64,
    pub status: String,
    pub requested_lots: u32,
    pub executed_lots: u32,
}

/// Broker acknowledgement for a newly placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: String,
    pub side: OrderSide,
    pub status: String,
    pub reject_reason: Option<String>,
    pub requested_lots: u32,
    pub executed_lots: u32,
}

/// Validate and normalize currency to uppercase 3-letter code.
pub fn validate_currency_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidCurrency {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}

pub(crate) fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
