//! Upstream JSON payloads and their conversion into domain records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{
    Account, Figi, Instrument, InstrumentType, MoneyAmount, Order, OrderSide, OrderType,
    PlacedOrder, Position, RawCandle, RawOperation, Ticker,
};

pub(crate) const STATUS_ERROR: &str = "Error";

/// `{ trackingId, status, payload }` wrapper around every response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope {
    #[serde(default)]
    pub tracking_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountsPayload {
    pub accounts: Vec<WireAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireAccount {
    pub broker_account_type: String,
    pub broker_account_id: String,
}

impl From<WireAccount> for Account {
    fn from(value: WireAccount) -> Self {
        Self {
            id: value.broker_account_id,
            kind: value.broker_account_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstrumentsPayload {
    pub instruments: Vec<WireInstrument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireInstrument {
    pub figi: Figi,
    pub ticker: String,
    #[serde(default)]
    pub isin: Option<String>,
    #[serde(default)]
    pub min_price_increment: Option<f64>,
    #[serde(default)]
    pub lot: u32,
    #[serde(default)]
    pub currency: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub instrument_type: InstrumentType,
}

impl WireInstrument {
    /// Catalog entries with tickers outside the accepted shape are skipped.
    pub fn into_instrument(self) -> Option<Instrument> {
        let ticker = match Ticker::parse(&self.ticker) {
            Ok(ticker) => ticker,
            Err(error) => {
                warn!(figi = %self.figi, ticker = %self.ticker, %error, "skipping instrument");
                return None;
            }
        };

        Some(Instrument {
            figi: self.figi,
            ticker,
            isin: self.isin,
            name: self.name,
            instrument_type: self.instrument_type,
            currency: self.currency,
            lot: self.lot,
            min_price_increment: self.min_price_increment,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandlesPayload {
    #[serde(default)]
    pub candles: Vec<RawCandle>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PortfolioPayload {
    pub positions: Vec<WirePosition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePosition {
    pub figi: Figi,
    #[serde(default)]
    pub ticker: Option<String>,
    pub instrument_type: InstrumentType,
    pub balance: f64,
    #[serde(default)]
    pub blocked: f64,
    #[serde(default)]
    pub expected_yield: Option<MoneyAmount>,
    pub lots: i64,
    #[serde(default)]
    pub average_position_price: Option<MoneyAmount>,
    pub name: String,
}

impl From<WirePosition> for Position {
    fn from(value: WirePosition) -> Self {
        let currency = value
            .average_position_price
            .as_ref()
            .map(|price| price.currency.clone());
        Self {
            figi: value.figi,
            ticker: value
                .ticker
                .as_deref()
                .and_then(|ticker| Ticker::parse(ticker).ok()),
            name: value.name,
            instrument_type: value.instrument_type,
            balance: value.balance,
            blocked: value.blocked,
            lots: value.lots,
            currency,
            average_price: value.average_position_price.map(|price| price.value),
            expected_yield: value.expected_yield.map(|yield_| yield_.value),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationsPayload {
    pub operations: Vec<RawOperation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrder {
    pub order_id: String,
    pub figi: Figi,
    pub operation: OrderSide,
    pub status: String,
    pub requested_lots: u32,
    pub executed_lots: u32,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub price: f64,
}

impl From<WireOrder> for Order {
    fn from(value: WireOrder) -> Self {
        Self {
            id: value.order_id,
            figi: value.figi,
            order_type: value.order_type,
            side: value.operation,
            price: value.price,
            status: value.status,
            requested_lots: value.requested_lots,
            executed_lots: value.executed_lots,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderBody {
    pub operation: OrderSide,
    pub lots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePlacedOrder {
    pub order_id: String,
    pub operation: OrderSide,
    pub status: String,
    #[serde(default)]
    pub reject_reason: Option<String>,
    pub requested_lots: u32,
    pub executed_lots: u32,
}

impl From<WirePlacedOrder> for PlacedOrder {
    fn from(value: WirePlacedOrder) -> Self {
        Self {
            id: value.order_id,
            side: value.operation,
            status: value.status,
            reject_reason: value.reject_reason,
            requested_lots: value.requested_lots,
            executed_lots: value.executed_lots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_order_list_entry() {
        let order: WireOrder = serde_json::from_str(
            r#"{"orderId":"42","figi":"BBG000B9XRY4","operation":"Buy","status":"New",
                "requestedLots":2,"executedLots":0,"type":"Limit","price":100.5}"#,
        )
        .expect("order must decode");
        let order = Order::from(order);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.side, OrderSide::Buy);
    }

    #[test]
    fn market_order_body_omits_price() {
        let body = OrderBody {
            operation: OrderSide::Sell,
            lots: 3,
            price: None,
        };
        assert_eq!(
            serde_json::to_string(&body).expect("serialize"),
            r#"{"operation":"Sell","lots":3}"#
        );
    }

    #[test]
    fn instrument_with_unusable_ticker_is_skipped() {
        let wire: WireInstrument = serde_json::from_str(
            r#"{"figi":"BBG000000001","ticker":"1ABC","lot":1,"name":"Odd","type":"Stock"}"#,
        )
        .expect("instrument must decode");
        assert!(wire.into_instrument().is_none());
    }
}
