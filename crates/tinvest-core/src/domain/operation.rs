use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Figi, UtcDateTime};

/// Financially meaningful operation kinds kept by normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Buy,
    Sell,
    Dividend,
    DividendTax,
    Coupon,
    CouponTax,
}

impl OperationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Dividend => "dividend",
            Self::DividendTax => "dividend_tax",
            Self::Coupon => "coupon",
            Self::CouponTax => "coupon_tax",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation type tag as reported by the broker feed.
///
/// The upstream set is open; anything outside the known tags is kept
/// verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationType {
    Buy,
    BuyCard,
    Sell,
    Dividend,
    TaxDividend,
    Coupon,
    TaxCoupon,
    Unrecognized(String),
}

impl OperationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Buy => "Buy",
            Self::BuyCard => "BuyCard",
            Self::Sell => "Sell",
            Self::Dividend => "Dividend",
            Self::TaxDividend => "TaxDividend",
            Self::Coupon => "Coupon",
            Self::TaxCoupon => "TaxCoupon",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Normalized kind, or `None` for tags that are not financial events.
    ///
    /// Card-funded buys collapse into [`OperationKind::Buy`].
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            Self::Buy | Self::BuyCard => Some(OperationKind::Buy),
            Self::Sell => Some(OperationKind::Sell),
            Self::Dividend => Some(OperationKind::Dividend),
            Self::TaxDividend => Some(OperationKind::DividendTax),
            Self::Coupon => Some(OperationKind::Coupon),
            Self::TaxCoupon => Some(OperationKind::CouponTax),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<String> for OperationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Buy" => Self::Buy,
            "BuyCard" => Self::BuyCard,
            "Sell" => Self::Sell,
            "Dividend" => Self::Dividend,
            "TaxDividend" => Self::TaxDividend,
            "Coupon" => Self::Coupon,
            "TaxCoupon" => Self::TaxCoupon,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for OperationType {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<OperationType> for String {
    fn from(value: OperationType) -> Self {
        match value {
            OperationType::Unrecognized(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

/// Lifecycle state of a feed record. Only `Done` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationStatus {
    Done,
    Progress,
    Decline,
    Unrecognized(String),
}

impl OperationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Done => "Done",
            Self::Progress => "Progress",
            Self::Decline => "Decline",
            Self::Unrecognized(status) => status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl From<String> for OperationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Done" => Self::Done,
            "Progress" => Self::Progress,
            "Decline" => Self::Decline,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for OperationStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<OperationStatus> for String {
    fn from(value: OperationStatus) -> Self {
        match value {
            OperationStatus::Unrecognized(status) => status,
            known => known.as_str().to_owned(),
        }
    }
}

/// Signed amount with its currency, as nested in feed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyAmount {
    pub currency: String,
    pub value: f64,
}

/// One record of the broker operation feed.
///
/// Signs follow cash-flow direction; numeric fields the broker omits default
/// to zero. `date` and `figi` stay textual until normalization parses them,
/// so a blank identifier on a service entry cannot fail the batch decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOperation {
    pub id: String,
    pub status: OperationStatus,
    #[serde(default)]
    pub figi: Option<String>,
    pub operation_type: OperationType,
    pub currency: String,
    pub date: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub payment: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub quantity_executed: f64,
    #[serde(default)]
    pub commission: Option<MoneyAmount>,
    #[serde(default)]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub is_margin_call: bool,
}

/// Settled financial event after reconciliation and sign normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub figi: Figi,
    pub kind: OperationKind,
    pub time: UtcDateTime,
    /// Executed quantity, not the requested one.
    pub quantity: f64,
    pub price: f64,
    pub value: f64,
    pub commission: f64,
    pub currency: String,
}
