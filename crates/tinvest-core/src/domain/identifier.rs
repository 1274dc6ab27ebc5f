use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 16;
const MAX_FIGI_LEN: usize = 12;
const FIGI_PREFIX: &str = "BBG";

/// Broker-assigned instrument identifier (FIGI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Figi(String);

impl Figi {
    /// Parse and normalize an identifier to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyFigi);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let valid = normalized.len() <= MAX_FIGI_LEN
            && normalized.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !valid {
            return Err(ValidationError::InvalidFigi {
                value: input.to_owned(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a compile-time constant already known to be a valid identifier.
    pub(crate) fn from_trusted(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Whether the token has the full 12-character `BBG…` shape.
    fn looks_canonical(value: &str) -> bool {
        value.len() == MAX_FIGI_LEN && value.to_ascii_uppercase().starts_with(FIGI_PREFIX)
    }
}

impl Display for Figi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Figi {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Figi> for String {
    fn from(value: Figi) -> Self {
        value.0
    }
}

/// Human-facing exchange ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalize a ticker to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::TickerTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphabetic() {
                return Err(ValidationError::TickerInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | '@');
            if !valid {
                return Err(ValidationError::TickerInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

/// Caller-supplied reference to an instrument, either by identifier or by ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstrumentRef {
    Figi(Figi),
    Ticker(Ticker),
}

impl InstrumentRef {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if Figi::looks_canonical(trimmed) {
            return Figi::parse(trimmed).map(Self::Figi);
        }
        Ticker::parse(trimmed).map(Self::Ticker)
    }
}

impl FromStr for InstrumentRef {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl From<Figi> for InstrumentRef {
    fn from(value: Figi) -> Self {
        Self::Figi(value)
    }
}

impl From<Ticker> for InstrumentRef {
    fn from(value: Ticker) -> Self {
        Self::Ticker(value)
    }
}

impl Display for InstrumentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Figi(figi) => Display::fmt(figi, f),
            Self::Ticker(ticker) => Display::fmt(ticker, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_ticker() {
        let parsed = Ticker::parse(" tcsg ").expect("ticker should parse");
        assert_eq!(parsed.as_str(), "TCSG");
    }

    #[test]
    fn rejects_ticker_with_invalid_start() {
        let err = Ticker::parse("1TCS").expect_err("must fail");
        assert!(matches!(err, ValidationError::TickerInvalidStart { .. }));
    }

    #[test]
    fn rejects_figi_with_punctuation() {
        let err = Figi::parse("BBG-05DXJS36").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidFigi { .. }));
    }

    #[test]
    fn instrument_ref_distinguishes_figi_from_ticker() {
        assert!(matches!(
            InstrumentRef::parse("bbg005dxjs36").expect("figi"),
            InstrumentRef::Figi(figi) if figi.as_str() == "BBG005DXJS36"
        ));
        assert!(matches!(
            InstrumentRef::parse("AAPL").expect("ticker"),
            InstrumentRef::Ticker(ticker) if ticker.as_str() == "AAPL"
        ));
    }
}
