use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// RFC3339 timestamp normalized to UTC.
///
/// The broker reports times in exchange-local offsets (`+03:00`); parsing
/// accepts any offset and stores the same instant in UTC so ordering and
/// equality are instant-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parsed = OffsetDateTime::parse(input.trim(), &Rfc3339).map_err(|_| {
            ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            }
        })?;

        Ok(Self::from_offset_datetime(parsed))
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        // A UTC OffsetDateTime within the parseable year range always formats.
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Half-open `[from, to)` query window.
///
/// Equal bounds are accepted and select nothing; only `from > to` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: UtcDateTime,
    pub to: UtcDateTime,
}

impl TimeRange {
    pub fn new(from: UtcDateTime, to: UtcDateTime) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvalidTimeRange {
                from: from.format_rfc3339(),
                to: to.format_rfc3339(),
            });
        }
        Ok(Self { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_timestamp() {
        let parsed = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn converts_offset_timestamp_to_utc() {
        let parsed = UtcDateTime::parse("2020-03-02T10:00:00+03:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2020-03-02T07:00:00Z");
    }

    #[test]
    fn rejects_timestamp_without_offset() {
        let err = UtcDateTime::parse("2024-01-01 10:00").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn rejects_inverted_range() {
        let from = UtcDateTime::parse("2024-02-01T00:00:00Z").expect("from");
        let to = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("to");
        assert!(matches!(
            TimeRange::new(from, to),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn accepts_empty_range() {
        let at = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("at");
        let range = TimeRange::new(at, at).expect("equal bounds are allowed");
        assert_eq!(range.from, range.to);
    }
}
