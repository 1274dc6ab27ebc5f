//! Instrument identity reconciliation for dual-listed instruments.
//!
//! Some instruments trade under two identifiers depending on the settlement
//! venue. The operation-history endpoint only indexes the `base` identifier
//! and reports every trade under it; the record currency is the only signal
//! separating the two listings.
//!
//! ```rust
//! use tinvest_core::{Figi, IdentityResolver};
//!
//! let resolver = IdentityResolver::default();
//! let tcs = Figi::parse("BBG005DXJS36").unwrap();
//! let tcsg = Figi::parse("BBG00QPYJ5H0").unwrap();
//!
//! assert_eq!(resolver.outbound(&tcsg), tcs);
//! assert_eq!(resolver.reclassify(&tcs, "RUB"), tcsg);
//! assert_eq!(resolver.reclassify(&tcs, "USD"), tcs);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{validate_currency_code, Figi, ValidationError};

const TCS_FIGI: &str = "BBG005DXJS36";
const TCSG_FIGI: &str = "BBG00QPYJ5H0";
const TCSG_CURRENCY: &str = "RUB";

/// One dual listing: records under `base` settled in `currency` belong to `alternate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualListing {
    pub base: Figi,
    pub alternate: Figi,
    pub currency: String,
}

impl DualListing {
    pub fn new(
        base: Figi,
        alternate: Figi,
        currency: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        if base == alternate {
            return Err(ValidationError::SelfReferentialListing {
                figi: base.to_string(),
            });
        }

        Ok(Self {
            base,
            alternate,
            currency: validate_currency_code(currency.as_ref())?,
        })
    }
}

/// Immutable table of dual listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityResolver {
    listings: Vec<DualListing>,
}

impl Default for IdentityResolver {
    /// Table with the TCS (USD, base) / TCSG (RUB, alternate) pair.
    fn default() -> Self {
        Self {
            listings: vec![DualListing {
                base: Figi::from_trusted(TCS_FIGI),
                alternate: Figi::from_trusted(TCSG_FIGI),
                currency: String::from(TCSG_CURRENCY),
            }],
        }
    }
}

impl IdentityResolver {
    pub fn new(listings: Vec<DualListing>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(listings.len());
        for listing in listings {
            let listing = DualListing::new(listing.base, listing.alternate, &listing.currency)?;
            for figi in [&listing.base, &listing.alternate] {
                if !seen.insert(figi.clone()) {
                    return Err(ValidationError::DuplicateListing {
                        figi: figi.to_string(),
                    });
                }
            }
            validated.push(listing);
        }

        Ok(Self {
            listings: validated,
        })
    }

    /// Resolver that never rewrites identifiers.
    pub fn empty() -> Self {
        Self {
            listings: Vec::new(),
        }
    }

    /// Parse a JSON array of `{ "base", "alternate", "currency" }` entries.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let listings: Vec<DualListing> = serde_json::from_str(input)?;
        Ok(Self::new(listings)?)
    }

    pub fn listings(&self) -> &[DualListing] {
        &self.listings
    }

    /// Identifier to send upstream: an alternate listing is queried under its base.
    pub fn outbound(&self, figi: &Figi) -> Figi {
        self.listings
            .iter()
            .find(|listing| &listing.alternate == figi)
            .map_or_else(|| figi.clone(), |listing| listing.base.clone())
    }

    /// Identifier a feed record actually belongs to, given its settlement currency.
    pub fn reclassify(&self, figi: &Figi, currency: &str) -> Figi {
        self.listings
            .iter()
            .find(|listing| {
                &listing.base == figi && listing.currency.eq_ignore_ascii_case(currency.trim())
            })
            .map_or_else(|| figi.clone(), |listing| listing.alternate.clone())
    }

    /// Whether a reclassified identifier passes the caller's filter.
    pub fn matches(filter: Option<&Figi>, reclassified: &Figi) -> bool {
        filter.map_or(true, |wanted| wanted == reclassified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figi(value: &str) -> Figi {
        Figi::parse(value).expect("valid figi")
    }

    #[test]
    fn default_table_carries_tcs_pair() {
        let resolver = IdentityResolver::default();
        assert_eq!(resolver.listings().len(), 1);
        assert_eq!(resolver.listings()[0].base, figi(TCS_FIGI));
        assert_eq!(resolver.listings()[0].alternate, figi(TCSG_FIGI));
    }

    #[test]
    fn outbound_only_rewrites_alternates() {
        let resolver = IdentityResolver::default();
        assert_eq!(resolver.outbound(&figi(TCSG_FIGI)), figi(TCS_FIGI));
        assert_eq!(resolver.outbound(&figi(TCS_FIGI)), figi(TCS_FIGI));
        assert_eq!(resolver.outbound(&figi("BBG000B9XRY4")), figi("BBG000B9XRY4"));
    }

    #[test]
    fn reclassification_is_idempotent() {
        let resolver = IdentityResolver::default();
        let once = resolver.reclassify(&figi(TCS_FIGI), "rub");
        let twice = resolver.reclassify(&once, "rub");
        assert_eq!(once, figi(TCSG_FIGI));
        assert_eq!(twice, once);
    }

    #[test]
    fn filter_is_exact_after_reclassification() {
        let tcs = figi(TCS_FIGI);
        let tcsg = figi(TCSG_FIGI);
        assert!(IdentityResolver::matches(Some(&tcsg), &tcsg));
        assert!(!IdentityResolver::matches(Some(&tcsg), &tcs));
        assert!(!IdentityResolver::matches(Some(&tcs), &tcsg));
        assert!(IdentityResolver::matches(None, &tcs));
    }

    #[test]
    fn rejects_identifier_shared_between_listings() {
        let first = DualListing::new(figi("BBG000000001"), figi("BBG000000002"), "RUB")
            .expect("listing");
        let second = DualListing::new(figi("BBG000000002"), figi("BBG000000003"), "USD")
            .expect("listing");
        let err = IdentityResolver::new(vec![first, second]).expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateListing { .. }));
    }

    #[test]
    fn rejects_self_referential_listing() {
        let err = DualListing::new(figi(TCS_FIGI), figi(TCS_FIGI), "RUB").expect_err("must fail");
        assert!(matches!(err, ValidationError::SelfReferentialListing { .. }));
    }

    #[test]
    fn loads_table_from_json() {
        let resolver = IdentityResolver::from_json(
            r#"[{"base":"BBG000000001","alternate":"BBG000000002","currency":"eur"}]"#,
        )
        .expect("table must load");
        assert_eq!(
            resolver.reclassify(&figi("BBG000000001"), "EUR"),
            figi("BBG000000002")
        );
    }
}
