//! Operation feed normalization.
//!
//! Per record, in order: parse the timestamp, reclassify the identifier,
//! apply the caller's identifier filter, keep recognized kinds only, keep
//! terminal (`Done`) records only, then map signed amounts to absolute
//! values. Any malformed record fails the whole batch.

use crate::resolver::IdentityResolver;
use crate::{Figi, Operation, RawOperation, UtcDateTime, ValidationError};

/// Counts of records dropped at each filtering step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub received: usize,
    pub filtered_by_instrument: usize,
    pub unrecognized_kind: usize,
    pub not_settled: usize,
    pub kept: usize,
}

/// Normalize a feed batch against an optional identifier filter.
///
/// Output preserves feed order; see [`crate::sequencer::sort`].
pub fn normalize(
    raw: &[RawOperation],
    filter: Option<&Figi>,
    resolver: &IdentityResolver,
) -> Result<Vec<Operation>, ValidationError> {
    normalize_with_stats(raw, filter, resolver).map(|(operations, _)| operations)
}

/// [`normalize`], also reporting how many records each step dropped.
pub fn normalize_with_stats(
    raw: &[RawOperation],
    filter: Option<&Figi>,
    resolver: &IdentityResolver,
) -> Result<(Vec<Operation>, NormalizeStats), ValidationError> {
    let mut stats = NormalizeStats {
        received: raw.len(),
        ..NormalizeStats::default()
    };
    let mut operations = Vec::with_capacity(raw.len());

    for record in raw {
        let time = UtcDateTime::parse(&record.date).map_err(|_| {
            ValidationError::MalformedTimestamp {
                id: record.id.clone(),
                value: record.date.clone(),
            }
        })?;

        // Blank counts as absent; an invalid value only matters if the record is kept.
        let figi = record
            .figi
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                Figi::parse(raw)
                    .map(|figi| resolver.reclassify(&figi, &record.currency))
                    .map_err(|_| raw)
            });

        if filter.is_some() {
            let keep = matches!(
                &figi,
                Some(Ok(figi)) if IdentityResolver::matches(filter, figi)
            );
            if !keep {
                stats.filtered_by_instrument += 1;
                continue;
            }
        }

        let Some(kind) = record.operation_type.kind() else {
            stats.unrecognized_kind += 1;
            continue;
        };

        if !record.status.is_terminal() {
            stats.not_settled += 1;
            continue;
        }

        let figi = match figi {
            Some(Ok(figi)) => figi,
            Some(Err(raw)) => {
                return Err(ValidationError::MalformedFigi {
                    id: record.id.clone(),
                    value: raw.to_owned(),
                })
            }
            None => {
                return Err(ValidationError::MissingField {
                    id: record.id.clone(),
                    field: "figi",
                })
            }
        };

        operations.push(Operation {
            id: record.id.clone(),
            figi,
            kind,
            time,
            quantity: record.quantity_executed,
            price: record.price.abs(),
            value: record.payment.abs(),
            commission: record
                .commission
                .as_ref()
                .map_or(0.0, |commission| commission.value.abs()),
            currency: record.currency.trim().to_ascii_uppercase(),
        });
    }

    stats.kept = operations.len();
    Ok((operations, stats))
}
