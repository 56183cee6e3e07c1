// src/routing.rs
use ordered_float::OrderedFloat;

use crate::types::EffectivePriceRecord;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    #[error("no route records to choose from")]
    EmptyInput,
}

/// Cheapest record by effective price. Ties go to the record that appears
/// first in the input; the pick is deterministic for a given input order.
pub fn select_best(
    records: &[EffectivePriceRecord],
) -> Result<&EffectivePriceRecord, OptimizeError> {
    let mut best = records.first().ok_or(OptimizeError::EmptyInput)?;
    for record in &records[1..] {
        if record.effective_price < best.effective_price {
            best = record;
        }
    }
    Ok(best)
}

/// All records cheapest-first. The sort is stable, so equal prices keep
/// their input order and the head of the ranking matches [`select_best`].
pub fn rank(records: &[EffectivePriceRecord]) -> Vec<&EffectivePriceRecord> {
    let mut ranked: Vec<&EffectivePriceRecord> = records.iter().collect();
    ranked.sort_by_key(|r| OrderedFloat(r.effective_price));
    ranked
}
