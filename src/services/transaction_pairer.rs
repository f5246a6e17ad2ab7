//! Request/response pairing by correlation id
//!
//! Records are folded once, left to right. When several requests (or several
//! responses) share a correlation id, the last one wins.

use std::collections::HashMap;
use tracing::debug;

use crate::domain::{Direction, TrafficRecord, TransactionPair};

/// Group records into transaction pairs.
///
/// Pairs come back in the order their correlation id was first seen.
pub fn pair_transactions(records: &[TrafficRecord]) -> Vec<TransactionPair<'_>> {
    let mut pairs: Vec<TransactionPair<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.id.as_str()).or_insert_with(|| {
            pairs.push(TransactionPair::new(record.id.as_str()));
            pairs.len() - 1
        });
        let pair = &mut pairs[slot];

        let side = match record.direction {
            Direction::Request => &mut pair.request,
            Direction::Response => &mut pair.response,
        };
        if side.is_some() {
            debug!(
                correlation_id = %record.id,
                direction = ?record.direction,
                "Duplicate record for correlation id, keeping the later one"
            );
        }
        *side = Some(record);
    }

    pairs
}
