use crate::models::{EnrichedEntry, YearRange};

/// Drops entries whose resolved year falls outside `range`.
///
/// Entries without a year are always kept. This is a stable filter: kept
/// entries stay in recommender order.
pub fn filter_by_year(entries: Vec<EnrichedEntry>, range: YearRange) -> Vec<EnrichedEntry> {
    entries
        .into_iter()
        .filter(|entry| entry.year().map_or(true, |year| range.contains(year)))
        .collect()
}
