//! aggregation of solved routes into per-segment facility counts.
use crate::model::analysis::ClosestFacilityError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// number of route records found for one incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentSummary {
    pub incident_id: usize,
    pub count: u64,
}

/// facility count for one row of the road network table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentCount {
    pub segment: String,
    pub count: u64,
}

/// counts route records per incident, ordered by incident id. incidents
/// without routes do not appear.
pub fn count_by_incident<I>(incident_ids: I) -> Vec<IncidentSummary>
where
    I: IntoIterator<Item = usize>,
{
    incident_ids
        .into_iter()
        .counts()
        .into_iter()
        .map(|(incident_id, count)| IncidentSummary {
            incident_id,
            count: count as u64,
        })
        .sorted_by_key(|s| s.incident_id)
        .collect_vec()
}

/// joins incident summaries onto the road network table by position: incident
/// id `k` belongs to row `k - 1`. every row produces exactly one output row,
/// with a count of zero when no summary refers to it.
///
/// # Arguments
///
/// * `segment_ids` - segment identifiers in network table order
/// * `summaries` - route counts by incident id
///
/// # Returns
///
/// the counts in network table order, or an error if a summary refers to an
/// incident id outside `1..=segment_ids.len()`.
pub fn join_positional(
    segment_ids: &[String],
    summaries: &[IncidentSummary],
) -> Result<Vec<SegmentCount>, ClosestFacilityError> {
    let mut counts = vec![0u64; segment_ids.len()];
    for summary in summaries.iter() {
        let row = summary
            .incident_id
            .checked_sub(1)
            .filter(|row| *row < segment_ids.len())
            .ok_or(ClosestFacilityError::UnmatchedIncident {
                incident_id: summary.incident_id,
                n_rows: segment_ids.len(),
            })?;
        counts[row] += summary.count;
    }
    let result = segment_ids
        .iter()
        .zip(counts)
        .map(|(segment, count)| SegmentCount {
            segment: segment.clone(),
            count,
        })
        .collect_vec();
    Ok(result)
}
