use crate::ingest::DailyTable;
use crate::models::Sample;

/// Inner-joins step totals with average heart rates on (user, date).
///
/// Samples follow the step table's key order; days missing from either
/// side are dropped.
pub fn build_samples(steps: &DailyTable, heart_rate: &DailyTable) -> Vec<Sample> {
    steps
        .iter()
        .filter_map(|(key, total_steps)| {
            heart_rate
                .get(key)
                .map(|avg_hr| Sample::new(total_steps, avg_hr))
        })
        .collect()
}
