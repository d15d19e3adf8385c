use std::collections::BTreeMap;

use crate::error::AnalysisError;
use crate::evaluate::{ensure_enough_samples, MIN_SAMPLES};
use crate::kmeans::{KMeans, KMeansConfig, Point};
use crate::models::{ClusterRules, RuleCentroid, Sample};
use crate::scaling::ZScore;

/// Fits `k` clusters on z-scored samples and returns the centroids in
/// original units, numbered by ascending step count.
pub fn train_rules(samples: &[Sample], k: usize, config: &KMeansConfig) -> Result<ClusterRules, AnalysisError> {
    ensure_enough_samples(samples, MIN_SAMPLES.max(k))?;

    let points: Vec<Point> = samples.iter().map(Sample::as_point).collect();
    let scale = ZScore::fit(&points);
    let scaled: Vec<Point> = points.iter().map(|p| scale.apply(p)).collect();

    let model = KMeans::fit(&scaled, k, config)?;

    let mut centroids: Vec<Point> = model
        .centroids()
        .iter()
        .map(|c| scale.invert(c))
        .collect();
    centroids.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));

    let clusters: BTreeMap<u32, RuleCentroid> = centroids
        .into_iter()
        .enumerate()
        .map(|(id, c)| {
            (
                id as u32,
                RuleCentroid {
                    steps: c[0],
                    avg_hr: c[1],
                },
            )
        })
        .collect();

    Ok(ClusterRules { clusters })
}
