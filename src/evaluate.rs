use std::ops::RangeInclusive;

use crate::error::AnalysisError;
use crate::kmeans::{silhouette_score, KMeans, KMeansConfig, Point};
use crate::models::{ClusterScore, EvaluationReport, Sample};

/// Fewer samples than this make silhouette scores meaningless.
pub const MIN_SAMPLES: usize = 3;

pub const K_RANGE: RangeInclusive<usize> = 2..=5;

pub fn ensure_enough_samples(samples: &[Sample], required: usize) -> Result<(), AnalysisError> {
    if samples.len() < required {
        return Err(AnalysisError::InsufficientSamples {
            found: samples.len(),
            required,
        });
    }
    Ok(())
}

/// Fits one model per k in [`K_RANGE`] on raw (steps, avg heart rate) points
/// and scores each fit. A k above the sample count is listed in `skipped_k`.
pub fn evaluate(samples: &[Sample], config: &KMeansConfig) -> Result<EvaluationReport, AnalysisError> {
    ensure_enough_samples(samples, MIN_SAMPLES)?;

    let points: Vec<Point> = samples.iter().map(Sample::as_point).collect();
    let mut scores = Vec::new();
    let mut skipped_k = Vec::new();

    for k in K_RANGE {
        if k > points.len() {
            skipped_k.push(k);
            continue;
        }

        let model = KMeans::fit(&points, k, config)?;
        scores.push(ClusterScore {
            k,
            inertia: model.inertia(),
            silhouette: silhouette_score(&points, model.labels()),
        });
    }

    Ok(EvaluationReport {
        samples: samples.len(),
        scores,
        skipped_k,
    })
}
