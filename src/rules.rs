use std::path::Path;

use anyhow::Context;

use crate::error::AnalysisError;
use crate::kmeans::{distance_sq, Point};
use crate::models::ClusterRules;
use crate::scaling::ZScore;

impl ClusterRules {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid cluster rules in {}", path.display()))
    }

    /// Id of the centroid nearest to the observation, measured after scaling
    /// both by the spread of the centroids themselves.
    pub fn predict(&self, steps: f64, avg_hr: f64) -> Result<u32, AnalysisError> {
        if !steps.is_finite() || !avg_hr.is_finite() {
            return Err(AnalysisError::InvalidObservation { steps, avg_hr });
        }
        if self.clusters.is_empty() {
            return Err(AnalysisError::EmptyRules);
        }

        let centroids: Vec<(u32, Point)> = self
            .clusters
            .iter()
            .map(|(&id, c)| (id, [c.steps, c.avg_hr]))
            .collect();
        let points: Vec<Point> = centroids.iter().map(|(_, p)| *p).collect();
        let scale = ZScore::fit(&points);
        let target = scale.apply(&[steps, avg_hr]);

        let mut best_id = centroids[0].0;
        let mut best_dist = f64::INFINITY;
        for (id, centroid) in &centroids {
            let dist = distance_sq(&target, &scale.apply(centroid));
            if dist < best_dist {
                best_dist = dist;
                best_id = *id;
            }
        }

        Ok(best_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"{
        "clusters": {
            "0": { "title": "Low activity", "steps": 3000, "avgHr": 85, "targetSteps": 6000 },
            "1": { "title": "Moderate", "steps": 7500, "avgHr": 75 },
            "2": { "title": "Active", "steps": 12000, "avgHr": 68 }
        }
    }"#;

    fn rules() -> ClusterRules {
        serde_json::from_str(RULES).unwrap()
    }

    #[test]
    fn reads_rules_with_extra_fields() {
        let rules = rules();
        assert_eq!(rules.clusters.len(), 3);
        assert_eq!(rules.clusters[&1].steps, 7500.0);
        assert_eq!(rules.clusters[&1].avg_hr, 75.0);
    }

    #[test]
    fn picks_nearest_centroid() {
        let rules = rules();
        assert_eq!(rules.predict(2800.0, 88.0).unwrap(), 0);
        assert_eq!(rules.predict(8000.0, 74.0).unwrap(), 1);
        assert_eq!(rules.predict(15000.0, 60.0).unwrap(), 2);
    }

    #[test]
    fn rejects_non_finite_observation() {
        let err = rules().predict(f64::NAN, 70.0).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidObservation { .. }));
    }

    #[test]
    fn rejects_empty_rules() {
        let empty: ClusterRules = serde_json::from_str(r#"{"clusters": {}}"#).unwrap();
        assert!(matches!(
            empty.predict(1000.0, 70.0).unwrap_err(),
            AnalysisError::EmptyRules
        ));
    }
}
