use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    pub user_id: String,
    pub date: String,
}

impl DayKey {
    pub fn new(user_id: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            date: date.into(),
        }
    }
}

/// One joined observation for a user on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub steps: f64,
    pub avg_heart_rate: f64,
}

impl Sample {
    pub fn new(steps: f64, avg_heart_rate: f64) -> Self {
        Self {
            steps,
            avg_heart_rate,
        }
    }

    pub fn as_point(&self) -> [f64; 2] {
        [self.steps, self.avg_heart_rate]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterScore {
    pub k: usize,
    pub inertia: f64,
    pub silhouette: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub samples: usize,
    pub scores: Vec<ClusterScore>,
    pub skipped_k: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows: usize,
    pub kept: usize,
    pub skipped: usize,
    pub keys: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleCentroid {
    pub steps: f64,
    #[serde(rename = "avgHr")]
    pub avg_hr: f64,
}

/// Centroids keyed by cluster id, in the `cluster_rules.json` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRules {
    pub clusters: BTreeMap<u32, RuleCentroid>,
}
