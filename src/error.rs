use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("not enough samples: found {found} shared (Id, date) rows, need at least {required}")]
    InsufficientSamples { found: usize, required: usize },

    #[error("no step file found (tried {})", display_paths(.tried))]
    NoStepFile { tried: Vec<PathBuf> },

    #[error("cannot fit {k} clusters to {samples} samples")]
    InvalidClusterCount { k: usize, samples: usize },

    #[error("observation must be finite: steps={steps}, avg_hr={avg_hr}")]
    InvalidObservation { steps: f64, avg_hr: f64 },

    #[error("cluster rules contain no clusters")]
    EmptyRules,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
