use std::fmt::Write;

use crate::models::{ClusterScore, EvaluationReport};

pub fn score_line(score: &ClusterScore) -> String {
    format!(
        "K: {} | Inertia: {:.2} | Silhouette: {:.4}",
        score.k, score.inertia, score.silhouette
    )
}

/// Plain-text rendering: the sample count, then one line per tested k.
pub fn build_report(report: &EvaluationReport) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Samples: {}", report.samples);
    for score in report.scores.iter() {
        let _ = writeln!(output, "{}", score_line(score));
    }

    output
}

pub fn skipped_notice(report: &EvaluationReport) -> Option<String> {
    if report.skipped_k.is_empty() {
        return None;
    }

    let ks: Vec<String> = report.skipped_k.iter().map(|k| k.to_string()).collect();
    Some(format!(
        "skipped K {}: only {} samples",
        ks.join(", "),
        report.samples
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> EvaluationReport {
        EvaluationReport {
            samples: 4,
            scores: vec![
                ClusterScore {
                    k: 2,
                    inertia: 1234.5678,
                    silhouette: 0.81234,
                },
                ClusterScore {
                    k: 3,
                    inertia: 12.0,
                    silhouette: -0.05,
                },
            ],
            skipped_k: vec![5],
        }
    }

    #[test]
    fn formats_each_k_on_its_own_line() {
        assert_eq!(
            build_report(&report()),
            "Samples: 4\n\
             K: 2 | Inertia: 1234.57 | Silhouette: 0.8123\n\
             K: 3 | Inertia: 12.00 | Silhouette: -0.0500\n"
        );
    }

    #[test]
    fn notice_lists_skipped_k() {
        assert_eq!(
            skipped_notice(&report()).as_deref(),
            Some("skipped K 5: only 4 samples")
        );

        let mut complete = report();
        complete.skipped_k.clear();
        assert_eq!(skipped_notice(&complete), None);
    }
}
