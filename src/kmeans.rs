//! Seeded k-means (Lloyd iterations with k-means++ seeding) and silhouette scoring
//! over two-dimensional points.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::AnalysisError;

pub type Point = [f64; 2];

#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Independent seedings; the run with the lowest inertia is kept.
    pub n_init: usize,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iterations: 300,
            seed: 42,
        }
    }
}

impl KMeansConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// A fitted model.
#[derive(Debug, Clone)]
pub struct KMeans {
    centroids: Vec<Point>,
    labels: Vec<usize>,
    inertia: f64,
}

impl KMeans {
    pub fn fit(points: &[Point], k: usize, config: &KMeansConfig) -> Result<Self, AnalysisError> {
        if k == 0 || k > points.len() {
            return Err(AnalysisError::InvalidClusterCount {
                k,
                samples: points.len(),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut best: Option<KMeans> = None;

        for _ in 0..config.n_init.max(1) {
            let candidate = Self::fit_single(points, k, config.max_iterations, &mut rng);
            let better = match &best {
                Some(current) => candidate.inertia < current.inertia,
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }

        best.ok_or(AnalysisError::InvalidClusterCount {
            k,
            samples: points.len(),
        })
    }

    fn fit_single(points: &[Point], k: usize, max_iterations: usize, rng: &mut ChaCha8Rng) -> Self {
        let mut centroids = plus_plus_init(points, k, rng);
        let mut labels = assign(points, &centroids);

        for _ in 0..max_iterations {
            centroids = update_centroids(points, &labels, &centroids);
            let next = assign(points, &centroids);
            if next == labels {
                break;
            }
            labels = next;
        }

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(point, &label)| distance_sq(point, &centroids[label]))
            .sum();

        Self {
            centroids,
            labels,
            inertia,
        }
    }

    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// Cluster index of each fitted point, in input order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }
}

fn plus_plus_init(points: &[Point], k: usize, rng: &mut ChaCha8Rng) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|point| {
                centroids
                    .iter()
                    .map(|c| distance_sq(point, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            centroids.push(points[rng.gen_range(0..points.len())]);
            continue;
        }

        let threshold = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let mut selected = points.len() - 1;
        for (idx, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if *weight > 0.0 && cumulative >= threshold {
                selected = idx;
                break;
            }
        }
        centroids.push(points[selected]);
    }

    centroids
}

fn assign(points: &[Point], centroids: &[Point]) -> Vec<usize> {
    points.iter().map(|point| nearest(point, centroids)).collect()
}

// Empty clusters keep their previous centroid.
fn update_centroids(points: &[Point], labels: &[usize], previous: &[Point]) -> Vec<Point> {
    let mut sums = vec![[0.0; 2]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (point, &label) in points.iter().zip(labels) {
        sums[label][0] += point[0];
        sums[label][1] += point[1];
        counts[label] += 1;
    }

    sums.iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), old)| {
            if count == 0 {
                *old
            } else {
                [sum[0] / count as f64, sum[1] / count as f64]
            }
        })
        .collect()
}

/// Index of the closest centroid; ties go to the lowest index.
pub fn nearest(point: &Point, centroids: &[Point]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = distance_sq(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

pub fn distance_sq(a: &Point, b: &Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Mean silhouette coefficient over all points.
///
/// Points alone in their cluster score 0. With fewer than two distinct
/// labels the score is 0.
pub fn silhouette_score(points: &[Point], labels: &[usize]) -> f64 {
    if points.is_empty() || points.len() != labels.len() {
        return 0.0;
    }

    let k = labels.iter().max().copied().unwrap_or(0) + 1;
    let mut sizes = vec![0usize; k];
    for &label in labels {
        sizes[label] += 1;
    }
    if sizes.iter().filter(|&&size| size > 0).count() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        let own = labels[i];
        if sizes[own] < 2 {
            continue;
        }

        let mut dist_sums = vec![0.0; k];
        for (j, other) in points.iter().enumerate() {
            if i != j {
                dist_sums[labels[j]] += distance_sq(point, other).sqrt();
            }
        }

        let a = dist_sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| dist_sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    total / points.len() as f64
}
