use crate::kmeans::Point;

/// Per-dimension z-score scaling using the population standard deviation.
/// A dimension with no spread scales by 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScore {
    pub mean: Point,
    pub std: Point,
}

impl ZScore {
    pub fn fit(points: &[Point]) -> Self {
        let n = points.len().max(1) as f64;
        let mut mean = [0.0; 2];
        for point in points {
            mean[0] += point[0];
            mean[1] += point[1];
        }
        mean[0] /= n;
        mean[1] /= n;

        let mut variance = [0.0; 2];
        for point in points {
            variance[0] += (point[0] - mean[0]).powi(2);
            variance[1] += (point[1] - mean[1]).powi(2);
        }

        let std = [spread(variance[0] / n), spread(variance[1] / n)];
        Self { mean, std }
    }

    pub fn apply(&self, point: &Point) -> Point {
        [
            (point[0] - self.mean[0]) / self.std[0],
            (point[1] - self.mean[1]) / self.std[1],
        ]
    }

    pub fn invert(&self, point: &Point) -> Point {
        [
            point[0] * self.std[0] + self.mean[0],
            point[1] * self.std[1] + self.mean[1],
        ]
    }
}

fn spread(variance: f64) -> f64 {
    let std = variance.sqrt();
    if std > 0.0 {
        std
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_unit_variance() {
        let points = vec![[2.0, 10.0], [4.0, 10.0], [6.0, 10.0]];
        let scale = ZScore::fit(&points);

        assert_eq!(scale.mean, [4.0, 10.0]);
        assert_eq!(scale.std[1], 1.0);
        let z = scale.apply(&[6.0, 10.0]);
        assert!((z[0] - 1.224_744_871).abs() < 1e-6);
        assert_eq!(z[1], 0.0);
    }

    #[test]
    fn invert_restores_original_units() {
        let points = vec![[1000.0, 60.0], [8000.0, 75.0], [12000.0, 90.0]];
        let scale = ZScore::fit(&points);

        let back = scale.invert(&scale.apply(&points[1]));
        assert!((back[0] - 8000.0).abs() < 1e-9);
        assert!((back[1] - 75.0).abs() < 1e-9);
    }
}
