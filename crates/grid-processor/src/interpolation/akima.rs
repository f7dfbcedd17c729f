//! Akima piecewise-cubic spline.
//!
//! Slopes at the knots are weighted averages of neighbouring secant slopes,
//! with weights taken from how much the secants change on either side. This
//! keeps the curve from overshooting where the data bends sharply. The end
//! conditions extend the secant sequence by two linearly extrapolated slopes
//! on each side, and where both weights vanish the knot slope is the mean of
//! the adjacent secants.

use crate::error::{GridProcessorError, Result};

/// Weight sums below this fraction of the largest sum count as zero.
const WEIGHT_EPSILON: f64 = 1e-9;

/// A fitted Akima spline over strictly increasing abscissae.
#[derive(Debug, Clone)]
pub struct AkimaSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Knot slopes, one per sample.
    t: Vec<f64>,
}

impl AkimaSpline {
    /// Fit a spline through `(x[i], y[i])`.
    ///
    /// Needs at least two samples; with exactly two the spline is the
    /// straight line through them.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GridProcessorError::InvalidSamples(format!(
                "{} abscissae but {} values",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(GridProcessorError::InsufficientSamples {
                found: x.len(),
                required: 2,
            });
        }
        if let Some(i) = x.iter().chain(y).position(|v| !v.is_finite()) {
            return Err(GridProcessorError::InvalidSamples(format!(
                "non-finite value at position {}",
                i % x.len()
            )));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridProcessorError::NonMonotonicPressure { index: i + 1 });
        }

        let t = knot_slopes(x, y);
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            t,
        })
    }

    /// Range of abscissae covered by the samples.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Value of the spline at `x`, or `NaN` outside the sampled range.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.x.len();
        let (lo, hi) = self.domain();
        if !(lo..=hi).contains(&x) {
            return f64::NAN;
        }
        if x == hi {
            return self.y[n - 1];
        }

        // Interval i with x[i] <= x < x[i + 1]
        let i = self.x.partition_point(|&xi| xi <= x) - 1;
        let h = self.x[i + 1] - self.x[i];
        let slope = (self.y[i + 1] - self.y[i]) / h;
        let (t0, t1) = (self.t[i], self.t[i + 1]);

        let b = t0;
        let c = (3.0 * slope - 2.0 * t0 - t1) / h;
        let d = (t0 + t1 - 2.0 * slope) / (h * h);

        let dx = x - self.x[i];
        self.y[i] + dx * (b + dx * (c + dx * d))
    }

    /// Evaluate at each of `xs`.
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

fn knot_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 2 {
        let m = (y[1] - y[0]) / (x[1] - x[0]);
        return vec![m, m];
    }

    // Secant slopes padded with two extrapolated slopes per side:
    // m[2..n+1] are the n-1 secants.
    let mut m = vec![0.0; n + 3];
    for i in 0..n - 1 {
        m[i + 2] = (y[i + 1] - y[i]) / (x[i + 1] - x[i]);
    }
    m[1] = 2.0 * m[2] - m[3];
    m[0] = 2.0 * m[1] - m[2];
    m[n + 1] = 2.0 * m[n] - m[n - 1];
    m[n + 2] = 2.0 * m[n + 1] - m[n];

    let f1: Vec<f64> = (0..n).map(|i| (m[i + 3] - m[i + 2]).abs()).collect();
    let f2: Vec<f64> = (0..n).map(|i| (m[i + 1] - m[i]).abs()).collect();
    let max_weight = f1
        .iter()
        .zip(&f2)
        .map(|(a, b)| a + b)
        .fold(0.0_f64, f64::max);

    (0..n)
        .map(|i| {
            let f12 = f1[i] + f2[i];
            if f12 > WEIGHT_EPSILON * max_weight && f12 > 0.0 {
                (f1[i] * m[i + 1] + f2[i] * m[i + 2]) / f12
            } else {
                0.5 * (m[i + 1] + m[i + 2])
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reproduces_knots() {
        let x = [0.0, 10.0, 25.0, 60.0, 100.0, 180.0];
        let y = [20.0, 19.5, 17.0, 12.0, 11.5, 6.0];
        let spline = AkimaSpline::new(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert!(approx(spline.evaluate(*xi), *yi), "knot {}", xi);
        }
    }

    #[test]
    fn test_linear_data_stays_linear() {
        let x = [0.0, 100.0, 300.0, 700.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 - 0.01 * v).collect();
        let spline = AkimaSpline::new(&x, &y).unwrap();
        for p in [50.0, 150.0, 512.5, 699.0] {
            assert!(approx(spline.evaluate(p), 2.0 - 0.01 * p));
        }
    }

    #[test]
    fn test_two_samples_is_linear() {
        let spline = AkimaSpline::new(&[0.0, 10.0], &[1.0, 3.0]).unwrap();
        assert!(approx(spline.evaluate(2.5), 1.5));
        assert!(approx(spline.evaluate(10.0), 3.0));
    }

    #[test]
    fn test_outside_domain_is_nan() {
        let spline = AkimaSpline::new(&[5.0, 10.0, 20.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(spline.evaluate(4.999).is_nan());
        assert!(spline.evaluate(20.001).is_nan());
        assert!(!spline.evaluate(5.0).is_nan());
    }

    #[test]
    fn test_no_overshoot_on_step() {
        // Flat, step, flat: Akima keeps the flat parts flat
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let spline = AkimaSpline::new(&x, &y).unwrap();
        for i in 0..=50 {
            let v = spline.evaluate(i as f64 * 0.1);
            assert!((-1e-12..=1.0 + 1e-12).contains(&v), "overshoot {} at {}", v, i);
        }
        assert!(approx(spline.evaluate(1.5), 0.0));
        assert!(approx(spline.evaluate(4.5), 1.0));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            AkimaSpline::new(&[1.0], &[1.0]),
            Err(GridProcessorError::InsufficientSamples { found: 1, .. })
        ));
        assert!(matches!(
            AkimaSpline::new(&[0.0, 2.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(GridProcessorError::NonMonotonicPressure { index: 2 })
        ));
        assert!(matches!(
            AkimaSpline::new(&[0.0, 1.0], &[1.0]),
            Err(GridProcessorError::InvalidSamples(_))
        ));
        assert!(matches!(
            AkimaSpline::new(&[0.0, 1.0], &[1.0, f64::NAN]),
            Err(GridProcessorError::InvalidSamples(_))
        ));
    }
}
