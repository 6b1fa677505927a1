use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::correction_pipeline::common::error::{CorrectionError, Result};
use crate::correction_pipeline::pooling::PooledDataset;
use crate::correction_pipeline::regression::types::{Coefficients, FitQuality, LinearModel};

/// Diagonal entries of `R` below this fraction of `‖X‖` mark the design as rank deficient.
const RANK_TOLERANCE: f64 = 1e-10;

/// Ordinary least-squares fit of smoothed primary on smoothed predictor values.
///
/// The design matrix is `[1, predictor1]`, or `[1, predictor1, predictor2]` when
/// `two_predictor` is set. Without predictor 2 the `m2` coefficient is exactly 0.
pub fn fit(pooled: &PooledDataset, two_predictor: bool) -> Result<LinearModel> {
    let predictor2 = match (two_predictor, pooled.predictor2.as_ref()) {
        (true, None) => return Err(CorrectionError::MissingPredictor2),
        (true, Some(p2)) => Some(p2),
        (false, _) => None,
    };

    let n = pooled.len();
    let k = if two_predictor { 3 } else { 2 };
    if n < k {
        return Err(CorrectionError::InsufficientPixels {
            required: k,
            available: n,
        });
    }

    let x = DMatrix::from_fn(n, k, |i, j| match j {
        0 => 1.0,
        1 => pooled.predictor1[i],
        _ => predictor2.map_or(0.0, |p2| p2[i]),
    });
    let y = DVector::from_column_slice(&pooled.primary);

    let beta = solve_least_squares(&x, &y)?;
    let coefficients = Coefficients {
        c: beta[0],
        m1: beta[1],
        m2: if two_predictor { beta[2] } else { 0.0 },
    };

    let residuals = &x * &beta - &y;
    let sse = residuals.norm_squared();
    let quality = r_squared(&pooled.primary, sse);

    match quality {
        FitQuality::RSquared(r2) => debug!(
            c = coefficients.c,
            m1 = coefficients.m1,
            m2 = coefficients.m2,
            r2,
            "Linear model fitted"
        ),
        _ => warn!("Primary channel has zero variance; R² is undefined"),
    }

    Ok(LinearModel {
        coefficients,
        two_predictor,
        quality,
        pixel_count: n,
    })
}

fn r_squared(target: &[f64], sse: f64) -> FitQuality {
    let n = target.len() as f64;
    let mean = target.iter().sum::<f64>() / n;
    let sst: f64 = target.iter().map(|v| (v - mean) * (v - mean)).sum();
    let sum_sq: f64 = target.iter().map(|v| v * v).sum();

    if sst <= f64::EPSILON * sum_sq {
        return FitQuality::ZeroVariance;
    }
    FitQuality::RSquared(1.0 - sse / sst)
}

/// Householder QR solve, falling back to a minimum-norm SVD solution when `R` has a
/// negligible diagonal entry.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>> {
    let tolerance = x.norm() * RANK_TOLERANCE;

    let qr = x.clone().qr();
    let r = qr.r();
    let min_diag = r
        .diagonal()
        .iter()
        .map(|v| v.abs())
        .fold(f64::INFINITY, f64::min);

    if min_diag > tolerance {
        let qty = qr.q().transpose() * y;
        return r
            .solve_upper_triangular(&qty)
            .ok_or_else(|| CorrectionError::SolveFailed("singular R factor".to_string()));
    }

    debug!(
        min_diag,
        tolerance, "Design matrix is rank deficient, using SVD"
    );
    x.clone()
        .svd(true, true)
        .solve(y, tolerance)
        .map_err(|e| CorrectionError::SolveFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pooled(primary: Vec<f64>, p1: Vec<f64>, p2: Option<Vec<f64>>) -> PooledDataset {
        let n = primary.len();
        PooledDataset {
            primary,
            predictor1: p1,
            predictor2: p2,
            sample_index: vec![0; n],
            boundaries: vec![0..n],
        }
    }

    /// Closed-form simple regression for comparison.
    fn normal_equations(x: &[f64], y: &[f64]) -> (f64, f64) {
        let n = x.len() as f64;
        let mx = x.iter().sum::<f64>() / n;
        let my = y.iter().sum::<f64>() / n;
        let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
        let sxx: f64 = x.iter().map(|a| (a - mx) * (a - mx)).sum();
        let m = sxy / sxx;
        (my - m * mx, m)
    }

    #[test]
    fn test_noiseless_one_predictor_recovery() {
        let p1: Vec<f64> = (0..50).map(|i| 100.0 + 7.0 * i as f64).collect();
        let primary: Vec<f64> = p1.iter().map(|p| 12.5 + 0.8 * p).collect();

        let model = fit(&pooled(primary, p1, None), false).unwrap();

        assert_relative_eq!(model.coefficients.c, 12.5, epsilon = 1e-8);
        assert_relative_eq!(model.coefficients.m1, 0.8, epsilon = 1e-10);
        assert_eq!(model.coefficients.m2, 0.0);
        assert!(!model.two_predictor);
        assert_relative_eq!(model.r_squared().unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(model.pixel_count, 50);
    }

    #[test]
    fn test_matches_normal_equations() {
        let p1 = vec![3.0, 8.0, 1.0, 9.0, 4.0, 6.0, 2.0];
        let primary = vec![11.0, 25.0, 4.5, 30.0, 14.0, 18.5, 9.0];

        let model = fit(&pooled(primary.clone(), p1.clone(), None), false).unwrap();
        let (c, m) = normal_equations(&p1, &primary);

        assert_relative_eq!(model.coefficients.c, c, epsilon = 1e-10);
        assert_relative_eq!(model.coefficients.m1, m, epsilon = 1e-10);
        let r2 = model.r_squared().unwrap();
        assert!(r2 > 0.9 && r2 < 1.0);
    }

    #[test]
    fn test_two_predictor_recovers_zero_m2() {
        let p1: Vec<f64> = (0..40).map(|i| (i * 13 % 17) as f64 * 10.0).collect();
        let p2: Vec<f64> = (0..40).map(|i| (i * 7 % 11) as f64 * 25.0).collect();
        let primary: Vec<f64> = p1.iter().map(|a| 50.0 + 1.5 * a).collect();

        let model = fit(&pooled(primary, p1, Some(p2)), true).unwrap();

        assert!(model.two_predictor);
        assert_relative_eq!(model.coefficients.c, 50.0, epsilon = 1e-8);
        assert_relative_eq!(model.coefficients.m1, 1.5, epsilon = 1e-10);
        assert_relative_eq!(model.coefficients.m2, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_two_predictor_recovery() {
        let p1: Vec<f64> = (0..40).map(|i| (i * 13 % 17) as f64 * 10.0).collect();
        let p2: Vec<f64> = (0..40).map(|i| (i * 7 % 11) as f64 * 25.0).collect();
        let primary: Vec<f64> = p1
            .iter()
            .zip(&p2)
            .map(|(a, b)| -3.0 + 0.5 * a + 0.25 * b)
            .collect();

        let model = fit(&pooled(primary, p1, Some(p2)), true).unwrap();

        assert_relative_eq!(model.coefficients.c, -3.0, epsilon = 1e-8);
        assert_relative_eq!(model.coefficients.m1, 0.5, epsilon = 1e-10);
        assert_relative_eq!(model.coefficients.m2, 0.25, epsilon = 1e-10);
    }

    #[test]
    fn test_one_predictor_ignores_pooled_predictor2() {
        let p1 = vec![1.0, 2.0, 3.0, 4.0];
        let p2 = vec![9.0, 1.0, 7.0, 3.0];
        let primary = vec![3.0, 5.0, 7.0, 9.0];

        let model = fit(&pooled(primary, p1, Some(p2)), false).unwrap();

        assert_eq!(model.coefficients.m2, 0.0);
        assert_relative_eq!(model.coefficients.m1, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_constant_predictor_collapses_to_mean() {
        let p1 = vec![500.0; 6];
        let primary = vec![10.0, 14.0, 9.0, 13.0, 11.0, 15.0];
        let mean = primary.iter().sum::<f64>() / 6.0;

        let model = fit(&pooled(primary, p1, None), false).unwrap();

        let r2 = model.r_squared().unwrap();
        assert!(r2.is_finite());
        assert!(r2.abs() < 1e-9);
        assert_relative_eq!(model.predict(500.0, None), mean, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_target_reports_undefined_r2() {
        let p1 = vec![1.0, 2.0, 3.0, 4.0];
        let primary = vec![7.0; 4];

        let model = fit(&pooled(primary, p1, None), false).unwrap();

        assert_eq!(model.quality, FitQuality::ZeroVariance);
        assert!(model.r_squared().is_none());
        assert!(model.quality.warning().is_some());
        assert_relative_eq!(model.coefficients.c, 7.0, epsilon = 1e-10);
        assert_relative_eq!(model.coefficients.m1, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_two_predictor_without_data_rejected() {
        let result = fit(&pooled(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0], None), true);
        assert!(matches!(result, Err(CorrectionError::MissingPredictor2)));
    }

    #[test]
    fn test_too_few_pixels_rejected() {
        let result = fit(&pooled(vec![1.0], vec![1.0], None), false);
        assert!(matches!(
            result,
            Err(CorrectionError::InsufficientPixels {
                required: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let p1: Vec<f64> = (0..30).map(|i| ((i * 37) % 101) as f64).collect();
        let primary: Vec<f64> = p1
            .iter()
            .enumerate()
            .map(|(i, p)| 4.0 + 2.0 * p + ((i * 17) % 5) as f64)
            .collect();
        let data = pooled(primary, p1, None);

        assert_eq!(fit(&data, false).unwrap(), fit(&data, false).unwrap());
    }
}
