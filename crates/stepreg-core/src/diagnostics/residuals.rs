//! Residual-based statistics.

use ndarray::Array1;

/// Sum of squared values, Σ eᵢ².
pub fn sum_of_squares(residuals: &Array1<f64>) -> f64 {
    residuals.iter().map(|e| e * e).sum()
}

/// Centred total sum of squares, Σ (yᵢ - ȳ)².
pub fn centered_total_sum_of_squares(y: &Array1<f64>) -> f64 {
    let mean = match y.mean() {
        Some(m) => m,
        None => return 0.0,
    };
    y.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Durbin-Watson statistic: Σ (eₜ - eₜ₋₁)² / Σ eₜ².
///
/// Near 2 means no first-order autocorrelation; towards 0 positive, towards 4
/// negative. Rows are taken in file order, which for dated data is time order.
/// An exact fit has no residual variation and returns NaN.
pub fn durbin_watson(residuals: &Array1<f64>) -> f64 {
    let ssr = sum_of_squares(residuals);
    if ssr == 0.0 {
        return f64::NAN;
    }
    let diff: f64 = residuals
        .windows(2)
        .into_iter()
        .map(|w| (w[1] - w[0]).powi(2))
        .sum();
    diff / ssr
}
