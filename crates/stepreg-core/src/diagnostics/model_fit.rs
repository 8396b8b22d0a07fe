//! Model-level fit statistics.

use std::f64::consts::PI;

/// Coefficient of determination, 1 - SSR / TSS.
///
/// TSS is the centred total sum of squares. A constant response (TSS = 0)
/// returns NaN.
pub fn r_squared(ssr: f64, centered_tss: f64) -> f64 {
    if centered_tss == 0.0 {
        return f64::NAN;
    }
    1.0 - ssr / centered_tss
}

/// Adjusted R², penalising the number of slope parameters.
///
/// `1 - (n - 1) / df_resid × (1 - R²)`
pub fn adjusted_r_squared(r2: f64, n_obs: usize, df_resid: usize) -> f64 {
    if df_resid == 0 {
        return f64::NAN;
    }
    1.0 - (n_obs as f64 - 1.0) / df_resid as f64 * (1.0 - r2)
}

/// F-statistic for the joint test that every slope is zero.
///
/// `(ESS / df_model) / (SSR / df_resid)` with ESS = TSS - SSR.
pub fn f_statistic(ssr: f64, centered_tss: f64, df_model: usize, df_resid: usize) -> f64 {
    if df_model == 0 || df_resid == 0 {
        return f64::NAN;
    }
    let ess = centered_tss - ssr;
    let mse_resid = ssr / df_resid as f64;
    if mse_resid == 0.0 {
        return if ess > 0.0 { f64::INFINITY } else { f64::NAN };
    }
    (ess / df_model as f64) / mse_resid
}

/// Gaussian log-likelihood at the maximum-likelihood variance SSR / n.
///
/// `-n/2 × (ln(2π) + ln(SSR / n) + 1)`
pub fn log_likelihood_gaussian(ssr: f64, n_obs: usize) -> f64 {
    let n = n_obs as f64;
    -0.5 * n * ((2.0 * PI).ln() + (ssr / n).ln() + 1.0)
}

/// Akaike Information Criterion: -2 ℓ + 2k.
pub fn aic(llf: f64, n_params: usize) -> f64 {
    -2.0 * llf + 2.0 * n_params as f64
}

/// Bayesian Information Criterion: -2 ℓ + k ln(n).
pub fn bic(llf: f64, n_params: usize, n_obs: usize) -> f64 {
    -2.0 * llf + n_params as f64 * (n_obs as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_r_squared_bounds() {
        assert_abs_diff_eq!(r_squared(0.0, 10.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r_squared(10.0, 10.0), 0.0, epsilon = 1e-12);
        assert!(r_squared(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_adjusted_below_plain() {
        let r2 = 0.8;
        let adj = adjusted_r_squared(r2, 20, 17);
        assert!(adj < r2);
        assert_abs_diff_eq!(adj, 1.0 - 19.0 / 17.0 * 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_f_statistic() {
        // ESS = 8, SSR = 2, df_model = 2, df_resid = 10 → (8/2)/(2/10) = 20
        assert_abs_diff_eq!(f_statistic(2.0, 10.0, 2, 10), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_information_criteria() {
        let llf = log_likelihood_gaussian(4.0, 10);
        assert_abs_diff_eq!(aic(llf, 3), -2.0 * llf + 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bic(llf, 3, 10), -2.0 * llf + 3.0 * 10f64.ln(), epsilon = 1e-12);
        // Smaller SSR → larger likelihood
        assert!(log_likelihood_gaussian(1.0, 10) > llf);
    }
}
