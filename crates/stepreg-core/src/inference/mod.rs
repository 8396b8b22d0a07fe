// =============================================================================
// Statistical Inference
// =============================================================================
//
// Significance tests for regression coefficients:
//   - t-test p-values: is a single coefficient different from zero?
//   - F-test p-value: are all slope coefficients jointly zero?
//   - Confidence intervals from the t-distribution
//
// BACKWARD ELIMINATION:
// ---------------------
// The elimination loop ranks predictors by these p-values. A predictor with
// p = 0.40 means: if its true coefficient were zero, a t-statistic at least
// this large would turn up 40% of the time. Such a predictor is not earning
// its place in the model and is the first candidate for removal.
//
// Small samples matter here. OLS estimates the residual variance from the
// data, so the t-distribution with n - k degrees of freedom is used rather
// than the normal approximation.
//
// =============================================================================

use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

// =============================================================================
// P-Value Calculation
// =============================================================================

/// Two-tailed p-value of a t-statistic.
///
/// # Arguments
/// * `t` - The t-statistic (coefficient / standard_error)
/// * `df` - Residual degrees of freedom (n - k for OLS)
///
/// # Returns
/// `P(|T| ≥ |t|)`. An infinite `t` (exact fit, non-zero coefficient) gives 0.
/// NaN `t` or non-positive `df` gives NaN.
pub fn pvalue_t(t: f64, df: f64) -> f64 {
    if t.is_nan() || !(df > 0.0) {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };

    // sf(|t|) keeps precision for large t where 1 - cdf would round to 0
    2.0 * t_dist.sf(t.abs())
}

/// Upper-tail p-value of an F-statistic.
///
/// Used for the overall regression test: H₀ says every slope is zero.
pub fn pvalue_f(f: f64, df_num: f64, df_den: f64) -> f64 {
    if f.is_nan() || !(df_num > 0.0) || !(df_den > 0.0) {
        return f64::NAN;
    }
    if f.is_infinite() {
        return 0.0;
    }
    if f <= 0.0 {
        return 1.0;
    }

    match FisherSnedecor::new(df_num, df_den) {
        Ok(d) => d.sf(f),
        Err(_) => f64::NAN,
    }
}

// =============================================================================
// Confidence Intervals
// =============================================================================

/// Confidence interval from the t-distribution.
///
/// # Arguments
/// * `estimate` - Point estimate (coefficient value)
/// * `std_error` - Standard error of the estimate
/// * `df` - Degrees of freedom
/// * `confidence` - Confidence level (e.g., 0.95 for 95% CI)
///
/// # Returns
/// (lower_bound, upper_bound). A zero standard error collapses the interval
/// onto the estimate.
pub fn confidence_interval_t(estimate: f64, std_error: f64, df: f64, confidence: f64) -> (f64, f64) {
    if !estimate.is_finite() || !std_error.is_finite() || std_error < 0.0 || !(df > 0.0) {
        return (f64::NAN, f64::NAN);
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return (f64::NAN, f64::NAN),
    };

    let alpha = 1.0 - confidence;
    let t_critical = t_dist.inverse_cdf(1.0 - alpha / 2.0);

    let margin = t_critical * std_error;
    (estimate - margin, estimate + margin)
}

// =============================================================================
// Significance Stars (for summary tables)
// =============================================================================

/// Significance stars for a p-value, R-style.
///
/// - "***" : p < 0.001
/// - "**"  : p < 0.01
/// - "*"   : p < 0.05
/// - "."   : p < 0.1
/// - ""    : otherwise
pub fn significance_stars(pvalue: f64) -> &'static str {
    if pvalue < 0.001 {
        "***"
    } else if pvalue < 0.01 {
        "**"
    } else if pvalue < 0.05 {
        "*"
    } else if pvalue < 0.1 {
        "."
    } else {
        ""
    }
}

// =============================================================================
// Tests
// =============================================================================
