// =============================================================================
// OLS: Ordinary Least Squares
// =============================================================================
//
// THE MODEL
// ---------
//     y = β₀ + β₁x₁ + … + βₚxₚ + ε,   ε ~ N(0, σ²)
//
// The caller supplies the predictors only; the constant column of ones is
// prepended here, so β₀ (the intercept) is always parameter 0.
//
// THE SOLVE
// ---------
//     β̂ = V Σ⁻¹ Uᵀ y,   (X'X)⁻¹ = V Σ⁻² Vᵀ,   X = UΣVᵀ
//
// X'X is never formed: its condition number is the square of X's, and
// near-collinear designs that survive the rank check lose most of their
// digits through the normal equations.
//
// Before solving, the design matrix X is checked for full column rank through
// its singular values. A rank-deficient X (collinear predictors, or a predictor
// that is constant and therefore a copy of the intercept) has no unique
// solution. We report it instead of returning a numerically meaningless fit.
//
// THE INFERENCE
// -------------
//     σ̂² = SSR / (n - k)            residual variance, k = p + 1
//     Var(β̂) = σ̂² (X'X)⁻¹
//     tⱼ = β̂ⱼ / se(β̂ⱼ)  ~  t(n - k)   under H₀: βⱼ = 0
//
// =============================================================================

use ndarray::{s, Array1, Array2, ArrayView2, Axis};

use crate::convert::{numerical_rank, singular_values, svd_solve_and_invert, to_dmatrix, to_dvector};
use crate::diagnostics::{
    adjusted_r_squared, aic, bic, centered_total_sum_of_squares, durbin_watson, f_statistic,
    log_likelihood_gaussian, r_squared, sum_of_squares,
};
use crate::error::{Result, StepRegError};
use crate::inference::{confidence_interval_t, pvalue_f, pvalue_t};

// =============================================================================
// Configuration
// =============================================================================

/// Options for an OLS fit.
#[derive(Debug, Clone)]
pub struct OlsConfig {
    /// Confidence level for the parameter intervals.
    /// Default: 0.95
    pub confidence: f64,
}

impl Default for OlsConfig {
    fn default() -> Self {
        Self { confidence: 0.95 }
    }
}

// =============================================================================
// Result Structure
// =============================================================================

/// Results from an OLS fit.
///
/// Every per-parameter vector has length `p + 1`, intercept first.
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients β̂, intercept first.
    pub params: Array1<f64>,

    /// Standard errors of the coefficients.
    pub std_errors: Array1<f64>,

    /// t-statistics, β̂ / se.
    pub t_values: Array1<f64>,

    /// Two-sided p-values of the t-statistics.
    pub p_values: Array1<f64>,

    /// Confidence interval bounds per parameter, `(lower, upper)`.
    pub conf_int: Vec<(f64, f64)>,

    /// Confidence level used for `conf_int`.
    pub confidence: f64,

    /// Fitted values Xβ̂.
    pub fitted_values: Array1<f64>,

    /// Residuals y - Xβ̂.
    pub residuals: Array1<f64>,

    /// Number of observations.
    pub n_obs: usize,

    /// Model degrees of freedom (number of predictors, intercept excluded).
    pub df_model: usize,

    /// Residual degrees of freedom, n - (p + 1).
    pub df_resid: usize,

    /// Sum of squared residuals.
    pub ssr: f64,

    /// Centred total sum of squares.
    pub centered_tss: f64,

    /// Residual variance estimate σ̂² = SSR / df_resid.
    pub scale: f64,

    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub durbin_watson: f64,

    /// Ratio of largest to smallest singular value of the design matrix.
    pub condition_number: f64,

    /// Unscaled covariance (X'X)⁻¹.
    pub covariance_unscaled: Array2<f64>,
}

impl OlsResult {
    /// Number of parameters including the intercept.
    pub fn n_params(&self) -> usize {
        self.params.len()
    }

    /// p-values of the predictors only (intercept dropped), in input column order.
    pub fn predictor_pvalues(&self) -> Array1<f64> {
        self.p_values.slice(s![1..]).to_owned()
    }

    /// The intercept β̂₀.
    pub fn intercept(&self) -> f64 {
        self.params[0]
    }

    /// Coefficients of the predictors only.
    pub fn slopes(&self) -> Array1<f64> {
        self.params.slice(s![1..]).to_owned()
    }

    /// Scaled covariance matrix σ̂² (X'X)⁻¹.
    pub fn covariance(&self) -> Array2<f64> {
        &self.covariance_unscaled * self.scale
    }
}

// =============================================================================
// Design Matrix
// =============================================================================

/// Prepend a column of ones to `x`.
pub fn add_constant(x: ArrayView2<'_, f64>) -> Array2<f64> {
    let n = x.nrows();
    let mut design = Array2::ones((n, x.ncols() + 1));
    design.slice_mut(s![.., 1..]).assign(&x);
    design
}

// =============================================================================
// Main Fitting Function
// =============================================================================

/// Fit `y` on `x` by OLS with default options.
///
/// # Arguments
/// * `y` - Response variable (n)
/// * `x` - Predictor matrix (n × p), without a constant column
///
/// # Returns
/// * `Ok(OlsResult)` - parameters are `[intercept, β₁, …, βₚ]`
/// * `Err(StepRegError)` - shape problems, too few observations, collinearity
pub fn fit_ols(y: &Array1<f64>, x: ArrayView2<'_, f64>) -> Result<OlsResult> {
    fit_ols_with(y, x, &OlsConfig::default())
}

/// Fit `y` on `x` by OLS.
pub fn fit_ols_with(y: &Array1<f64>, x: ArrayView2<'_, f64>, config: &OlsConfig) -> Result<OlsResult> {
    // -------------------------------------------------------------------------
    // Step 0: Validate inputs
    // -------------------------------------------------------------------------
    let n = y.len();
    let p = x.ncols();
    let k = p + 1;

    if x.nrows() != n {
        return Err(StepRegError::DimensionMismatch(format!(
            "X has {} rows but y has {} elements",
            x.nrows(),
            n
        )));
    }

    if n == 0 {
        return Err(StepRegError::EmptyInput("y is empty".to_string()));
    }

    if !(config.confidence > 0.0 && config.confidence < 1.0) {
        return Err(StepRegError::InvalidValue(format!(
            "confidence level must be in (0, 1), got {}",
            config.confidence
        )));
    }

    if y.iter().chain(x.iter()).any(|v| !v.is_finite()) {
        return Err(StepRegError::InvalidValue(
            "regression inputs contain NaN or infinite values".to_string(),
        ));
    }

    // Need at least one residual degree of freedom to estimate σ²
    if n <= k {
        return Err(StepRegError::InsufficientObservations { n_obs: n, n_params: k });
    }

    // -------------------------------------------------------------------------
    // Step 1: Build the design matrix and check its rank
    // -------------------------------------------------------------------------
    let design = add_constant(x);
    let x_nalg = to_dmatrix(design.view());

    let singular = singular_values(&x_nalg);
    let rank = numerical_rank(&singular, n, k);
    if rank < k {
        return Err(StepRegError::RankDeficient { rank, n_params: k });
    }
    let condition_number = singular[0] / singular[singular.len() - 1];

    // -------------------------------------------------------------------------
    // Step 2: Least squares through the SVD of X
    // -------------------------------------------------------------------------
    let (params, xtx_inv) = svd_solve_and_invert(&x_nalg, &to_dvector(y)).ok_or_else(|| {
        StepRegError::LinearAlgebraError(
            "singular value decomposition of the design matrix failed. \
             This usually indicates multicollinearity in predictors."
                .to_string(),
        )
    })?;

    // -------------------------------------------------------------------------
    // Step 3: Residuals and sums of squares
    // -------------------------------------------------------------------------
    let fitted_values = design.dot(&params);
    let residuals = y - &fitted_values;

    let df_resid = n - k;
    let ssr = sum_of_squares(&residuals);
    let centered_tss = centered_total_sum_of_squares(y);
    let scale = ssr / df_resid as f64;

    // -------------------------------------------------------------------------
    // Step 4: Standard errors, t-values, p-values, intervals
    // -------------------------------------------------------------------------
    let std_errors = standard_errors(&xtx_inv, scale)?;

    let t_values: Array1<f64> = params
        .iter()
        .zip(std_errors.iter())
        .map(|(&b, &se)| b / se)
        .collect();

    let df = df_resid as f64;
    let p_values = t_values.mapv(|t| pvalue_t(t, df));

    let conf_int: Vec<(f64, f64)> = params
        .iter()
        .zip(std_errors.iter())
        .map(|(&b, &se)| confidence_interval_t(b, se, df, config.confidence))
        .collect();

    // -------------------------------------------------------------------------
    // Step 5: Model-level statistics
    // -------------------------------------------------------------------------
    let r2 = r_squared(ssr, centered_tss);
    let f_stat = f_statistic(ssr, centered_tss, p, df_resid);
    let llf = log_likelihood_gaussian(ssr, n);

    Ok(OlsResult {
        params,
        std_errors,
        t_values,
        p_values,
        conf_int,
        confidence: config.confidence,
        fitted_values,
        durbin_watson: durbin_watson(&residuals),
        residuals,
        n_obs: n,
        df_model: p,
        df_resid,
        ssr,
        centered_tss,
        scale,
        r_squared: r2,
        adj_r_squared: adjusted_r_squared(r2, n, df_resid),
        f_statistic: f_stat,
        f_pvalue: pvalue_f(f_stat, p as f64, df),
        log_likelihood: llf,
        aic: aic(llf, k),
        bic: bic(llf, k, n),
        condition_number,
        covariance_unscaled: xtx_inv,
    })
}

/// √(σ̂² · diag((X'X)⁻¹)).
///
/// A non-positive diagonal means the inverse has lost its precision; that is
/// an error, never a zero standard error.
fn standard_errors(covariance_unscaled: &Array2<f64>, scale: f64) -> Result<Array1<f64>> {
    let diag = covariance_unscaled.diag();
    if let Some((j, d)) = diag.iter().enumerate().find(|(_, d)| **d <= 0.0 || !d.is_finite()) {
        return Err(StepRegError::LinearAlgebraError(format!(
            "variance of parameter {j} is {d}; the design matrix is too ill-conditioned"
        )));
    }
    Ok(diag.mapv(|d| (scale * d).sqrt()))
}

/// Remove column `index` from `x`, keeping row order.
pub fn drop_column(x: ArrayView2<'_, f64>, index: usize) -> Array2<f64> {
    let keep: Vec<usize> = (0..x.ncols()).filter(|&j| j != index).collect();
    x.select(Axis(1), &keep)
}

// =============================================================================
// Tests
// =============================================================================
