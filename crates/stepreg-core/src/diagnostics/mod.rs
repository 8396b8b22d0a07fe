// =============================================================================
// Model Diagnostics
// =============================================================================
//
// Goodness-of-fit measures reported alongside an OLS fit:
//
// - MODEL FIT: R², adjusted R², F-statistic, log-likelihood, AIC, BIC
// - RESIDUALS: sum of squares, Durbin-Watson autocorrelation statistic
//
// STATSMODELS COMPATIBILITY:
// --------------------------
// Names and formulas follow the statsmodels OLS summary:
// - rsquared uses the centred total sum of squares (model has a constant)
// - llf is the Gaussian concentrated log-likelihood
// - aic / bic count every parameter including the intercept
//
// =============================================================================

mod model_fit;
mod residuals;

pub use model_fit::{
    adjusted_r_squared,
    aic,
    bic,
    f_statistic,
    log_likelihood_gaussian,
    r_squared,
};

pub use residuals::{
    centered_total_sum_of_squares,
    durbin_watson,
    sum_of_squares,
};
