// =============================================================================
// Regression Solvers
// =============================================================================
//
// Least-squares fitting. Only ordinary least squares is needed: the response
// is modelled as a linear function of the predictors plus Gaussian noise, so
// the estimates have a closed form and no iteration is involved.
//
//     y = Xβ + ε
//
// where:
//   - y is the response variable (the dependent column)
//   - X is the design matrix (a constant column, then the predictors)
//   - β is the coefficient vector (what we're solving for)
//   - ε is independent Gaussian noise with constant variance
//
// The iteration in this crate happens one level up, in `selection`, which
// refits OLS after every predictor it drops.
//
// =============================================================================

mod ols;

pub use ols::{add_constant, drop_column, fit_ols, fit_ols_with, OlsConfig, OlsResult};
