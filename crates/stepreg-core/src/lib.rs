// =============================================================================
// stepreg Core Library
// =============================================================================
//
// Entry point for the numerics: correlation screening, OLS regression and
// backward elimination of insignificant predictors. No I/O beyond reading the
// input CSV; rendering to the terminal lives in the `stepreg` binary.
//
// STRUCTURE:
// ----------
//   - data:        CSV loading, the dataset, named predictor columns
//   - correlation: Pearson correlation matrix and significant pairs
//   - solvers:     OLS fitting
//   - inference:   p-values and confidence intervals
//   - diagnostics: R², F-test, log-likelihood, AIC/BIC, Durbin-Watson
//   - selection:   backward elimination
//   - forecast:    the final {name, coefficient} model
//   - report:      fit summaries and their text rendering
//   - analysis:    the full pipeline
//   - error:       error types used throughout the library
//
// FOR MAINTAINERS:
// ----------------
// When adding new functionality:
//   1. Add it to the appropriate module (or create a new one)
//   2. Write tests in that module (see existing tests for examples)
//   3. Re-export public items here so users can access them easily
//
// =============================================================================

pub mod analysis;
pub mod convert;
pub mod correlation;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod forecast;
pub mod inference;
pub mod report;
pub mod selection;
pub mod solvers;

pub use analysis::{run_analysis, AnalysisConfig, AnalysisReport, PredictorPValue};
pub use correlation::{correlation_matrix, significant_pairs, CorrelationConfig, CorrelationPair};
pub use data::{Dataset, PredictorSet};
pub use error::{Result, StepRegError};
pub use forecast::{ForecastModel, ForecastTerm};
pub use inference::{pvalue_f, pvalue_t, significance_stars};
pub use report::FitSummary;
pub use selection::{
    backward_eliminate, select_for_removal, EliminatedPredictor, EliminationConfig,
    EliminationOutcome, EliminationState, Step,
};
pub use solvers::{fit_ols, fit_ols_with, OlsConfig, OlsResult};
