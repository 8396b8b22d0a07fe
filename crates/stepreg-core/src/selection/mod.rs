// =============================================================================
// Backward Elimination
// =============================================================================
//
// Start from the full model and repeatedly drop the weakest predictor:
//
//     Fit OLS on every remaining predictor
//     Repeat:
//         1. Find the predictor with the largest p-value
//         2. If that p-value > significance level:
//                record it, remove it, refit, go to 1
//         3. Otherwise stop: every remaining predictor is significant
//
// Only one predictor is removed per round. Dropping a predictor changes the
// standard errors of the others (especially ones correlated with it), so a
// predictor that looked insignificant alongside its twin may become
// significant once the twin is gone.
//
// TERMINATION
// -----------
// Every round either stops or removes one predictor, so there are at most
// p + 1 fits. If the last predictor would be removed the procedure fails with
// `AllPredictorsEliminated`. An intercept-only model is not a forecast model.
//
// TIES
// ----
// If two predictors share the largest p-value, the one earlier in column
// order is removed first.
//
// =============================================================================

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::PredictorSet;
use crate::error::{Result, StepRegError};
use crate::solvers::{fit_ols_with, OlsConfig, OlsResult};

// =============================================================================
// Configuration
// =============================================================================

/// Options for backward elimination.
#[derive(Debug, Clone)]
pub struct EliminationConfig {
    /// Predictors with a p-value strictly above this are removed.
    /// Default: 0.05
    pub significance_level: f64,

    /// Options passed to every OLS refit.
    pub ols: OlsConfig,
}

impl Default for EliminationConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            ols: OlsConfig::default(),
        }
    }
}

impl EliminationConfig {
    pub fn validate(&self) -> Result<()> {
        let level = self.significance_level;
        if !(level > 0.0 && level < 1.0) {
            return Err(StepRegError::InvalidValue(format!(
                "significance level must be in (0, 1), got {level}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Records
// =============================================================================

/// A predictor removed by backward elimination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminatedPredictor {
    /// Column title.
    pub title: String,
    /// Its p-value in the fit that removed it.
    pub p_value: f64,
    /// 1-based round in which it was removed.
    pub iteration: usize,
}

/// Outcome of one round of elimination.
#[derive(Debug, Clone)]
pub enum Step {
    /// A predictor was removed; another round is needed.
    Eliminated(EliminatedPredictor),
    /// Every remaining predictor is significant. Holds the final fit.
    Converged(OlsResult),
}

/// Result of a complete elimination run.
#[derive(Debug, Clone)]
pub struct EliminationOutcome {
    /// Fit on every predictor, before anything was removed.
    pub initial_fit: OlsResult,
    /// Fit on the surviving predictors.
    pub final_fit: OlsResult,
    /// Surviving predictors, aligned with `final_fit.params[1..]`.
    pub kept: PredictorSet,
    /// Removed predictors in removal order.
    pub eliminated: Vec<EliminatedPredictor>,
    /// Number of OLS fits performed.
    pub iterations: usize,
}

impl EliminationOutcome {
    /// Titles of the surviving predictors.
    pub fn kept_names(&self) -> &[String] {
        self.kept.names()
    }
}

// =============================================================================
// Decision Rule
// =============================================================================

/// Pick the predictor to remove, if any.
///
/// Returns `(index, p_value)` of the largest p-value when it is strictly
/// greater than `level`. Ties go to the lowest index. NaN entries must be
/// screened out by the caller.
pub fn select_for_removal(p_values: &Array1<f64>, level: f64) -> Option<(usize, f64)> {
    let (index, &worst) = p_values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, &f64)>, (i, p)| match best {
            Some((_, b)) if *p <= *b => best,
            _ => Some((i, p)),
        })?;

    (worst > level).then_some((index, worst))
}

// =============================================================================
// Elimination State
// =============================================================================

/// State carried between elimination rounds.
///
/// Holds the dependent variable, the current predictor set and the removal
/// record. Each call to [`step`](Self::step) performs one fit and at most
/// one removal.
#[derive(Debug, Clone)]
pub struct EliminationState {
    y: Array1<f64>,
    predictors: PredictorSet,
    eliminated: Vec<EliminatedPredictor>,
    iteration: usize,
    config: EliminationConfig,
    initial_fit: Option<OlsResult>,
}

impl EliminationState {
    pub fn new(y: Array1<f64>, predictors: PredictorSet, config: EliminationConfig) -> Result<Self> {
        config.validate()?;
        if predictors.is_empty() {
            return Err(StepRegError::EmptyInput(
                "backward elimination needs at least one predictor".to_string(),
            ));
        }
        if y.len() != predictors.n_obs() {
            return Err(StepRegError::DimensionMismatch(format!(
                "y has {} elements but predictors have {} rows",
                y.len(),
                predictors.n_obs()
            )));
        }
        Ok(Self {
            y,
            predictors,
            eliminated: Vec::new(),
            iteration: 0,
            config,
            initial_fit: None,
        })
    }

    /// Predictors still in the model.
    pub fn predictors(&self) -> &PredictorSet {
        &self.predictors
    }

    /// Predictors removed so far.
    pub fn eliminated(&self) -> &[EliminatedPredictor] {
        &self.eliminated
    }

    /// Number of fits performed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Run one round: fit, then either remove the worst predictor or stop.
    pub fn step(&mut self) -> Result<Step> {
        self.iteration += 1;
        let iteration = self.iteration;

        let fit = fit_ols_with(&self.y, self.predictors.matrix(), &self.config.ols)
            .map_err(|e| e.at_iteration(iteration))?;
        let p_values = fit.predictor_pvalues();

        if let Some(i) = p_values.iter().position(|p| p.is_nan()) {
            return Err(StepRegError::NonFinitePValue {
                predictor: self.predictors.names()[i].clone(),
                iteration,
            });
        }

        debug!(
            iteration,
            predictors = self.predictors.len(),
            r_squared = fit.r_squared,
            "fitted model"
        );

        if self.initial_fit.is_none() {
            self.initial_fit = Some(fit.clone());
        }

        let (index, p_value) = match select_for_removal(&p_values, self.config.significance_level) {
            Some(choice) => choice,
            None => {
                info!(
                    iteration,
                    kept = self.predictors.len(),
                    eliminated = self.eliminated.len(),
                    "all remaining predictors significant"
                );
                return Ok(Step::Converged(fit));
            }
        };

        let (title, _) = self.predictors.remove(index)?;
        info!(iteration, predictor = %title, p_value, "eliminated predictor");

        let record = EliminatedPredictor {
            title,
            p_value,
            iteration,
        };
        self.eliminated.push(record.clone());

        if self.predictors.is_empty() {
            return Err(StepRegError::AllPredictorsEliminated {
                eliminated: self.eliminated.clone(),
            });
        }

        Ok(Step::Eliminated(record))
    }

    /// Run rounds until the model converges.
    pub fn run(mut self) -> Result<EliminationOutcome> {
        loop {
            if let Step::Converged(final_fit) = self.step()? {
                let initial_fit = self.initial_fit.take().unwrap_or_else(|| final_fit.clone());
                return Ok(EliminationOutcome {
                    initial_fit,
                    final_fit,
                    kept: self.predictors,
                    eliminated: self.eliminated,
                    iterations: self.iteration,
                });
            }
        }
    }
}

/// Backward elimination of `predictors` against `y`.
///
/// # Arguments
/// * `y` - Dependent variable
/// * `predictors` - Candidate predictors (at least one)
/// * `config` - Significance level and OLS options
///
/// # Returns
/// The initial and final fits, the survivors, and the removal record.
pub fn backward_eliminate(
    y: &Array1<f64>,
    predictors: &PredictorSet,
    config: &EliminationConfig,
) -> Result<EliminationOutcome> {
    EliminationState::new(y.clone(), predictors.clone(), config.clone())?.run()
}

// =============================================================================
// Tests
// =============================================================================
