// =============================================================================
// Error Types
// =============================================================================
//
// Every fallible operation in the library returns `Result<T>`, which is
// `std::result::Result<T, StepRegError>`.
//
// The variants fall into four groups:
//   - INPUT:      the CSV could not be read or does not have the expected shape
//   - CONFIG:     a threshold or option is out of range
//   - DEGENERATE: the data is readable but cannot support a regression
//   - NUMERICAL:  the linear algebra failed or produced non-finite output
//
// Errors raised inside the elimination loop are wrapped in `Iteration` so the
// message says which refit failed.
//
// =============================================================================

use thiserror::Error;

use crate::selection::EliminatedPredictor;

/// Errors that can occur while loading data or fitting models.
#[derive(Debug, Error)]
pub enum StepRegError {
    /// The input file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A data cell could not be parsed as a floating-point number.
    #[error("row {row}, column '{column}': cannot parse '{value}' as a number")]
    ParseCell {
        row: usize,
        column: String,
        value: String,
    },

    /// A data row has a different number of fields than the header.
    #[error("row {row} has {found} fields but the header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Two columns share a title.
    #[error("duplicate column title '{0}'")]
    DuplicateColumn(String),

    /// Input has no rows, no columns, or no predictors.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Array shapes disagree.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An option or data value is outside its valid range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Not enough observations to leave any residual degrees of freedom.
    #[error("{n_obs} observations cannot support {n_params} parameters (need more observations than parameters)")]
    InsufficientObservations { n_obs: usize, n_params: usize },

    /// The design matrix does not have full column rank.
    #[error("design matrix is rank deficient: rank {rank} < {n_params} parameters (predictors are collinear)")]
    RankDeficient { rank: usize, n_params: usize },

    /// A decomposition or solve failed.
    #[error("linear algebra error: {0}")]
    LinearAlgebraError(String),

    /// A predictor's p-value came out as NaN.
    #[error("p-value for predictor '{predictor}' is not finite at iteration {iteration}")]
    NonFinitePValue { predictor: String, iteration: usize },

    /// Backward elimination removed every predictor.
    #[error("every predictor was eliminated ({} removed); no model remains", .eliminated.len())]
    AllPredictorsEliminated { eliminated: Vec<EliminatedPredictor> },

    /// A fit inside the elimination loop failed.
    #[error("elimination iteration {iteration}: {source}")]
    Iteration {
        iteration: usize,
        #[source]
        source: Box<StepRegError>,
    },
}

/// Result type for stepreg operations.
pub type Result<T> = std::result::Result<T, StepRegError>;

impl StepRegError {
    /// Attach the elimination iteration to an error raised by a refit.
    pub(crate) fn at_iteration(self, iteration: usize) -> Self {
        match self {
            // Already carries its own context.
            err @ (StepRegError::Iteration { .. }
            | StepRegError::NonFinitePValue { .. }
            | StepRegError::AllPredictorsEliminated { .. }) => err,
            other => StepRegError::Iteration {
                iteration,
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_message_names_row_and_column() {
        let err = StepRegError::ParseCell {
            row: 3,
            column: "sales".to_string(),
            value: "n/a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("'sales'"));
        assert!(msg.contains("'n/a'"));
    }

    #[test]
    fn test_at_iteration_wraps_once() {
        let err = StepRegError::LinearAlgebraError("singular".to_string())
            .at_iteration(2)
            .at_iteration(5);
        match err {
            StepRegError::Iteration { iteration, source } => {
                assert_eq!(iteration, 2);
                assert!(matches!(*source, StepRegError::LinearAlgebraError(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
