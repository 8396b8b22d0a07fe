// =============================================================================
// Tabular Input
// =============================================================================
//
// Reads the regression dataset from CSV. The expected layout is:
//
//     date,       sales, price, ads,  temp
//     2024-01-01, 120.5, 9.99,  30.0, 4.1
//     ...
//
//   - column 0: an identifier (usually a date). Kept as text, never used
//               numerically.
//   - column 1: the dependent variable y.
//   - columns 2..: predictor candidates.
//
// Every numeric cell must parse as f64. A bad cell stops the load with its
// row and column; nothing is silently replaced with NaN.
//
// =============================================================================

mod predictors;

pub use predictors::PredictorSet;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::{Result, StepRegError};

/// A loaded dataset: identifiers, dependent variable, and predictors.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Title of the identifier column.
    pub identifier_title: String,
    /// Title of the dependent column.
    pub dependent_title: String,
    /// Identifier cell of each row.
    pub identifiers: Vec<String>,
    /// Dependent variable.
    pub y: Array1<f64>,
    /// Predictor candidates.
    pub predictors: PredictorSet,
}

impl Dataset {
    /// Load a dataset from a CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening dataset");
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Load a dataset from any CSV source.
    pub fn from_csv_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        validate_headers(&headers)?;

        let n_cols = headers.len();
        let mut identifiers = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let row = index + 1;

            if record.len() != n_cols {
                return Err(StepRegError::RaggedRow {
                    row,
                    expected: n_cols,
                    found: record.len(),
                });
            }

            identifiers.push(record[0].to_string());
            for (column, cell) in headers.iter().zip(record.iter()).skip(1) {
                values.push(parse_cell(cell, row, column)?);
            }
        }

        if identifiers.is_empty() {
            return Err(StepRegError::EmptyInput("no data rows".to_string()));
        }

        let n_obs = identifiers.len();
        let numeric = Array2::from_shape_vec((n_obs, n_cols - 1), values).map_err(|e| {
            StepRegError::DimensionMismatch(format!("cannot shape numeric data: {e}"))
        })?;

        let y = numeric.column(0).to_owned();
        let predictor_matrix = numeric.slice(ndarray::s![.., 1..]).to_owned();
        let predictors = PredictorSet::new(headers[2..].to_vec(), predictor_matrix)?;

        debug!(
            rows = n_obs,
            predictors = predictors.len(),
            dependent = %headers[1],
            "dataset loaded"
        );

        Ok(Self {
            identifier_title: headers[0].clone(),
            dependent_title: headers[1].clone(),
            identifiers,
            y,
            predictors,
        })
    }

    /// Build a dataset from arrays. Row identifiers are the 1-based row numbers.
    pub fn from_parts(dependent_title: impl Into<String>, y: Array1<f64>, predictors: PredictorSet) -> Result<Self> {
        let dependent_title = dependent_title.into();
        if y.len() != predictors.n_obs() {
            return Err(StepRegError::DimensionMismatch(format!(
                "dependent '{}' has {} rows but predictors have {}",
                dependent_title,
                y.len(),
                predictors.n_obs()
            )));
        }
        let mut titles: Vec<String> = vec![dependent_title.clone()];
        titles.extend(predictors.names().iter().cloned());
        if let Some(dup) = first_duplicate(&titles) {
            return Err(StepRegError::DuplicateColumn(dup.to_string()));
        }
        Ok(Self {
            identifier_title: "row".to_string(),
            dependent_title,
            identifiers: (1..=y.len()).map(|i| i.to_string()).collect(),
            y,
            predictors,
        })
    }

    /// Number of observations.
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// Titles of every numeric column: dependent first, then predictors.
    pub fn numeric_titles(&self) -> Vec<String> {
        std::iter::once(self.dependent_title.clone())
            .chain(self.predictors.names().iter().cloned())
            .collect()
    }

    /// Every numeric column as an observations × variables matrix,
    /// dependent first.
    pub fn numeric_matrix(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.n_obs(), self.predictors.len() + 1));
        out.column_mut(0).assign(&self.y);
        out.slice_mut(ndarray::s![.., 1..]).assign(&self.predictors.matrix());
        out
    }
}

/// Header must name an identifier, a dependent, and at least one predictor,
/// with no title repeated.
fn validate_headers(headers: &[String]) -> Result<()> {
    if headers.len() < 3 {
        return Err(StepRegError::EmptyInput(format!(
            "expected an identifier column, a dependent column and at least one predictor; found {} column(s)",
            headers.len()
        )));
    }
    if let Some(dup) = first_duplicate(&headers[1..]) {
        return Err(StepRegError::DuplicateColumn(dup.to_string()));
    }
    Ok(())
}

fn first_duplicate(titles: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    titles
        .iter()
        .find(|t| !seen.insert(t.as_str()))
        .map(String::as_str)
}

fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64> {
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(StepRegError::ParseCell {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
date,sales,price,ads
2024-01-01,10.0,1.5,3
2024-01-02,12.5,1.4,4
2024-01-03,11.0,1.6,2
";

    #[test]
    fn test_load_splits_identifier_dependent_predictors() {
        let data = Dataset::from_csv_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(data.identifier_title, "date");
        assert_eq!(data.dependent_title, "sales");
        assert_eq!(data.identifiers, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(data.y, array![10.0, 12.5, 11.0]);
        assert_eq!(data.predictors.names(), &["price".to_string(), "ads".to_string()]);
        assert_eq!(data.predictors.matrix(), array![[1.5, 3.0], [1.4, 4.0], [1.6, 2.0]]);
    }

    #[test]
    fn test_numeric_matrix_puts_dependent_first() {
        let data = Dataset::from_csv_reader(SAMPLE.as_bytes()).unwrap();
        let m = data.numeric_matrix();
        assert_eq!(m.shape(), &[3, 3]);
        assert_eq!(m.column(0), data.y);
        assert_eq!(data.numeric_titles(), vec!["sales", "price", "ads"]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let csv = "date, y , x\n d1 , 1.0 , 2.0\nd2,3.0,  4.5\n";
        let data = Dataset::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(data.dependent_title, "y");
        assert_eq!(data.y, array![1.0, 3.0]);
        assert_eq!(data.identifiers[0], "d1");
    }

    #[test]
    fn test_bad_cell_reports_row_and_column() {
        let csv = "date,y,x\nd1,1.0,2.0\nd2,3.0,oops\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        match err {
            StepRegError::ParseCell { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "x");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_nan_cells_rejected() {
        let csv = "date,y,x\nd1,,2.0\n";
        assert!(matches!(
            Dataset::from_csv_reader(csv.as_bytes()),
            Err(StepRegError::ParseCell { .. })
        ));
        let csv = "date,y,x\nd1,NaN,2.0\n";
        assert!(matches!(
            Dataset::from_csv_reader(csv.as_bytes()),
            Err(StepRegError::ParseCell { .. })
        ));
    }

    #[test]
    fn test_ragged_row() {
        let csv = "date,y,x\nd1,1.0,2.0\nd2,3.0\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            StepRegError::RaggedRow { row: 2, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "date,y,x\n";
        assert!(matches!(
            Dataset::from_csv_reader(csv.as_bytes()),
            Err(StepRegError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_no_predictor_columns() {
        let csv = "date,y\nd1,1.0\n";
        assert!(matches!(
            Dataset::from_csv_reader(csv.as_bytes()),
            Err(StepRegError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_duplicate_titles_rejected() {
        let csv = "date,y,x,x\nd1,1.0,2.0,3.0\n";
        let err = Dataset::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, StepRegError::DuplicateColumn(ref t) if t == "x"));
    }

    #[test]
    fn test_from_csv_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();
        let data = Dataset::from_csv_path(file.path()).unwrap();
        assert_eq!(data.n_obs(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_csv_path("/nonexistent/stepreg/input.csv").unwrap_err();
        assert!(matches!(err, StepRegError::Io(_)));
    }

    #[test]
    fn test_from_parts() {
        let predictors = PredictorSet::new(vec!["x".into()], array![[1.0], [2.0]]).unwrap();
        let data = Dataset::from_parts("y", array![3.0, 4.0], predictors).unwrap();
        assert_eq!(data.identifiers, vec!["1", "2"]);

        let predictors = PredictorSet::new(vec!["y".into()], array![[1.0], [2.0]]).unwrap();
        assert!(matches!(
            Dataset::from_parts("y", array![3.0, 4.0], predictors),
            Err(StepRegError::DuplicateColumn(_))
        ));
    }
}
