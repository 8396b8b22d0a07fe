//! Named predictor columns.
//!
//! `PredictorSet` keeps predictor titles and the predictor matrix in one
//! value. Columns are only ever removed through [`PredictorSet::remove`],
//! which drops the title and the column together, so
//! `names().len() == matrix().ncols()` always holds. Titles are unique.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::first_duplicate;
use crate::error::{Result, StepRegError};
use crate::solvers::drop_column;

/// An ordered set of named predictor columns over a fixed set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorSet {
    names: Vec<String>,
    matrix: Array2<f64>,
}

impl PredictorSet {
    /// Build from titles and an observations × predictors matrix.
    pub fn new(names: Vec<String>, matrix: Array2<f64>) -> Result<Self> {
        if names.len() != matrix.ncols() {
            return Err(StepRegError::DimensionMismatch(format!(
                "{} predictor names for {} columns",
                names.len(),
                matrix.ncols()
            )));
        }
        reject_duplicates(&names)?;
        Ok(Self { names, matrix })
    }

    /// Build from `(title, column)` pairs. All columns must have the same length.
    pub fn from_columns<I>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Array1<f64>)>,
    {
        let (names, cols): (Vec<String>, Vec<Array1<f64>>) = columns.into_iter().unzip();
        let n_obs = cols.first().map_or(0, |c| c.len());
        if let Some((name, col)) = names.iter().zip(&cols).find(|(_, c)| c.len() != n_obs) {
            return Err(StepRegError::DimensionMismatch(format!(
                "column '{}' has {} rows, expected {}",
                name,
                col.len(),
                n_obs
            )));
        }
        reject_duplicates(&names)?;

        let mut matrix = Array2::zeros((n_obs, cols.len()));
        for (j, col) in cols.iter().enumerate() {
            matrix.column_mut(j).assign(col);
        }
        Ok(Self { names, matrix })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    pub fn column(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.len()).then(|| self.matrix.column(index))
    }

    /// Index of the predictor titled `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Number of predictors.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn n_obs(&self) -> usize {
        self.matrix.nrows()
    }

    /// Remove predictor `index`, returning its title and values.
    pub fn remove(&mut self, index: usize) -> Result<(String, Array1<f64>)> {
        if index >= self.len() {
            return Err(StepRegError::DimensionMismatch(format!(
                "cannot remove predictor {} of {}",
                index,
                self.len()
            )));
        }
        let values = self.matrix.index_axis(Axis(1), index).to_owned();
        self.matrix = drop_column(self.matrix.view(), index);
        let name = self.names.remove(index);
        Ok((name, values))
    }

    /// Iterate `(title, column)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.matrix.columns())
    }
}

fn reject_duplicates(names: &[String]) -> Result<()> {
    match first_duplicate(names) {
        Some(dup) => Err(StepRegError::DuplicateColumn(dup.to_string())),
        None => Ok(()),
    }
}
