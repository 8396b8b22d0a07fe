//! Forecast model: the surviving coefficients in a portable form.
//!
//! The first term is always the intercept, labelled `"constant"` unless
//! configured otherwise; each following term pairs a surviving predictor
//! with its coefficient, in model column order.
//!
//! ```text
//! forecast = constant + Σ coefficientᵢ × valueᵢ
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepRegError};
use crate::solvers::OlsResult;

/// Default label for the intercept term.
pub const DEFAULT_CONSTANT_NAME: &str = "constant";

/// One term of the forecast model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTerm {
    pub name: String,
    #[serde(rename = "coef")]
    pub coefficient: f64,
}

/// Ordered `{name, coefficient}` terms, constant first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastModel {
    terms: Vec<ForecastTerm>,
}

impl ForecastModel {
    /// Zip `params` (intercept first) with predictor titles.
    ///
    /// `params.len()` must be `names.len() + 1`.
    pub fn from_params(params: &[f64], names: &[String], constant_name: &str) -> Result<Self> {
        if params.len() != names.len() + 1 {
            return Err(StepRegError::DimensionMismatch(format!(
                "{} parameters for {} predictors (expected {})",
                params.len(),
                names.len(),
                names.len() + 1
            )));
        }

        let terms = std::iter::once(ForecastTerm {
            name: constant_name.to_string(),
            coefficient: params[0],
        })
        .chain(names.iter().zip(&params[1..]).map(|(name, &coefficient)| ForecastTerm {
            name: name.clone(),
            coefficient,
        }))
        .collect();

        Ok(Self { terms })
    }

    /// Build from a fitted model and the titles of its predictors.
    pub fn from_fit(fit: &OlsResult, names: &[String], constant_name: &str) -> Result<Self> {
        Self::from_params(&fit.params.to_vec(), names, constant_name)
    }

    pub fn terms(&self) -> &[ForecastTerm] {
        &self.terms
    }

    /// Number of terms, constant included.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always false for a model built by this module; the constant is present.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The intercept.
    pub fn constant(&self) -> f64 {
        self.terms.first().map_or(0.0, |t| t.coefficient)
    }

    /// Predictor terms, constant excluded.
    pub fn predictors(&self) -> &[ForecastTerm] {
        self.terms.get(1..).unwrap_or(&[])
    }

    /// Coefficient of the predictor titled `name`.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.predictors()
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.coefficient)
    }

    /// Forecast for one row of predictor values, in model column order.
    pub fn predict(&self, values: &[f64]) -> Result<f64> {
        let predictors = self.predictors();
        if values.len() != predictors.len() {
            return Err(StepRegError::DimensionMismatch(format!(
                "model has {} predictors but {} values were given",
                predictors.len(),
                values.len()
            )));
        }
        Ok(predictors
            .iter()
            .zip(values)
            .fold(self.constant(), |acc, (term, v)| acc + term.coefficient * v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_constant_first_then_predictors_in_order() {
        let model = ForecastModel::from_params(&[1.5, 2.0, -0.5], &names(&["price", "ads"]), "constant").unwrap();

        assert_eq!(model.len(), 3);
        assert_eq!(model.terms()[0].name, "constant");
        assert_eq!(model.terms()[0].coefficient, 1.5);
        assert_eq!(model.terms()[1].name, "price");
        assert_eq!(model.terms()[2].name, "ads");
        assert_eq!(model.coefficient("ads"), Some(-0.5));
        assert_eq!(model.coefficient("constant"), None);
    }

    #[test]
    fn test_length_is_predictors_plus_one() {
        for k in 0..4 {
            let params = vec![0.0; k + 1];
            let titles: Vec<String> = (0..k).map(|i| format!("x{i}")).collect();
            let model = ForecastModel::from_params(&params, &titles, DEFAULT_CONSTANT_NAME).unwrap();
            assert_eq!(model.len(), titles.len() + 1);
        }
    }

    #[test]
    fn test_mismatched_lengths() {
        assert!(ForecastModel::from_params(&[1.0, 2.0], &names(&["a", "b"]), "constant").is_err());
    }

    #[test]
    fn test_predict() {
        let model = ForecastModel::from_params(&[1.0, 2.0, -3.0], &names(&["a", "b"]), "constant").unwrap();
        assert_abs_diff_eq!(model.predict(&[4.0, 0.5]).unwrap(), 1.0 + 8.0 - 1.5, epsilon = 1e-12);
        assert!(model.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_json_shape() {
        let model = ForecastModel::from_params(&[1.0, 2.0], &names(&["a"]), "constant").unwrap();
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "constant", "coef": 1.0},
                {"name": "a", "coef": 2.0}
            ])
        );
        let back: ForecastModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, model);
    }
}
