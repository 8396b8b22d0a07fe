// =============================================================================
// Analysis Pipeline
// =============================================================================
//
// The complete run, in order:
//
//   1. Correlation scan over every numeric column (dependent included)
//   2. OLS of the dependent column on every predictor
//   3. Backward elimination down to significant predictors
//   4. Forecast model from the final fit
//
// Everything is collected into an `AnalysisReport`, which serializes to JSON
// and renders as text.
//
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::correlation::{scan, CorrelationConfig, CorrelationPair};
use crate::data::Dataset;
use crate::error::{Result, StepRegError};
use crate::forecast::{ForecastModel, DEFAULT_CONSTANT_NAME};
use crate::report::{percent, FitSummary};
use crate::selection::{backward_eliminate, EliminatedPredictor, EliminationConfig};

// =============================================================================
// Configuration
// =============================================================================

/// Options for a complete analysis.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub correlation: CorrelationConfig,
    pub elimination: EliminationConfig,
    /// Label of the intercept in summaries and the forecast model.
    /// Default: "constant"
    pub constant_name: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            correlation: CorrelationConfig::default(),
            elimination: EliminationConfig::default(),
            constant_name: DEFAULT_CONSTANT_NAME.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        self.correlation.validate()?;
        self.elimination.validate()?;
        if self.constant_name.trim().is_empty() {
            return Err(StepRegError::InvalidValue(
                "constant name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Report
// =============================================================================

/// A predictor's p-value, by title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorPValue {
    pub name: String,
    pub p_value: f64,
}

/// Everything produced by [`run_analysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub dependent: String,
    pub n_obs: usize,
    pub significance_level: f64,
    pub correlation_threshold: f64,
    /// Significant correlation pairs, upper-triangle order.
    pub correlations: Vec<CorrelationPair>,
    /// Predictor p-values of the fit on every candidate.
    pub initial_pvalues: Vec<PredictorPValue>,
    /// Removed predictors in removal order.
    pub eliminated: Vec<EliminatedPredictor>,
    /// Number of OLS fits performed by elimination.
    pub iterations: usize,
    /// Summary of the final fit.
    pub final_fit: FitSummary,
    /// Surviving predictors with their final p-values.
    pub model_items: Vec<PredictorPValue>,
    /// Constant and surviving coefficients.
    pub forecast_model: ForecastModel,
}

/// Run the full pipeline on a dataset.
///
/// # Errors
/// Config validation errors, anything from the correlation scan, and every
/// fit or degenerate-model error raised by backward elimination.
pub fn run_analysis(data: &Dataset, config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    info!(
        rows = data.n_obs(),
        predictors = data.predictors.len(),
        dependent = %data.dependent_title,
        "starting analysis"
    );

    let titles = data.numeric_titles();
    let (_, correlations) = scan(data.numeric_matrix().view(), &titles, &config.correlation)?;
    info!(pairs = correlations.len(), "correlation scan complete");

    let outcome = backward_eliminate(&data.y, &data.predictors, &config.elimination)?;

    let initial_pvalues = data
        .predictors
        .names()
        .iter()
        .zip(outcome.initial_fit.predictor_pvalues().iter())
        .map(|(name, &p_value)| PredictorPValue {
            name: name.clone(),
            p_value,
        })
        .collect();

    let kept = outcome.kept_names();
    let model_items = kept
        .iter()
        .zip(outcome.final_fit.predictor_pvalues().iter())
        .map(|(name, &p_value)| PredictorPValue {
            name: name.clone(),
            p_value,
        })
        .collect();

    let forecast_model = ForecastModel::from_fit(&outcome.final_fit, kept, &config.constant_name)?;
    let final_fit = FitSummary::from_fit(
        &outcome.final_fit,
        &data.dependent_title,
        kept,
        &config.constant_name,
    );

    info!(
        kept = kept.len(),
        eliminated = outcome.eliminated.len(),
        r_squared = outcome.final_fit.r_squared,
        "analysis complete"
    );

    Ok(AnalysisReport {
        dependent: data.dependent_title.clone(),
        n_obs: data.n_obs(),
        significance_level: config.elimination.significance_level,
        correlation_threshold: config.correlation.threshold,
        correlations,
        initial_pvalues,
        eliminated: outcome.eliminated,
        iterations: outcome.iterations,
        final_fit,
        model_items,
        forecast_model,
    })
}

// =============================================================================
// Text Rendering
// =============================================================================

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Significant Correlation Coefficients:")?;
        if self.correlations.is_empty() {
            writeln!(f, "  (none with |r| > {})", self.correlation_threshold)?;
        }
        for pair in &self.correlations {
            writeln!(f, "['{}', '{}', {}]", pair.first, pair.second, pair.coefficient)?;
        }
        writeln!(f)?;

        writeln!(f, "Initial p-values:")?;
        for item in &self.initial_pvalues {
            writeln!(f, "  {}: {:.6}", item.name, item.p_value)?;
        }
        writeln!(f)?;

        writeln!(f, "Eliminated items (p > {}):", self.significance_level)?;
        if self.eliminated.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for item in &self.eliminated {
            writeln!(
                f,
                "  {}. {}: p = {:.6}",
                item.iteration, item.title, item.p_value
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{}", self.final_fit)?;
        writeln!(f)?;

        writeln!(f, "Model items:")?;
        for item in &self.model_items {
            writeln!(f, "{}: P value = {}%", item.name, percent(item.p_value))?;
        }
        writeln!(f)?;

        writeln!(f, "Forecast model:")?;
        for term in self.forecast_model.terms() {
            writeln!(f, "  {}: {}", term.name, term.coefficient)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// 16 rows: sales = 5 + 3·trend + 0.1·weather + 4·promo + noise.
    /// `weather` and `junk` are orthogonal to everything else; weather's small
    /// effect gives it p ≈ 0.3 while junk sits at p = 1.
    fn sample_csv() -> String {
        let mut csv = String::from("date,sales,trend,weather,promo,junk\n");
        for i in 0..16usize {
            let trend = i as f64;
            let weather = [1.0, -1.0, -1.0, 1.0][i % 4];
            let promo = [1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0][i % 8];
            let junk = [1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0][i % 8];
            let noise = if i % 2 == 0 { 0.3 } else { -0.3 };
            let sales = 5.0 + 3.0 * trend + 0.1 * weather + 4.0 * promo + noise;
            csv.push_str(&format!(
                "2024-01-{:02},{sales},{trend},{weather},{promo},{junk}\n",
                i + 1
            ));
        }
        csv
    }

    fn sample() -> Dataset {
        Dataset::from_csv_reader(sample_csv().as_bytes()).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let report = run_analysis(&sample(), &AnalysisConfig::default()).unwrap();

        assert_eq!(report.dependent, "sales");
        assert_eq!(report.n_obs, 16);
        assert_eq!(report.initial_pvalues.len(), 4);

        let kept: Vec<&str> = report.model_items.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(kept, vec!["trend", "promo"]);
        assert!(report.model_items.iter().all(|m| m.p_value <= 0.05));

        let removed: Vec<&str> = report.eliminated.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(removed, vec!["junk", "weather"]);
        assert!(report.eliminated[0].p_value > report.eliminated[1].p_value);
        assert!(report.eliminated[1].p_value > 0.05);
        assert_eq!(report.iterations, 3);

        assert_eq!(report.forecast_model.len(), kept.len() + 1);
        assert_eq!(report.forecast_model.terms()[0].name, "constant");
        assert!((report.forecast_model.coefficient("promo").unwrap() - 4.0).abs() < 0.1);
    }

    #[test]
    fn test_correlations_include_dependent() {
        let report = run_analysis(&sample(), &AnalysisConfig::default()).unwrap();
        assert!(report
            .correlations
            .iter()
            .any(|p| p.first == "sales" && p.second == "trend"));
        assert!(report.correlations.iter().all(|p| p.first != p.second));
    }

    #[test]
    fn test_custom_constant_name() {
        let config = AnalysisConfig {
            constant_name: "intercept".to_string(),
            ..AnalysisConfig::default()
        };
        let report = run_analysis(&sample(), &config).unwrap();
        assert_eq!(report.forecast_model.terms()[0].name, "intercept");
        assert_eq!(report.final_fit.coefficients[0].name, "intercept");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig {
            constant_name: "  ".to_string(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            run_analysis(&sample(), &config),
            Err(StepRegError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_text_rendering() {
        let text = run_analysis(&sample(), &AnalysisConfig::default())
            .unwrap()
            .to_string();
        assert!(text.starts_with("Significant Correlation Coefficients:"));
        assert!(text.contains("Eliminated items"));
        assert!(text.contains("OLS Regression Results"));
        assert!(text.contains("Model items:"));
        assert!(text.contains("trend: P value = "));
        assert!(text.contains("Forecast model:"));
        assert!(text.contains("constant: "));
    }

    #[test]
    fn test_json_roundtrip() {
        let report = run_analysis(&sample(), &AnalysisConfig::default()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.forecast_model.len(), report.forecast_model.len());
        for (a, b) in back.forecast_model.terms().iter().zip(report.forecast_model.terms()) {
            assert_eq!(a.name, b.name);
            assert!((a.coefficient - b.coefficient).abs() <= 1e-12 * b.coefficient.abs().max(1.0));
        }
        let titles: Vec<&str> = back.eliminated.iter().map(|e| e.title.as_str()).collect();
        let expected: Vec<&str> = report.eliminated.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, expected);
    }
}
