// =============================================================================
// Regression Report
// =============================================================================
//
// Serializable snapshots of fitted models, and their text rendering.
//
// The summary table follows the layout of the statsmodels OLS summary:
//
//     ==============================================================
//     Dep. Variable:  sales            R-squared:            0.912
//     No. Observations:  36            Adj. R-squared:       0.905
//     ...
//     --------------------------------------------------------------
//                   coef   std err        t    P>|t|  [0.025  0.975]
//     constant    12.031     1.204    9.992    0.000   9.582  14.480 ***
//     price       -3.210     0.512   -6.270    0.000  -4.252  -2.168 ***
//     ==============================================================
//
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inference::significance_stars;
use crate::solvers::OlsResult;

/// Width of the summary table rules.
const RULE_WIDTH: usize = 86;

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub conf_lower: f64,
    pub conf_upper: f64,
}

/// A fitted OLS model reduced to what a summary shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub dependent: String,
    pub n_obs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub durbin_watson: f64,
    pub condition_number: f64,
    pub confidence: f64,
    pub coefficients: Vec<CoefficientRow>,
}

impl FitSummary {
    /// Label the parameters of `fit` and copy out the summary statistics.
    ///
    /// `names` are the predictor titles; the intercept is labelled
    /// `constant_name`. Missing titles fall back to `x1`, `x2`, ….
    pub fn from_fit(fit: &OlsResult, dependent: &str, names: &[String], constant_name: &str) -> Self {
        let coefficients = (0..fit.n_params())
            .map(|j| {
                let name = if j == 0 {
                    constant_name.to_string()
                } else {
                    names.get(j - 1).cloned().unwrap_or_else(|| format!("x{j}"))
                };
                let (conf_lower, conf_upper) = fit.conf_int[j];
                CoefficientRow {
                    name,
                    coef: fit.params[j],
                    std_err: fit.std_errors[j],
                    t_value: fit.t_values[j],
                    p_value: fit.p_values[j],
                    conf_lower,
                    conf_upper,
                }
            })
            .collect();

        Self {
            dependent: dependent.to_string(),
            n_obs: fit.n_obs,
            df_model: fit.df_model,
            df_resid: fit.df_resid,
            r_squared: fit.r_squared,
            adj_r_squared: fit.adj_r_squared,
            f_statistic: fit.f_statistic,
            f_pvalue: fit.f_pvalue,
            log_likelihood: fit.log_likelihood,
            aic: fit.aic,
            bic: fit.bic,
            durbin_watson: fit.durbin_watson,
            condition_number: fit.condition_number,
            confidence: fit.confidence,
            coefficients,
        }
    }

    /// Rows of the predictors only.
    pub fn predictor_rows(&self) -> &[CoefficientRow] {
        self.coefficients.get(1..).unwrap_or(&[])
    }
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "{:^width$}", "OLS Regression Results", width = RULE_WIDTH)?;
        writeln!(f, "{heavy}")?;
        writeln!(
            f,
            "{:<20}{:>22}   {:<20}{:>21.4}",
            "Dep. Variable:", self.dependent, "R-squared:", self.r_squared
        )?;
        writeln!(
            f,
            "{:<20}{:>22}   {:<20}{:>21.4}",
            "No. Observations:", self.n_obs, "Adj. R-squared:", self.adj_r_squared
        )?;
        writeln!(
            f,
            "{:<20}{:>22}   {:<20}{:>21.4}",
            "Df Residuals:", self.df_resid, "F-statistic:", self.f_statistic
        )?;
        writeln!(
            f,
            "{:<20}{:>22}   {:<20}{:>21.4e}",
            "Df Model:", self.df_model, "Prob (F-statistic):", self.f_pvalue
        )?;
        writeln!(
            f,
            "{:<20}{:>22.3}   {:<20}{:>21.3}",
            "Log-Likelihood:", self.log_likelihood, "AIC:", self.aic
        )?;
        writeln!(f, "{:<20}{:>22}   {:<20}{:>21.3}", "", "", "BIC:", self.bic)?;
        writeln!(f, "{light}")?;

        let alpha = 1.0 - self.confidence;
        let lower = format!("[{:.3}", alpha / 2.0);
        let upper = format!("{:.3}]", 1.0 - alpha / 2.0);
        writeln!(
            f,
            "{:<20}{:>11}{:>11}{:>11}{:>10}{:>11}{:>11}",
            "", "coef", "std err", "t", "P>|t|", lower, upper
        )?;
        for row in &self.coefficients {
            writeln!(
                f,
                "{:<20}{:>11.4}{:>11.4}{:>11.3}{:>10.3}{:>11.3}{:>11.3} {}",
                truncate(&row.name, 19),
                row.coef,
                row.std_err,
                row.t_value,
                row.p_value,
                row.conf_lower,
                row.conf_upper,
                significance_stars(row.p_value)
            )?;
        }
        writeln!(f, "{light}")?;
        writeln!(
            f,
            "{:<20}{:>22.3}   {:<20}{:>21.3e}",
            "Durbin-Watson:", self.durbin_watson, "Cond. No.", self.condition_number
        )?;
        writeln!(f, "{heavy}")?;
        write!(f, "Signif. codes: 0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1")
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max - 1).collect();
        short.push('~');
        short
    }
}

/// P-value as a percentage rounded to four decimals.
pub fn percent(p_value: f64) -> f64 {
    (p_value * 100.0 * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::fit_ols;
    use ndarray::array;

    fn sample_summary() -> FitSummary {
        let x = array![[1.0, 0.5], [2.0, -0.3], [3.0, 0.8], [4.0, 0.1], [5.0, -0.6], [6.0, 0.2]];
        let y = array![2.0, 4.1, 6.3, 7.9, 9.6, 12.2];
        let fit = fit_ols(&y, x.view()).unwrap();
        FitSummary::from_fit(&fit, "sales", &["trend".to_string(), "shock".to_string()], "constant")
    }

    #[test]
    fn test_rows_are_labelled_constant_first() {
        let summary = sample_summary();
        let labels: Vec<&str> = summary.coefficients.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(labels, vec!["constant", "trend", "shock"]);
        assert_eq!(summary.predictor_rows().len(), 2);
        assert_eq!(summary.df_model, 2);
    }

    #[test]
    fn test_missing_names_fall_back() {
        let x = array![[1.0], [2.0], [3.0], [4.5]];
        let y = array![1.0, 2.2, 2.9, 4.4];
        let fit = fit_ols(&y, x.view()).unwrap();
        let summary = FitSummary::from_fit(&fit, "y", &[], "const");
        assert_eq!(summary.coefficients[0].name, "const");
        assert_eq!(summary.coefficients[1].name, "x1");
    }

    #[test]
    fn test_display_contains_sections() {
        let text = sample_summary().to_string();
        assert!(text.contains("OLS Regression Results"));
        assert!(text.contains("Dep. Variable:"));
        assert!(text.contains("sales"));
        assert!(text.contains("R-squared:"));
        assert!(text.contains("[0.025"));
        assert!(text.contains("0.975]"));
        assert!(text.contains("trend"));
        assert!(text.contains("Durbin-Watson:"));
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("short", 19), "short");
        let long = "a_really_long_predictor_name";
        let cut = truncate(long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('~'));
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0.0123456789), 1.2346);
        assert_eq!(percent(0.05), 5.0);
    }
}
