// =============================================================================
// Correlation Screening
// =============================================================================
//
// Before regressing, it helps to see which variables move together:
//   - a predictor strongly correlated with the dependent variable is a good
//     candidate to survive elimination;
//   - two predictors strongly correlated with each other carry overlapping
//     information, and one of them will usually be eliminated.
//
// The Pearson correlation matrix is symmetric with ones on the diagonal, so
// only the strict upper triangle is scanned. Each unordered pair is reported
// at most once and a variable is never paired with itself.
//
// =============================================================================

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, StepRegError};

/// Options for the significant-pair scan.
#[derive(Debug, Clone)]
pub struct CorrelationConfig {
    /// Pairs with |r| strictly greater than this are reported.
    /// Default: 0.5
    pub threshold: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl CorrelationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(StepRegError::InvalidValue(format!(
                "correlation threshold must be in [0, 1), got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// A pair of variables whose correlation passed the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

/// Pearson correlation matrix of the columns of `data`.
///
/// `data` is observations × variables. Entry `(i, j)` is the correlation of
/// variable i with variable j. A column with zero variance has no defined
/// correlation; its row and column are NaN, including the diagonal entry.
pub fn correlation_matrix(data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let n = data.nrows();
    if n < 2 {
        return Err(StepRegError::EmptyInput(format!(
            "correlation needs at least 2 observations, got {n}"
        )));
    }

    let means = data
        .mean_axis(Axis(0))
        .ok_or_else(|| StepRegError::EmptyInput("no observations".to_string()))?;
    let centered = &data - &means;

    // Cross-product matrix; the 1/(n-1) factors cancel in the ratio
    let cross = centered.t().dot(&centered);
    let norms = cross.diag().mapv(f64::sqrt);

    let k = cross.nrows();
    let corr = Array2::from_shape_fn((k, k), |(i, j)| {
        let denom = norms[i] * norms[j];
        if denom == 0.0 {
            f64::NAN
        } else {
            // Rounding can push |r| a hair past 1
            (cross[[i, j]] / denom).clamp(-1.0, 1.0)
        }
    });
    Ok(corr)
}

/// Pairs of distinct variables with |r| above the threshold.
///
/// Pairs come out in row-major upper-triangle order: (0,1), (0,2), …, (1,2), …
///
/// # Arguments
/// * `corr` - Square correlation matrix
/// * `names` - Variable titles, one per row of `corr`
/// * `config` - Threshold options
pub fn significant_pairs(
    corr: &Array2<f64>,
    names: &[String],
    config: &CorrelationConfig,
) -> Result<Vec<CorrelationPair>> {
    config.validate()?;

    let k = corr.nrows();
    if corr.ncols() != k || names.len() != k {
        return Err(StepRegError::DimensionMismatch(format!(
            "correlation matrix is {}x{} with {} names",
            corr.nrows(),
            corr.ncols(),
            names.len()
        )));
    }

    for (i, name) in names.iter().enumerate() {
        if corr[[i, i]].is_nan() {
            warn!(column = %name, "column has zero variance; its correlations are undefined");
        }
    }

    let mut pairs = Vec::new();
    for i in 0..k {
        for j in (i + 1)..k {
            let r = corr[[i, j]];
            // NaN fails the comparison and is skipped
            if r.abs() > config.threshold {
                pairs.push(CorrelationPair {
                    first: names[i].clone(),
                    second: names[j].clone(),
                    coefficient: r,
                });
            }
        }
    }
    Ok(pairs)
}

/// Correlation matrix and significant pairs in one call.
pub fn scan(
    data: ArrayView2<'_, f64>,
    names: &[String],
    config: &CorrelationConfig,
) -> Result<(Array2<f64>, Vec<CorrelationPair>)> {
    let corr = correlation_matrix(data)?;
    let pairs = significant_pairs(&corr, names, config)?;
    Ok((corr, pairs))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_perfect_and_inverse_correlation() {
        let data = array![[1.0, 2.0, 10.0], [2.0, 4.0, 8.0], [3.0, 6.0, 6.0], [4.0, 8.0, 4.0]];
        let corr = correlation_matrix(data.view()).unwrap();

        assert_abs_diff_eq!(corr[[0, 1]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corr[[0, 2]], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corr[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let data = array![[1.0, 0.3, 5.0], [2.0, -0.1, 4.0], [3.5, 0.8, 4.5], [4.0, 0.0, 1.0], [6.0, 0.4, 2.0]];
        let corr = correlation_matrix(data.view()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(corr[[i, j]], corr[[j, i]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_known_value() {
        // r = Sxy / sqrt(Sxx Syy) = 10 / sqrt(10 * 14.8)
        let data = array![[1.0, 2.0], [2.0, 1.0], [3.0, 4.0], [4.0, 3.0], [5.0, 6.0]];
        let corr = correlation_matrix(data.view()).unwrap();
        assert_abs_diff_eq!(corr[[0, 1]], 10.0 / (10.0f64 * 14.8).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_pairs_are_deduplicated_and_exclude_self() {
        let data = array![
            [1.0, 2.1, 9.0, 0.5],
            [2.0, 3.9, 7.5, -0.2],
            [3.0, 6.2, 6.1, 0.9],
            [4.0, 8.1, 4.2, 0.1],
            [5.0, 9.8, 2.0, -0.4]
        ];
        let titles = names(&["y", "a", "b", "c"]);
        let (_, pairs) = scan(data.view(), &titles, &CorrelationConfig::default()).unwrap();

        let mut seen = HashSet::new();
        for pair in &pairs {
            assert_ne!(pair.first, pair.second);
            assert!(pair.coefficient.abs() > 0.5);
            let key = if pair.first < pair.second {
                (pair.first.clone(), pair.second.clone())
            } else {
                (pair.second.clone(), pair.first.clone())
            };
            assert!(seen.insert(key), "pair reported twice: {pair:?}");
        }
        // y, a, b are all strongly (anti-)correlated with each other
        assert!(pairs.iter().any(|p| p.first == "y" && p.second == "a"));
        assert!(pairs.iter().any(|p| p.first == "a" && p.second == "b" && p.coefficient < 0.0));
    }

    #[test]
    fn test_pair_order_is_upper_triangle() {
        let data = array![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [3.0, 3.0, 3.5]];
        let titles = names(&["p", "q", "r"]);
        let (_, pairs) = scan(data.view(), &titles, &CorrelationConfig::default()).unwrap();
        let order: Vec<(&str, &str)> = pairs
            .iter()
            .map(|p| (p.first.as_str(), p.second.as_str()))
            .collect();
        assert_eq!(order, vec![("p", "q"), ("p", "r"), ("q", "r")]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let corr = array![[1.0, 0.5], [0.5, 1.0]];
        let pairs = significant_pairs(&corr, &names(&["a", "b"]), &CorrelationConfig::default()).unwrap();
        assert!(pairs.is_empty());

        let corr = array![[1.0, -0.5000001], [-0.5000001, 1.0]];
        let pairs = significant_pairs(&corr, &names(&["a", "b"]), &CorrelationConfig::default()).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_constant_column_gives_nan_and_no_pairs() {
        let data = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        let corr = correlation_matrix(data.view()).unwrap();
        assert!(corr[[0, 1]].is_nan());
        assert!(corr[[1, 1]].is_nan());

        let pairs = significant_pairs(&corr, &names(&["a", "flat"]), &CorrelationConfig::default()).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_shape_and_config_errors() {
        let corr = array![[1.0, 0.9], [0.9, 1.0]];
        assert!(significant_pairs(&corr, &names(&["a"]), &CorrelationConfig::default()).is_err());
        assert!(significant_pairs(&corr, &names(&["a", "b"]), &CorrelationConfig { threshold: 1.5 }).is_err());
        assert!(correlation_matrix(array![[1.0, 2.0]].view()).is_err());
    }
}
