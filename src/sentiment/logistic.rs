//! Binary logistic regression over sparse count vectors
//!
//! Batch gradient descent on the mean log loss with an L2 penalty. The
//! penalty strength follows the inverse-regularization convention
//! `alpha = 1 / (C * n_samples)`.

use ndarray::Array1;
use tracing::debug;

use crate::nlp::SparseVector;
use crate::sentiment::classifier::ClassifierError;

/// Logistic Regression classifier
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Fitted coefficients
    pub coefficients: Option<Array1<f64>>,
    /// Intercept term
    pub intercept: Option<f64>,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    /// Inverse regularization strength
    c: f64,
    /// Cost per iteration of the last fit
    pub cost_history: Vec<f64>,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.1, 500, 1e-6, 1.0)
    }
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iter: usize, tolerance: f64, c: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            c,
            cost_history: Vec::new(),
        }
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn linear(weights: &Array1<f64>, bias: f64, row: &SparseVector) -> f64 {
        bias + row.iter().map(|&(idx, value)| weights[idx] * value).sum::<f64>()
    }

    fn log_loss(y_true: &Array1<f64>, y_pred: &[f64]) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;

        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p = p.clamp(eps, 1.0 - eps);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>()
            / n
    }

    /// Fit on `n_features`-wide rows with 0/1 targets
    pub fn fit(
        &mut self,
        x: &[SparseVector],
        y: &Array1<f64>,
        n_features: usize,
    ) -> Result<(), ClassifierError> {
        if x.len() != y.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        if x.is_empty() {
            return Err(ClassifierError::InsufficientData {
                labeled: 0,
                required: 1,
            });
        }
        let widest = x.iter().filter_map(|row| row.last()).map(|&(idx, _)| idx).max();
        if let Some(idx) = widest.filter(|idx| *idx >= n_features) {
            return Err(ClassifierError::DimensionMismatch {
                expected: n_features,
                got: idx + 1,
            });
        }

        let n_samples = x.len() as f64;
        let alpha = 1.0 / (self.c * n_samples);

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0;
        self.cost_history.clear();

        for iter in 0..self.max_iter {
            let predictions: Vec<f64> = x
                .iter()
                .map(|row| Self::sigmoid(Self::linear(&weights, bias, row)))
                .collect();

            let mut dw = Array1::<f64>::zeros(n_features);
            let mut db = 0.0;
            for ((row, &p), &target) in x.iter().zip(predictions.iter()).zip(y.iter()) {
                let error = p - target;
                for &(idx, value) in row {
                    dw[idx] += error * value;
                }
                db += error;
            }
            dw /= n_samples;
            db /= n_samples;

            dw = &dw + &(&weights * alpha);

            weights = &weights - &(&dw * self.learning_rate);
            bias -= self.learning_rate * db;

            let penalty = 0.5 * alpha * weights.dot(&weights);
            let cost = Self::log_loss(y, &predictions) + penalty;
            self.cost_history.push(cost);

            if iter > 0 && (self.cost_history[iter - 1] - cost).abs() < self.tolerance {
                debug!("Converged at iteration {}", iter);
                break;
            }
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);

        Ok(())
    }

    /// Probability of the positive class
    pub fn predict_proba(&self, row: &SparseVector) -> Result<f64, ClassifierError> {
        let weights = self.coefficients.as_ref().ok_or(ClassifierError::NotFitted)?;
        let bias = self.intercept.ok_or(ClassifierError::NotFitted)?;

        if let Some(&(idx, _)) = row.last() {
            if idx >= weights.len() {
                return Err(ClassifierError::DimensionMismatch {
                    expected: weights.len(),
                    got: idx + 1,
                });
            }
        }

        Ok(Self::sigmoid(Self::linear(weights, bias, row)))
    }

    /// Predict class labels (0 or 1)
    pub fn predict(&self, x: &[SparseVector]) -> Result<Vec<f64>, ClassifierError> {
        x.iter()
            .map(|row| Ok(if self.predict_proba(row)? >= 0.5 { 1.0 } else { 0.0 }))
            .collect()
    }

    /// Share of rows predicted correctly
    pub fn score(&self, x: &[SparseVector], y: &Array1<f64>) -> Result<f64, ClassifierError> {
        if x.is_empty() {
            return Err(ClassifierError::InsufficientData {
                labeled: 0,
                required: 1,
            });
        }
        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, a)| (*p - *a).abs() < 0.5)
            .count();
        Ok(correct as f64 / x.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<SparseVector>, Array1<f64>) {
        // feature 0 marks the positive class, feature 1 the negative one
        let x = vec![
            vec![(0, 1.0)],
            vec![(0, 2.0)],
            vec![(0, 1.0), (2, 1.0)],
            vec![(1, 1.0)],
            vec![(1, 2.0)],
            vec![(1, 1.0), (2, 1.0)],
        ];
        let y = Array1::from_vec(vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        (x, y)
    }

    #[test]
    fn test_sigmoid() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-10);
        assert!(LogisticRegression::sigmoid(100.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-100.0) < 0.01);
    }

    #[test]
    fn test_logistic_regression_fit() {
        let (x, y) = separable();

        let mut model = LogisticRegression::default();
        model.fit(&x, &y, 3).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);

        let coef = model.coefficients.as_ref().unwrap();
        assert!(coef[0] > 0.0);
        assert!(coef[1] < 0.0);
    }

    #[test]
    fn test_stronger_regularization_shrinks_weights() {
        let (x, y) = separable();

        let mut loose = LogisticRegression::new(0.1, 500, 1e-9, 10.0);
        let mut tight = LogisticRegression::new(0.1, 500, 1e-9, 0.5);
        loose.fit(&x, &y, 3).unwrap();
        tight.fit(&x, &y, 3).unwrap();

        let norm = |m: &LogisticRegression| {
            let c = m.coefficients.as_ref().unwrap();
            c.dot(c).sqrt()
        };
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = LogisticRegression::default();
        let err = model.predict_proba(&vec![(0, 1.0)]).unwrap_err();
        assert!(matches!(err, ClassifierError::NotFitted));
    }

    #[test]
    fn test_dimension_mismatch() {
        let (x, y) = separable();
        let mut model = LogisticRegression::default();

        let err = model.fit(&x, &y, 2).unwrap_err();
        assert!(matches!(err, ClassifierError::DimensionMismatch { .. }));
    }
}
