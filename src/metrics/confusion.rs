use std::error::Error;

use nalgebra::{DMatrix, DVector};

use crate::data::dataset::Label;

/// Rows are true labels, columns are predicted labels, both indexed by label value.
type ConfusionMatrix = DMatrix<usize>;

pub trait ClassificationMetrics {
    /// Computes the 2x2 confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    ///
    /// # Returns
    ///
    /// The confusion matrix as a `Result` containing a `ConfusionMatrix` or an error message.
    fn confusion_matrix(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<ConfusionMatrix, Box<dyn Error>> {
        if y_true.len() != y_pred.len() {
            return Err("Predictions and labels are of different sizes.".into());
        }

        let mut matrix = DMatrix::zeros(2, 2);

        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            if y_t > 1 || y_p > 1 {
                return Err(format!("Labels must be 0 or 1, got {} and {}.", y_t, y_p).into());
            }
            matrix[(y_t as usize, y_p as usize)] += 1;
        }

        Ok(matrix)
    }

    /// Number of predictions that match the true label.
    fn matches(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<usize, Box<dyn Error>> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;
        Ok(matrix.diagonal().sum())
    }

    /// Computes the accuracy based on the true labels and predicted labels.
    ///
    /// # Errors
    ///
    /// Fails if the vectors differ in length or are empty.
    fn accuracy(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<f64, Box<dyn Error>> {
        if y_true.is_empty() {
            return Err("Cannot compute the accuracy of zero predictions.".into());
        }
        let correct = self.matches(y_true, y_pred)?;

        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Fraction of positive predictions that are correct; 0 when nothing was predicted positive.
    fn precision(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<f64, Box<dyn Error>> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let tp = matrix[(1, 1)];
        let fp = matrix[(0, 1)];

        match tp + fp {
            0 => Ok(0.0),
            predicted => Ok(tp as f64 / predicted as f64),
        }
    }

    /// Fraction of positive examples that were predicted positive; 0 when there are none.
    fn recall(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<f64, Box<dyn Error>> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let tp = matrix[(1, 1)];
        let fn_ = matrix[(1, 0)];

        match tp + fn_ {
            0 => Ok(0.0),
            actual => Ok(tp as f64 / actual as f64),
        }
    }

    /// Computes the F1 score based on the true labels and predicted labels.
    ///
    /// # Errors
    ///
    /// Fails when precision and recall are both 0.
    fn f1_score(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<f64, Box<dyn Error>> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        match (precision + recall).abs() < f64::EPSILON {
            true => Err("Precision and recall are both 0, F1 score undefined.".into()),
            false => Ok(2.0 * (precision * recall) / (precision + recall)),
        }
    }
}
