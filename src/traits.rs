use crate::error::ModelError;
use ndarray::ArrayView1;

/// Defines the prediction interface of a fitted classifier.
///
/// An instance is a row of raw values laid out like the training schema:
/// categorical cells hold the value index and missing cells hold `NaN`.
/// Errors are per instance, so a caller classifying a batch can keep going after
/// one instance fails.
pub trait Classifier {
    /// Predicts the class index of one instance.
    ///
    /// # Parameters
    ///
    /// * `instance` - Raw values of the instance
    ///
    /// # Returns
    ///
    /// - `Ok(Some(class))` - The predicted class index
    /// - `Ok(None)` - The model has no class to offer for this instance
    /// - `Err(ModelError)` - If the instance cannot be classified
    fn classify_instance(&self, instance: ArrayView1<f64>) -> Result<Option<usize>, ModelError>;

    /// Predicts the class probability distribution of one instance.
    ///
    /// # Parameters
    ///
    /// * `instance` - Raw values of the instance
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<f64>)` - One probability per class
    /// - `Err(ModelError)` - If the instance cannot be classified
    fn distribution_for_instance(&self, instance: ArrayView1<f64>) -> Result<Vec<f64>, ModelError>;
}
