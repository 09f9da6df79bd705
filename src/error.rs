use crate::dataset::AttributeKind;

/// Error types that can occur while building or querying a decision tree
///
/// # Variants
///
/// - `NotFitted` - Indicates that the model has not been fitted yet
/// - `InputValidationError` - Indicates the input data or configuration does not meet the expected format, type, or validation rules
/// - `UnsupportedAttributeType` - A numeric or date attribute was offered as a split candidate; fatal to the induction call
/// - `MissingValueNotAllowed` - An instance has a missing value on a tested attribute and the active split criterion does not tolerate missing values; fatal to the induction call
/// - `UndefinedPrediction` - Classification reached an attribute value that has no child in the tree (unseen during training, or missing); local to one instance
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    NotFitted,
    InputValidationError(String),
    UnsupportedAttributeType {
        attribute: String,
        kind: AttributeKind,
    },
    MissingValueNotAllowed {
        attribute: String,
        row: usize,
    },
    UndefinedPrediction {
        attribute: String,
        value: f64,
    },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::NotFitted => {
                write!(
                    f,
                    "Model has not been fitted. Certain methods require the model to be fitted before use."
                )
            }
            ModelError::InputValidationError(msg) => write!(f, "Input validation error: {}", msg),
            ModelError::UnsupportedAttributeType { attribute, kind } => write!(
                f,
                "Unsupported attribute type: attribute '{}' is {}, only categorical attributes can be split on",
                attribute, kind
            ),
            ModelError::MissingValueNotAllowed { attribute, row } => write!(
                f,
                "Missing value not allowed: row {} has no value for attribute '{}'",
                row, attribute
            ),
            ModelError::UndefinedPrediction { attribute, value } => {
                if value.is_nan() {
                    write!(
                        f,
                        "Undefined prediction: value of attribute '{}' is missing",
                        attribute
                    )
                } else {
                    write!(
                        f,
                        "Undefined prediction: value {} of attribute '{}' has no branch in the tree",
                        value, attribute
                    )
                }
            }
        }
    }
}

/// Implements the standard error trait for ModelError
impl std::error::Error for ModelError {}
