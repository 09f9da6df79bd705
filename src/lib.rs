/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value of the
/// specified field. The generated method includes appropriate documentation
/// describing the field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_class_index)
/// - `$field_name` - The name of the field to access (e.g., class_index)
/// - `$return_type` - The return type of the getter method
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// A macro that generates a getter method returning a field by reference.
///
/// The field is converted with `as_ref()`, so `Option<T>` fields come back as
/// `Option<&T>` and vectors as slices.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_root)
/// - `$field_name` - The name of the field to access (e.g., root)
/// - `$return_type` - The reference type returned by the getter
macro_rules! get_field_as_ref {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!(
            "* `",
            stringify!($return_type),
            "` - The value of the `",
            stringify!($field_name),
            "` field as a reference"
        )]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name.as_ref()
        }
    };
}

/// Error types shared by every module of the crate.
///
/// # Variants
///
/// - `NotFitted` - A fitted model is required
/// - `InputValidationError` - Malformed data or configuration
/// - `UnsupportedAttributeType` - A non-categorical attribute was offered for splitting
/// - `MissingValueNotAllowed` - A tested value is missing and the criterion cannot handle it
/// - `UndefinedPrediction` - A value met at prediction time has no branch in the tree
pub mod error;

/// Module `math` contains the numeric helpers behind entropy-based split selection.
///
/// # Core Functions
///
/// - `entropy` - Shannon entropy in bits of an unnormalized weight vector
/// - `split_information` - Entropy of the bag weights of a partition, used by gain ratio
/// - `normalize` - In-place normalization of a weight vector into a distribution
/// - `max_index` - Index of the largest value, first one on ties
/// - `approx_eq` - Epsilon comparison
///
/// # Example
/// ```rust
/// use rustytree::math::{entropy, max_index};
/// use ndarray::array;
///
/// let counts = array![9.0, 5.0];
/// let ent = entropy(&counts);
/// assert!((ent - 0.9403).abs() < 1e-4);
/// assert_eq!(max_index(&counts), Some(0));
/// ```
pub mod math;

/// Tabular data model: attributes, their domains, and datasets of instances.
///
/// # Components
///
/// - `Attribute` - A named column that is categorical (with an ordered domain), numeric, or a date
/// - `Dataset` - Instances sharing one schema, one designated categorical class, and instance weights
/// - `weather` - The classic nominal "play tennis" dataset
///
/// # Example
/// ```rust
/// use rustytree::dataset::weather::load_weather;
///
/// let data = load_weather().unwrap();
/// assert_eq!(data.num_classes(), 2);
/// assert_eq!(data.candidate_attributes().count(), 4);
/// ```
pub mod dataset;

/// Module `machine_learning` provides decision tree induction with entropy-based split selection.
///
/// # Components
///
/// - **Distribution**: class-label weights tallied per branch, the input of every split criterion
/// - **SplitCriterion**: information gain, missing-aware gain, gain ratio, and reciprocal gain
/// - **DecisionTree**: recursive induction over categorical attributes, classification, class distributions,
///   tree measures, and a textual rendering of the tree
/// - **Node**: read-only view of the induced tree for pruning, drawing, or serialization code
///
/// # Examples
/// ```rust
/// use rustytree::dataset::weather::load_weather;
/// use rustytree::machine_learning::*;
/// use rustytree::traits::Classifier;
///
/// let data = load_weather().unwrap();
/// let mut tree = DecisionTree::new(None).unwrap();
/// tree.fit(&data).unwrap();
///
/// let root = tree.get_root().unwrap();
/// assert_eq!(data.attribute(root.split_attribute().unwrap()).name(), "outlook");
///
/// let predicted = tree.classify_instance(data.instance(0)).unwrap();
/// assert_eq!(predicted, data.class_value(0));
/// ```
pub mod machine_learning;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use rustytree::prelude::*;
///
/// let tree = DecisionTree::default();
/// assert!(tree.get_root().is_none());
/// ```
pub mod prelude;

/// Traits shared by the models of this crate.
pub mod traits;
