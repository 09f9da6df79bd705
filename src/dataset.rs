use crate::error::ModelError;
use ahash::AHashMap;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

/// This module provides access to the weather ("play tennis") dataset
pub mod weather;

/// Marker stored in a value cell when the value is missing.
pub const MISSING: f64 = f64::NAN;

/// Label used by [`Dataset::from_nominal_rows`] to denote a missing value.
pub const MISSING_LABEL: &str = "?";

/// Type tag of an attribute column.
///
/// # Variants
///
/// - `Categorical` - A nominal attribute with a fixed, ordered domain of value labels. Cells hold the value index.
/// - `Numeric` - A real-valued attribute. Cells hold the value itself.
/// - `Date` - A timestamp attribute. Cells hold the timestamp as a real number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AttributeKind {
    Categorical,
    Numeric,
    Date,
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeKind::Categorical => write!(f, "categorical"),
            AttributeKind::Numeric => write!(f, "numeric"),
            AttributeKind::Date => write!(f, "date"),
        }
    }
}

/// A named, typed column descriptor.
///
/// Categorical attributes enumerate their domain in a fixed order; the position of a
/// label in that order is the value index stored in the dataset.
///
/// # Example
/// ```rust
/// use rustytree::dataset::Attribute;
///
/// let outlook = Attribute::categorical("outlook", ["sunny", "overcast", "rainy"]).unwrap();
/// assert_eq!(outlook.num_values(), 3);
/// assert_eq!(outlook.index_of("overcast"), Some(1));
/// assert_eq!(outlook.value(2), Some("rainy"));
/// ```
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
    values: Vec<String>,
    lookup: AHashMap<String, usize>,
}

impl Attribute {
    /// Creates a categorical attribute with the given ordered domain.
    ///
    /// # Parameters
    ///
    /// - `name` - Name of the attribute
    /// - `values` - Ordered value labels making up the domain
    ///
    /// # Returns
    ///
    /// - `Ok(Attribute)` - The new attribute
    /// - `Err(ModelError::InputValidationError)` - If the domain is empty, contains duplicate labels, or uses the missing-value label
    pub fn categorical<N, I, V>(name: N, values: I) -> Result<Self, ModelError>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();

        if values.is_empty() {
            return Err(ModelError::InputValidationError(format!(
                "categorical attribute '{}' must have at least one value",
                name
            )));
        }

        let mut lookup = AHashMap::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            if value == MISSING_LABEL {
                return Err(ModelError::InputValidationError(format!(
                    "'{}' is reserved for missing values and cannot be a value of attribute '{}'",
                    MISSING_LABEL, name
                )));
            }
            if lookup.insert(value.clone(), index).is_some() {
                return Err(ModelError::InputValidationError(format!(
                    "duplicate value '{}' in attribute '{}'",
                    value, name
                )));
            }
        }

        Ok(Self {
            name,
            kind: AttributeKind::Categorical,
            values,
            lookup,
        })
    }

    /// Creates a numeric attribute.
    pub fn numeric<N: Into<String>>(name: N) -> Self {
        Self::without_domain(name.into(), AttributeKind::Numeric)
    }

    /// Creates a date attribute.
    pub fn date<N: Into<String>>(name: N) -> Self {
        Self::without_domain(name.into(), AttributeKind::Date)
    }

    fn without_domain(name: String, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            values: Vec::new(),
            lookup: AHashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    get_field!(kind, kind, AttributeKind);

    pub fn is_categorical(&self) -> bool {
        self.kind == AttributeKind::Categorical
    }

    /// Ordered domain of a categorical attribute (empty for other kinds).
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    /// Label of the value at `index`, if it lies inside the domain.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Position of `label` in the domain.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.lookup.get(label).copied()
    }
}

/// Reads a categorical value index out of a raw cell.
///
/// Returns `None` for a missing cell. Cells are expected to have been validated
/// against the attribute's domain.
#[inline]
pub fn categorical_value(cell: f64) -> Option<usize> {
    if cell.is_nan() {
        None
    } else {
        Some(cell as usize)
    }
}

/// An ordered collection of instances sharing one attribute schema.
///
/// Each row of `values` is one instance: categorical cells hold the value index,
/// numeric and date cells hold the value, and missing cells hold [`MISSING`].
/// One column is designated as the class; it must be categorical.
/// Every instance carries a non-negative weight (1.0 unless set otherwise).
///
/// # Example
/// ```rust
/// use rustytree::dataset::{Attribute, Dataset};
///
/// let attributes = vec![
///     Attribute::categorical("a", ["x", "y"]).unwrap(),
///     Attribute::categorical("c", ["0", "1"]).unwrap(),
/// ];
/// let data = Dataset::from_nominal_rows(
///     attributes,
///     &[vec!["x", "0"], vec!["y", "1"], vec!["?", "1"]],
///     1,
/// )
/// .unwrap();
///
/// assert_eq!(data.num_instances(), 3);
/// assert_eq!(data.value(1, 0), Some(1));
/// assert_eq!(data.value(2, 0), None);
/// assert_eq!(data.class_value(0), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    values: Array2<f64>,
    weights: Array1<f64>,
    class_index: usize,
}

impl Dataset {
    /// Creates a dataset from a value matrix and its schema.
    ///
    /// # Parameters
    ///
    /// - `attributes` - Ordered attribute schema, one entry per column of `values`
    /// - `values` - Value matrix with shape (n_instances, n_attributes)
    /// - `class_index` - Index of the class attribute
    ///
    /// # Returns
    ///
    /// - `Ok(Dataset)` - The validated dataset with unit weights
    /// - `Err(ModelError::InputValidationError)` - If the schema and matrix disagree, the class attribute is not categorical, or a categorical cell lies outside its domain
    pub fn new(
        attributes: Vec<Attribute>,
        values: Array2<f64>,
        class_index: usize,
    ) -> Result<Self, ModelError> {
        if values.ncols() != attributes.len() {
            return Err(ModelError::InputValidationError(format!(
                "value matrix has {} columns but the schema has {} attributes",
                values.ncols(),
                attributes.len()
            )));
        }

        if class_index >= attributes.len() {
            return Err(ModelError::InputValidationError(format!(
                "class index {} is out of range for {} attributes",
                class_index,
                attributes.len()
            )));
        }

        if !attributes[class_index].is_categorical() {
            return Err(ModelError::InputValidationError(format!(
                "class attribute '{}' must be categorical, got {}",
                attributes[class_index].name(),
                attributes[class_index].kind()
            )));
        }

        for (j, attribute) in attributes.iter().enumerate() {
            for (i, &cell) in values.column(j).iter().enumerate() {
                if cell.is_nan() {
                    continue;
                }
                if attribute.is_categorical() {
                    if cell < 0.0
                        || cell.fract() != 0.0
                        || cell as usize >= attribute.num_values()
                    {
                        return Err(ModelError::InputValidationError(format!(
                            "value {} at position [{}][{}] is not in the domain of attribute '{}'",
                            cell,
                            i,
                            j,
                            attribute.name()
                        )));
                    }
                } else if cell.is_infinite() {
                    return Err(ModelError::InputValidationError(format!(
                        "infinite value at position [{}][{}]",
                        i, j
                    )));
                }
            }
        }

        let weights = Array1::ones(values.nrows());

        Ok(Self {
            attributes,
            values,
            weights,
            class_index,
        })
    }

    /// Builds a dataset from rows of value labels.
    ///
    /// Every attribute must be categorical; the label `"?"` marks a missing value.
    ///
    /// # Parameters
    ///
    /// - `attributes` - Ordered categorical attribute schema
    /// - `rows` - One vector of labels per instance
    /// - `class_index` - Index of the class attribute
    ///
    /// # Returns
    ///
    /// - `Ok(Dataset)` - The encoded dataset
    /// - `Err(ModelError::InputValidationError)` - If a row has the wrong length, a label is unknown, or an attribute is not categorical
    pub fn from_nominal_rows<S: AsRef<str>>(
        attributes: Vec<Attribute>,
        rows: &[Vec<S>],
        class_index: usize,
    ) -> Result<Self, ModelError> {
        if let Some(attribute) = attributes.iter().find(|a| !a.is_categorical()) {
            return Err(ModelError::InputValidationError(format!(
                "attribute '{}' is {}, nominal rows need categorical attributes",
                attribute.name(),
                attribute.kind()
            )));
        }

        let n_attributes = attributes.len();
        let mut values = Array2::from_elem((rows.len(), n_attributes), MISSING);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_attributes {
                return Err(ModelError::InputValidationError(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    n_attributes
                )));
            }
            for (j, label) in row.iter().enumerate() {
                let label = label.as_ref();
                if label == MISSING_LABEL {
                    continue;
                }
                let index = attributes[j].index_of(label).ok_or_else(|| {
                    ModelError::InputValidationError(format!(
                        "unknown value '{}' for attribute '{}' in row {}",
                        label,
                        attributes[j].name(),
                        i
                    ))
                })?;
                values[[i, j]] = index as f64;
            }
        }

        Self::new(attributes, values, class_index)
    }

    /// Replaces the instance weights.
    ///
    /// # Returns
    ///
    /// - `Ok(Dataset)` - The dataset carrying the new weights
    /// - `Err(ModelError::InputValidationError)` - If the length differs from the number of instances or a weight is negative or not finite
    pub fn with_weights(mut self, weights: Array1<f64>) -> Result<Self, ModelError> {
        if weights.len() != self.values.nrows() {
            return Err(ModelError::InputValidationError(format!(
                "got {} weights for {} instances",
                weights.len(),
                self.values.nrows()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ModelError::InputValidationError(format!(
                "instance weights must be non-negative and finite, got {}",
                bad
            )));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn num_instances(&self) -> usize {
        self.values.nrows()
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    get_field!(class_index, class_index, usize);

    pub fn class_attribute(&self) -> &Attribute {
        &self.attributes[self.class_index]
    }

    pub fn num_classes(&self) -> usize {
        self.class_attribute().num_values()
    }

    /// Raw value matrix, one row per instance.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Raw values of one instance.
    pub fn instance(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    pub fn weight(&self, row: usize) -> f64 {
        self.weights[row]
    }

    /// Value index of a categorical attribute for one instance, or `None` if missing.
    pub fn value(&self, row: usize, attribute: usize) -> Option<usize> {
        categorical_value(self.values[[row, attribute]])
    }

    pub fn is_missing(&self, row: usize, attribute: usize) -> bool {
        self.values[[row, attribute]].is_nan()
    }

    /// Class value index of one instance, or `None` if the class is missing.
    pub fn class_value(&self, row: usize) -> Option<usize> {
        self.value(row, self.class_index)
    }

    /// Indices of every attribute other than the class, in schema order.
    pub fn candidate_attributes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.attributes.len()).filter(move |&j| j != self.class_index)
    }

    /// Row indices of the instances whose class value is known.
    pub fn rows_with_class(&self) -> Vec<usize> {
        (0..self.num_instances())
            .filter(|&row| self.class_value(row).is_some())
            .collect()
    }
}
