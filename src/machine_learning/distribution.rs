use super::*;

/// Class-label weights tallied per bag.
///
/// A `Distribution` records, for every bag (one value of the attribute under test,
/// or a single bag when nothing is tested) and every class, the total weight of the
/// instances falling into it. Per-bag and per-class totals and the grand total are
/// kept alongside the table. Instances whose value on the tested attribute is
/// missing are not assigned to any bag; their weight is tallied separately as the
/// unknown weight and is not part of [`total`](Self::total). Instances with a
/// missing class value are ignored altogether.
///
/// A distribution is built once and read-only afterwards.
///
/// # Example
/// ```rust
/// use rustytree::machine_learning::Distribution;
/// use ndarray::array;
///
/// let dist = Distribution::from_counts(array![[2.0, 0.0], [0.0, 2.0]]).unwrap();
/// assert_eq!(dist.num_bags(), 2);
/// assert_eq!(dist.per_bag(0), 2.0);
/// assert_eq!(dist.per_class(1), 2.0);
/// assert_eq!(dist.total(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    per_class_per_bag: Array2<f64>,
    per_bag: Array1<f64>,
    per_class: Array1<f64>,
    total: f64,
    unknown: f64,
}

impl Distribution {
    fn new(num_bags: usize, num_classes: usize) -> Self {
        Self {
            per_class_per_bag: Array2::zeros((num_bags, num_classes)),
            per_bag: Array1::zeros(num_bags),
            per_class: Array1::zeros(num_classes),
            total: 0.0,
            unknown: 0.0,
        }
    }

    /// Creates a distribution directly from a (bag, class) weight table.
    ///
    /// # Parameters
    ///
    /// * `counts` - Weight table with shape (n_bags, n_classes)
    ///
    /// # Returns
    ///
    /// - `Ok(Distribution)` - The distribution with derived totals
    /// - `Err(ModelError::InputValidationError)` - If a weight is negative or not finite
    pub fn from_counts(counts: Array2<f64>) -> Result<Self, ModelError> {
        if let Some(bad) = counts.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ModelError::InputValidationError(format!(
                "distribution weights must be non-negative and finite, got {}",
                bad
            )));
        }

        let per_bag = counts.sum_axis(Axis(1));
        let per_class = counts.sum_axis(Axis(0));
        let total = per_bag.sum();

        Ok(Self {
            per_class_per_bag: counts,
            per_bag,
            per_class,
            total,
            unknown: 0.0,
        })
    }

    /// Like [`from_counts`](Self::from_counts), additionally recording the weight
    /// of instances whose value on the tested attribute is missing.
    pub fn from_counts_with_unknown(counts: Array2<f64>, unknown: f64) -> Result<Self, ModelError> {
        if !unknown.is_finite() || unknown < 0.0 {
            return Err(ModelError::InputValidationError(format!(
                "unknown weight must be non-negative and finite, got {}",
                unknown
            )));
        }
        let mut dist = Self::from_counts(counts)?;
        dist.unknown = unknown;
        Ok(dist)
    }

    /// Tallies the given weighted rows into a single bag.
    ///
    /// This is the no-split distribution used for the entropy before a split and
    /// for leaf class distributions.
    pub fn whole(data: &Dataset, rows: &[(usize, f64)]) -> Self {
        let mut dist = Self::new(1, data.num_classes());
        for &(row, weight) in rows {
            if let Some(class) = data.class_value(row) {
                dist.add(0, class, weight);
            }
        }
        dist
    }

    /// Tallies the given weighted rows into one bag per value of a categorical attribute.
    ///
    /// Rows with a missing value on `attribute` go to the unknown weight.
    pub fn split_on(data: &Dataset, rows: &[(usize, f64)], attribute: usize) -> Self {
        let num_bags = data.attribute(attribute).num_values();
        let mut dist = Self::new(num_bags, data.num_classes());
        for &(row, weight) in rows {
            let Some(class) = data.class_value(row) else {
                continue;
            };
            match data.value(row, attribute) {
                Some(bag) => dist.add(bag, class, weight),
                None => dist.unknown += weight,
            }
        }
        dist
    }

    fn add(&mut self, bag: usize, class: usize, weight: f64) {
        self.per_class_per_bag[[bag, class]] += weight;
        self.per_bag[bag] += weight;
        self.per_class[class] += weight;
        self.total += weight;
    }

    pub fn num_bags(&self) -> usize {
        self.per_bag.len()
    }

    pub fn num_classes(&self) -> usize {
        self.per_class.len()
    }

    /// Weight of the instances in `bag` having class `class`.
    pub fn per_class_per_bag(&self, bag: usize, class: usize) -> f64 {
        self.per_class_per_bag[[bag, class]]
    }

    /// Weight of all instances in `bag`.
    pub fn per_bag(&self, bag: usize) -> f64 {
        self.per_bag[bag]
    }

    /// Weight of all instances with class `class`, summed over bags.
    pub fn per_class(&self, class: usize) -> f64 {
        self.per_class[class]
    }

    /// Weight of all instances assigned to a bag.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Weight of the instances that could not be assigned to a bag.
    pub fn unknown_weight(&self) -> f64 {
        self.unknown
    }

    /// Weight of all instances, including those with a missing tested value.
    pub fn total_including_unknown(&self) -> f64 {
        self.total + self.unknown
    }

    /// Per-class weights of one bag.
    pub fn bag(&self, bag: usize) -> ArrayView1<'_, f64> {
        self.per_class_per_bag.row(bag)
    }

    /// Per-class weights summed over bags.
    pub fn class_weights(&self) -> ArrayView1<'_, f64> {
        self.per_class.view()
    }

    /// Per-bag weights summed over classes.
    pub fn bag_weights(&self) -> ArrayView1<'_, f64> {
        self.per_bag.view()
    }

    /// Number of bags whose weight is positive and at least `min_weight`.
    pub fn bags_with_at_least(&self, min_weight: f64) -> usize {
        self.per_bag
            .iter()
            .filter(|&&w| w > 0.0 && w >= min_weight)
            .count()
    }
}
