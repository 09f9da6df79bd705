use ndarray::{ArrayBase, Data, DataMut, Ix1};

/// Default tolerance below which a gain counts as no gain.
pub const SMALL: f64 = 1e-6;

/// Checks whether two values are equal within `epsilon`.
///
/// # Examples
/// ```rust
/// use rustytree::math::{approx_eq, SMALL};
///
/// assert!(approx_eq(0.1 + 0.2, 0.3, SMALL));
/// assert!(!approx_eq(0.1, 0.2, SMALL));
/// ```
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Calculates the Shannon entropy, in bits, of a vector of non-negative weights.
///
/// The weights do not need to be normalized and may be arbitrarily small; only
/// their proportions matter. Zero entries are left out of the log term, and a
/// vector with no positive weight has entropy 0.
///
/// # Parameters
///
/// - `weights` - Per-class (or per-bag) weights stored in a 1D array
///
/// # Returns
///
/// - `f64` - Entropy of the normalized weights (0.0 for a single non-zero entry)
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytree::math::entropy;
///
/// let counts = array![2.0, 2.0];
/// assert!((entropy(&counts) - 1.0).abs() < 1e-9);
///
/// let pure = array![4.0, 0.0];
/// assert_eq!(entropy(&pure), 0.0);
/// ```
#[inline]
pub fn entropy<S>(weights: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let total: f64 = weights.iter().filter(|&&w| w > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for &w in weights.iter() {
        if w > 0.0 {
            let p = w / total;
            entropy -= p * p.log2();
        }
    }

    // Rounding can leave a tiny negative value for a pure vector
    entropy.max(0.0)
}

/// Calculates the split information of a partition.
///
/// Split information is the entropy of the bag weights themselves, used to
/// normalize information gain into gain ratio. Weight that could not be assigned
/// to any bag (missing values) is counted as one extra bag.
///
/// # Parameters
///
/// - `bag_weights` - Total weight per bag
/// - `unknown_weight` - Weight of instances with a missing value on the split attribute
///
/// # Returns
///
/// - `f64` - Split information in bits
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytree::math::split_information;
///
/// let bags = array![3.0, 3.0];
/// assert!((split_information(&bags, 0.0) - 1.0).abs() < 1e-9);
/// ```
pub fn split_information<S>(bag_weights: &ArrayBase<S, Ix1>, unknown_weight: f64) -> f64
where
    S: Data<Elem = f64>,
{
    let mut weights: Vec<f64> = bag_weights.iter().copied().collect();
    weights.push(unknown_weight);
    entropy(&ndarray::Array1::from_vec(weights))
}

/// Scales the values in place so that they sum to one.
///
/// Values that sum to zero are left untouched, which keeps an all-zero
/// distribution all-zero. Any positive sum, however small, is rescaled.
///
/// # Returns
///
/// - `bool` - `true` if the values were rescaled
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytree::math::normalize;
///
/// let mut counts = array![1.0, 3.0];
/// assert!(normalize(&mut counts));
/// assert_eq!(counts, array![0.25, 0.75]);
///
/// let mut empty = array![0.0, 0.0];
/// assert!(!normalize(&mut empty));
/// ```
pub fn normalize<S>(values: &mut ArrayBase<S, Ix1>) -> bool
where
    S: DataMut<Elem = f64>,
{
    let sum: f64 = values.sum();
    if !sum.is_finite() || sum <= 0.0 {
        return false;
    }
    values.mapv_inplace(|v| v / sum);
    true
}

/// Returns the index of the largest value, favouring the first one on ties.
///
/// # Returns
///
/// - `Option<usize>` - Index of the maximum, or `None` for an empty input
///
/// # Examples
/// ```rust
/// use ndarray::array;
/// use rustytree::math::max_index;
///
/// assert_eq!(max_index(&array![1.0, 3.0, 3.0]), Some(1));
/// assert_eq!(max_index(&ndarray::Array1::<f64>::zeros(0)), None);
/// ```
pub fn max_index<S>(values: &ArrayBase<S, Ix1>) -> Option<usize>
where
    S: Data<Elem = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
