use super::*;

/// Split criteria available to the tree inducer.
///
/// # Variants
///
/// - `InformationGain` - ID3 information gain. Maximized. Rejects missing values on tested attributes.
/// - `MissingAwareGain` - Information gain scaled by the fraction of weight whose tested value is known. Maximized. Tolerates missing values.
/// - `GainRatio` - C4.5 gain ratio: missing-aware gain divided by the split information of the bags (the unknown weight counts as one more bag). Maximized. Tolerates missing values.
/// - `ReciprocalGain` - `total / gain`, for selection policies that minimize the split value. Minimized. Rejects missing values.
///
/// Every criterion reports a split without gain as [`SplitScore::Ineligible`], so no
/// sentinel value ever takes part in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum SplitCriterion {
    #[default]
    InformationGain,
    MissingAwareGain,
    GainRatio,
    ReciprocalGain,
}

/// Direction in which a criterion's scores are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    Maximize,
    Minimize,
}

/// Outcome of scoring one candidate split.
///
/// # Variants
///
/// - `Eligible` - The split is usable; carries its criterion value
/// - `Ineligible` - The split must never be chosen (no gain, or no usable split information)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitScore {
    Eligible(f64),
    Ineligible,
}

impl SplitScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            SplitScore::Eligible(v) => Some(*v),
            SplitScore::Ineligible => None,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, SplitScore::Eligible(_))
    }

    /// Whether `self` strictly beats `other` in the given direction.
    ///
    /// An eligible score beats an ineligible one; two ineligible scores never beat
    /// each other. Strictness keeps the earlier candidate on ties.
    pub fn is_better_than(&self, other: &SplitScore, direction: SelectionDirection) -> bool {
        match (self, other) {
            (SplitScore::Ineligible, _) => false,
            (SplitScore::Eligible(_), SplitScore::Ineligible) => true,
            (SplitScore::Eligible(a), SplitScore::Eligible(b)) => match direction {
                SelectionDirection::Maximize => a > b,
                SelectionDirection::Minimize => a < b,
            },
        }
    }
}

impl SplitCriterion {
    /// Direction in force when comparing scores of this criterion.
    pub fn direction(&self) -> SelectionDirection {
        match self {
            SplitCriterion::ReciprocalGain => SelectionDirection::Minimize,
            _ => SelectionDirection::Maximize,
        }
    }

    /// Whether missing values on tested attributes are accepted.
    pub fn tolerates_missing(&self) -> bool {
        matches!(
            self,
            SplitCriterion::MissingAwareGain | SplitCriterion::GainRatio
        )
    }

    /// Scores a candidate split.
    ///
    /// # Parameters
    ///
    /// - `dist` - Distribution of the data over the candidate's bags
    /// - `epsilon` - Gains within this distance of zero are treated as no gain
    ///
    /// # Returns
    ///
    /// * `SplitScore` - The criterion value, or `Ineligible` when the split carries no gain
    pub fn score(&self, dist: &Distribution, epsilon: f64) -> SplitScore {
        match self {
            SplitCriterion::InformationGain => eligible_gain(gain(dist), epsilon),
            SplitCriterion::MissingAwareGain => eligible_gain(
                gain_with_missing(dist, dist.total_including_unknown()),
                epsilon,
            ),
            SplitCriterion::GainRatio => gain_ratio(dist, epsilon),
            SplitCriterion::ReciprocalGain => reciprocal_gain(dist, epsilon),
        }
    }
}

fn eligible_gain(gain: f64, epsilon: f64) -> SplitScore {
    if approx_eq(gain, 0.0, epsilon) {
        SplitScore::Ineligible
    } else {
        SplitScore::Eligible(gain)
    }
}

/// Entropy, in bits, of the class weights with all bags merged into one.
pub fn entropy_before_split(dist: &Distribution) -> f64 {
    math::entropy(&dist.class_weights())
}

/// Weighted entropy, in bits, of the class weights within each bag.
///
/// Each bag's local entropy is weighted by the bag's share of the total; bags with
/// zero weight contribute nothing.
pub fn entropy_after_split(dist: &Distribution) -> f64 {
    let total = dist.total();
    if total <= 0.0 {
        return 0.0;
    }

    (0..dist.num_bags())
        .filter(|&bag| dist.per_bag(bag) > 0.0)
        .map(|bag| dist.per_bag(bag) / total * math::entropy(&dist.bag(bag)))
        .sum()
}

/// Entropy of a distribution: the weighted sum of the bags' local entropies.
///
/// For a single-bag distribution this is the plain class entropy.
///
/// # Examples
/// ```rust
/// use rustytree::machine_learning::{Distribution, split_criterion::entropy};
/// use ndarray::array;
///
/// let before = Distribution::from_counts(array![[2.0, 2.0]]).unwrap();
/// assert!((entropy(&before) - 1.0).abs() < 1e-9);
///
/// let after = Distribution::from_counts(array![[2.0, 0.0], [0.0, 2.0]]).unwrap();
/// assert_eq!(entropy(&after), 0.0);
/// ```
pub fn entropy(dist: &Distribution) -> f64 {
    entropy_after_split(dist)
}

/// Information gain of the split described by `dist`, in bits.
///
/// Computed as the entropy with all bags merged minus the weighted entropy of the
/// bags. Never negative.
///
/// # Examples
/// ```rust
/// use rustytree::machine_learning::{Distribution, split_criterion::gain};
/// use ndarray::array;
///
/// let dist = Distribution::from_counts(array![[2.0, 0.0], [0.0, 2.0]]).unwrap();
/// assert!((gain(&dist) - 1.0).abs() < 1e-9);
/// ```
pub fn gain(dist: &Distribution) -> f64 {
    (entropy_before_split(dist) - entropy_after_split(dist)).max(0.0)
}

/// Information gain scaled down by the rate of unknown values.
///
/// # Parameters
///
/// - `dist` - Distribution over the bags of the known instances
/// - `total_including_missing` - Weight of all instances, including those with a missing tested value
///
/// # Returns
///
/// * `f64` - `(1 - unknown_rate) * gain`, where `unknown_rate = missing / total_including_missing`
pub fn gain_with_missing(dist: &Distribution, total_including_missing: f64) -> f64 {
    if total_including_missing <= 0.0 {
        return 0.0;
    }
    let unknown_rate = (total_including_missing - dist.total()) / total_including_missing;
    (1.0 - unknown_rate) * gain(dist)
}

/// Reciprocal form of information gain, `total / gain`, meant to be minimized.
///
/// Returns `Ineligible` when the gain is within `epsilon` of zero.
pub fn reciprocal_gain(dist: &Distribution, epsilon: f64) -> SplitScore {
    let g = gain(dist);
    if approx_eq(g, 0.0, epsilon) {
        SplitScore::Ineligible
    } else {
        SplitScore::Eligible(dist.total() / g)
    }
}

/// C4.5 gain ratio of the split described by `dist`.
///
/// The missing-aware gain is divided by the split information of the bag weights,
/// with the unknown weight counted as an extra bag. Returns `Ineligible` when the
/// gain or the split information is within `epsilon` of zero.
pub fn gain_ratio(dist: &Distribution, epsilon: f64) -> SplitScore {
    let g = gain_with_missing(dist, dist.total_including_unknown());
    if approx_eq(g, 0.0, epsilon) {
        return SplitScore::Ineligible;
    }
    let split_info = math::split_information(&dist.bag_weights(), dist.unknown_weight());
    if approx_eq(split_info, 0.0, epsilon) {
        return SplitScore::Ineligible;
    }
    SplitScore::Eligible(g / split_info)
}
