use super::*;

/// Validates the hyperparameters of a decision tree.
///
/// This function checks that:
/// - `gain_epsilon` is non-negative and finite
/// - `min_instances_per_leaf` is non-negative and finite
///
/// # Parameters
///
/// * `params` - The hyperparameters to validate
///
/// # Returns
///
/// - `Ok(())` - If all validation checks pass
/// - `Err(ModelError::InputValidationError)` - If a value is out of range
///
/// # Side Effects
///
/// - Logs a warning when gain ratio is used without a minimum leaf weight
pub fn validate_params(params: &DecisionTreeParams) -> Result<(), ModelError> {
    if params.gain_epsilon < 0.0 || !params.gain_epsilon.is_finite() {
        return Err(ModelError::InputValidationError(format!(
            "gain_epsilon must be non-negative and finite, got {}",
            params.gain_epsilon
        )));
    }

    if params.min_instances_per_leaf < 0.0 || !params.min_instances_per_leaf.is_finite() {
        return Err(ModelError::InputValidationError(format!(
            "min_instances_per_leaf must be non-negative and finite, got {}",
            params.min_instances_per_leaf
        )));
    }

    if params.criterion == SplitCriterion::GainRatio && params.min_instances_per_leaf == 0.0 {
        log::warn!("gain ratio without min_instances_per_leaf favours splits into tiny branches");
    }

    Ok(())
}

/// Checks that every candidate attribute can be split on.
///
/// Runs once before induction starts, so a schema problem aborts the whole call
/// instead of surfacing halfway through the tree.
///
/// # Parameters
///
/// - `data` - The training data
/// - `candidates` - Indices of the candidate split attributes
/// - `rows` - Rows taking part in induction (instances with a known class)
/// - `criterion` - The active split criterion
///
/// # Returns
///
/// - `Ok(())` - If all candidates are categorical and, for criteria that reject missing values, fully observed
/// - `Err(ModelError::UnsupportedAttributeType)` - If a candidate is numeric or a date
/// - `Err(ModelError::MissingValueNotAllowed)` - If a row misses a candidate's value and the criterion does not tolerate it
pub fn check_candidate_attributes(
    data: &Dataset,
    candidates: &[usize],
    rows: &[(usize, f64)],
    criterion: SplitCriterion,
) -> Result<(), ModelError> {
    for &attribute in candidates {
        let attr = data.attribute(attribute);
        if !attr.is_categorical() {
            return Err(ModelError::UnsupportedAttributeType {
                attribute: attr.name().to_string(),
                kind: attr.kind(),
            });
        }

        if !criterion.tolerates_missing() {
            let missing = rows.iter().find(|(row, _)| data.is_missing(*row, attribute));
            if let Some(&(row, _)) = missing {
                return Err(ModelError::MissingValueNotAllowed {
                    attribute: attr.name().to_string(),
                    row,
                });
            }
        }
    }

    Ok(())
}

/// Maps a raw cell to the child it selects, if any.
///
/// Missing cells, non-integral cells and indices past the last child select nothing.
#[inline]
pub fn child_index(cell: f64, num_children: usize) -> Option<usize> {
    if cell.is_nan() || cell < 0.0 || cell.fract() != 0.0 {
        return None;
    }
    let index = cell as usize;
    (index < num_children).then_some(index)
}

/// Splits weighted rows into one subset per value of `attribute`.
///
/// Rows with a missing value are sent to every non-empty subset, their weight
/// scaled by that subset's share of the known weight in `dist`.
pub fn partition_rows(
    data: &Dataset,
    rows: &[(usize, f64)],
    attribute: usize,
    dist: &Distribution,
) -> Vec<Vec<(usize, f64)>> {
    let mut subsets = vec![Vec::new(); dist.num_bags()];
    let mut missing = Vec::new();

    for &(row, weight) in rows {
        match data.value(row, attribute) {
            Some(value) => subsets[value].push((row, weight)),
            None => missing.push((row, weight)),
        }
    }

    let known = dist.total();
    if !missing.is_empty() && known > 0.0 {
        for (bag, subset) in subsets.iter_mut().enumerate() {
            let share = dist.per_bag(bag) / known;
            if share > 0.0 {
                subset.extend(missing.iter().map(|&(row, weight)| (row, weight * share)));
            }
        }
    }

    subsets
}
