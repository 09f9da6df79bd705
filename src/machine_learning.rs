use crate::dataset::{Attribute, Dataset};
use crate::error::ModelError;
use crate::math::{self, SMALL, approx_eq};
use crate::traits::Classifier;
use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Decision tree induction and inference over categorical data
pub mod decision_tree;
/// Class-label weight tallies partitioned by branch
pub mod distribution;
/// This module provides helper functions for tree induction and prediction
pub(crate) mod helper_functions;
/// Entropy-based split criteria
pub mod split_criterion;

pub use decision_tree::*;
pub use distribution::*;
pub use split_criterion::{SelectionDirection, SplitCriterion, SplitScore};
