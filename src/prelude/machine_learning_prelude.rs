pub use crate::error::ModelError;
pub use crate::machine_learning::split_criterion::{
    entropy, gain, gain_ratio, gain_with_missing, reciprocal_gain,
};
pub use crate::machine_learning::{
    DecisionTree, DecisionTreeParams, Distribution, Node, NodeType, SelectionDirection,
    SplitCriterion, SplitScore, TreeMeasure, UnseenValuePolicy,
};
pub use crate::traits::Classifier;
