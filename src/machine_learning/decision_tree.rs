use super::helper_functions::{
    check_candidate_attributes, child_index, partition_rows, validate_params,
};
use super::*;

/// What to do when prediction meets a value that has no branch in the tree.
///
/// # Variants
///
/// - `Error` - Report `ModelError::UndefinedPrediction` for that instance.
/// - `BackOff` - Stop at the internal node where descent failed and answer from the class distribution of the training instances that reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum UnseenValuePolicy {
    #[default]
    Error,
    BackOff,
}

/// Hyperparameters for controlling decision tree induction and prediction.
///
/// The whole configuration is passed to the tree at construction time; there is no
/// global state.
///
/// # Fields
///
/// - `criterion` - Split criterion used to score candidate attributes.
/// - `gain_epsilon` - Gains within this distance of zero count as no gain and force a leaf.
/// - `min_instances_per_leaf` - A split is admissible only if at least two of its branches carry at least this much weight. With `0.0` any two non-empty branches suffice.
/// - `max_depth` - Maximum depth of the tree. If `None`, growth stops only when no attribute has gain.
/// - `use_laplace` - Apply Laplace smoothing `(count + 1) / (total + n_classes)` to predicted distributions.
/// - `unseen_value` - Policy for attribute values without a branch at prediction time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecisionTreeParams {
    pub criterion: SplitCriterion,
    pub gain_epsilon: f64,
    pub min_instances_per_leaf: f64,
    pub max_depth: Option<usize>,
    pub use_laplace: bool,
    pub unseen_value: UnseenValuePolicy,
}

/// Default hyperparameters for decision tree.
///
/// Plain ID3: information gain, `gain_epsilon = 1e-6`, no minimum leaf weight,
/// no depth limit, no Laplace smoothing, and unseen values reported as errors.
impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            criterion: SplitCriterion::InformationGain,
            gain_epsilon: SMALL,
            min_instances_per_leaf: 0.0,
            max_depth: None,
            use_laplace: false,
            unseen_value: UnseenValuePolicy::Error,
        }
    }
}

impl AsRef<DecisionTreeParams> for DecisionTreeParams {
    fn as_ref(&self) -> &DecisionTreeParams {
        self
    }
}

/// Additional measures reported about an induced tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMeasure {
    TreeSize,
    NumLeaves,
    NumRules,
}

/// Type of a node in the decision tree.
///
/// # Variants
///
/// - `Internal` - A decision node testing a categorical attribute.
///   - `attribute_index`: Index of the attribute tested at this node.
///   - `children`: One child per value in the attribute's domain, in domain order.
/// - `Leaf` - A terminal node.
///   - `class`: The class with the largest weight (lowest index on ties), or `None` if no training instance reached the leaf.
///   - `probabilities`: Normalized class distribution (all zero for an empty leaf).
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    Internal {
        attribute_index: usize,
        children: Vec<Node>,
    },
    Leaf {
        class: Option<usize>,
        probabilities: Vec<f64>,
    },
}

/// A node in the decision tree structure.
///
/// Each node owns its children exclusively. Besides its type, every node keeps the
/// class weights of the training instances that reached it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    node_type: NodeType,
    class_counts: Vec<f64>,
}

impl Node {
    /// Creates a leaf from the class weights of the instances reaching it.
    ///
    /// An all-zero weight vector yields a degenerate leaf with no class.
    pub(crate) fn new_leaf(class_counts: Vec<f64>) -> Self {
        Self {
            node_type: NodeType::Leaf {
                class: majority_class(&class_counts),
                probabilities: normalized(&class_counts),
            },
            class_counts,
        }
    }

    pub(crate) fn new_internal(
        attribute_index: usize,
        class_counts: Vec<f64>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            node_type: NodeType::Internal {
                attribute_index,
                children,
            },
            class_counts,
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::Leaf { .. })
    }

    /// Attribute tested at this node, or `None` for a leaf.
    pub fn split_attribute(&self) -> Option<usize> {
        match &self.node_type {
            NodeType::Internal {
                attribute_index, ..
            } => Some(*attribute_index),
            NodeType::Leaf { .. } => None,
        }
    }

    /// Children in domain order; empty for a leaf.
    pub fn children(&self) -> &[Node] {
        match &self.node_type {
            NodeType::Internal { children, .. } => children,
            NodeType::Leaf { .. } => &[],
        }
    }

    /// Predicted class of a leaf. `None` for internal nodes and for empty leaves.
    pub fn predicted_class(&self) -> Option<usize> {
        match &self.node_type {
            NodeType::Leaf { class, .. } => *class,
            NodeType::Internal { .. } => None,
        }
    }

    /// Normalized class distribution of a leaf, or `None` for internal nodes.
    pub fn probabilities(&self) -> Option<&[f64]> {
        match &self.node_type {
            NodeType::Leaf { probabilities, .. } => Some(probabilities),
            NodeType::Internal { .. } => None,
        }
    }

    /// Class weights of the training instances that reached this node.
    pub fn class_counts(&self) -> &[f64] {
        &self.class_counts
    }

    /// Total training weight that reached this node.
    pub fn weight(&self) -> f64 {
        self.class_counts.iter().sum()
    }

    pub fn num_nodes(&self) -> usize {
        self.preorder().count()
    }

    pub fn num_leaves(&self) -> usize {
        self.preorder().filter(|(_, node)| node.is_leaf()).count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.preorder().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Iterates over the subtree in preorder, yielding each node with its depth.
    ///
    /// Children are visited in domain order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![(0, self)],
        }
    }
}

/// Preorder iterator over a subtree, created by [`Node::preorder`].
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

fn majority_class(class_counts: &[f64]) -> Option<usize> {
    let total: f64 = class_counts.iter().sum();
    if total <= 0.0 {
        return None;
    }
    math::max_index(&ArrayView1::from(class_counts))
}

fn normalized(class_counts: &[f64]) -> Vec<f64> {
    let mut probabilities = Array1::from(class_counts.to_vec());
    math::normalize(&mut probabilities);
    probabilities.to_vec()
}

fn laplace(class_counts: &[f64]) -> Vec<f64> {
    let total: f64 = class_counts.iter().sum();
    let denominator = total + class_counts.len() as f64;
    class_counts
        .iter()
        .map(|&count| (count + 1.0) / denominator)
        .collect()
}

/// Decision tree classifier induced with entropy-based split selection.
///
/// Implements ID3-style induction over categorical attributes: at every node the
/// candidate attribute with the best split criterion value is chosen (first in
/// schema order on ties), the instances are partitioned into one subset per value
/// of that attribute, and each subset is induced recursively. A node becomes a leaf
/// when no attribute yields gain. Candidate attributes are scored in parallel and
/// sibling subtrees are induced in parallel with rayon; the resulting tree does not
/// depend on thread scheduling.
///
/// # Fields
///
/// - `params` - Hyperparameters controlling induction and prediction.
/// - `root` - The root node of the induced tree, or `None` if not yet fitted.
/// - `attributes` - Attribute schema of the training data.
/// - `class_index` - Index of the class attribute in the schema.
///
/// # Example
/// ```rust
/// use rustytree::dataset::{Attribute, Dataset};
/// use rustytree::machine_learning::DecisionTree;
/// use rustytree::traits::Classifier;
///
/// let attributes = vec![
///     Attribute::categorical("a", ["x", "y"]).unwrap(),
///     Attribute::categorical("c", ["0", "1"]).unwrap(),
/// ];
/// let rows = vec![
///     vec!["x", "0"],
///     vec!["x", "0"],
///     vec!["y", "1"],
///     vec!["y", "1"],
/// ];
/// let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();
///
/// let mut tree = DecisionTree::default();
/// tree.fit(&data).unwrap();
///
/// assert_eq!(tree.classify_instance(data.instance(2)).unwrap(), Some(1));
/// println!("{}", tree.generate_tree_structure().unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    params: DecisionTreeParams,
    root: Option<Node>,
    attributes: Vec<Attribute>,
    class_index: usize,
}

impl DecisionTree {
    /// Creates a new decision tree.
    ///
    /// # Parameters
    ///
    /// * `params` - Optional hyperparameters. If `None`, default parameters are used.
    ///
    /// # Returns
    ///
    /// - `Ok(DecisionTree)` - A new unfitted tree
    /// - `Err(ModelError::InputValidationError)` - If a hyperparameter is out of range
    pub fn new(params: Option<DecisionTreeParams>) -> Result<Self, ModelError> {
        let params = params.unwrap_or_default();
        validate_params(&params)?;

        Ok(Self {
            params,
            ..Self::default()
        })
    }

    // Getters
    get_field!(get_class_index, class_index, usize);
    get_field_as_ref!(get_parameters, params, &DecisionTreeParams);
    get_field_as_ref!(get_root, root, Option<&Node>);
    get_field_as_ref!(get_attributes, attributes, &[Attribute]);

    /// Number of classes of the fitted class attribute (0 before fitting).
    pub fn get_n_classes(&self) -> usize {
        self.attributes
            .get(self.class_index)
            .map_or(0, Attribute::num_values)
    }

    /// Label of a class index in the fitted class attribute's domain.
    pub fn class_label(&self, class: usize) -> Option<&str> {
        self.attributes.get(self.class_index)?.value(class)
    }

    /// Induces a tree from `data`, replacing any previously fitted tree.
    ///
    /// Instances with a missing class value are ignored. An empty dataset yields a
    /// single leaf without a class.
    ///
    /// # Parameters
    ///
    /// * `data` - Training data; never modified
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Self)` - A mutable reference to `self` for method chaining
    /// - `Err(ModelError::UnsupportedAttributeType)` - If a non-class attribute is not categorical
    /// - `Err(ModelError::MissingValueNotAllowed)` - If a value is missing and the criterion does not tolerate it
    pub fn fit(&mut self, data: &Dataset) -> Result<&mut Self, ModelError> {
        let root = self.induce(data)?;

        log::debug!(
            "Induced decision tree with {} nodes, {} leaves and depth {}",
            root.num_nodes(),
            root.num_leaves(),
            root.depth()
        );

        self.attributes = data.attributes().to_vec();
        self.class_index = data.class_index();
        self.root = Some(root);

        Ok(self)
    }

    /// Induces a tree from `data` and returns its root without storing it.
    ///
    /// Schema problems are detected before recursion starts and abort the call.
    ///
    /// # Parameters
    ///
    /// * `data` - Training data; never modified
    ///
    /// # Returns
    ///
    /// - `Ok(Node)` - Root of the induced tree
    /// - `Err(ModelError)` - See [`fit`](Self::fit)
    pub fn induce(&self, data: &Dataset) -> Result<Node, ModelError> {
        let candidates: Vec<usize> = data.candidate_attributes().collect();
        let rows: Vec<(usize, f64)> = data
            .rows_with_class()
            .into_iter()
            .map(|row| (row, data.weight(row)))
            .collect();

        log::debug!(
            "Inducing decision tree on {} of {} instances with {} candidate attributes ({:?})",
            rows.len(),
            data.num_instances(),
            candidates.len(),
            self.params.criterion
        );

        check_candidate_attributes(data, &candidates, &rows, self.params.criterion)?;

        Ok(self.build_tree(data, &candidates, &rows, 0))
    }

    /// Recursively builds a decision tree node from the given weighted rows.
    fn build_tree(
        &self,
        data: &Dataset,
        candidates: &[usize],
        rows: &[(usize, f64)],
        depth: usize,
    ) -> Node {
        if rows.is_empty() {
            log::trace!("depth {}: no instances, empty leaf", depth);
            return Node::new_leaf(vec![0.0; data.num_classes()]);
        }

        let class_counts = Distribution::whole(data, rows).class_weights().to_vec();

        if self.params.max_depth.is_some_and(|max| depth >= max) {
            log::trace!("depth {}: depth limit reached, leaf", depth);
            return Node::new_leaf(class_counts);
        }

        let Some((attribute, dist)) = self.select_attribute(data, candidates, rows) else {
            log::trace!("depth {}: no attribute with gain, leaf", depth);
            return Node::new_leaf(class_counts);
        };

        log::trace!(
            "depth {}: split on '{}' over {} instances",
            depth,
            data.attribute(attribute).name(),
            rows.len()
        );

        let subsets = partition_rows(data, rows, attribute, &dist);
        let children: Vec<Node> = subsets
            .par_iter()
            .map(|subset| self.build_tree(data, candidates, subset, depth + 1))
            .collect();

        Node::new_internal(attribute, class_counts, children)
    }

    /// Scores every candidate attribute in parallel and returns the best one with its distribution.
    ///
    /// Scores are compared in schema order, so the first of several equal scores wins.
    fn select_attribute(
        &self,
        data: &Dataset,
        candidates: &[usize],
        rows: &[(usize, f64)],
    ) -> Option<(usize, Distribution)> {
        let criterion = self.params.criterion;
        let epsilon = self.params.gain_epsilon;
        let min_leaf = self.params.min_instances_per_leaf;

        let scored: Vec<(usize, SplitScore, Distribution)> = candidates
            .par_iter()
            .map(|&attribute| {
                let dist = Distribution::split_on(data, rows, attribute);
                // A split must send weight down at least two branches
                let score = if dist.bags_with_at_least(min_leaf) < 2 {
                    SplitScore::Ineligible
                } else {
                    criterion.score(&dist, epsilon)
                };
                (attribute, score, dist)
            })
            .collect();

        let direction = criterion.direction();
        let mut best: Option<(usize, SplitScore, Distribution)> = None;
        for candidate in scored {
            let better = match &best {
                None => candidate.1.is_eligible(),
                Some((_, best_score, _)) => candidate.1.is_better_than(best_score, direction),
            };
            if better {
                best = Some(candidate);
            }
        }

        best.map(|(attribute, _, dist)| (attribute, dist))
    }

    /// Walks the tree for one instance and returns the node that answers for it.
    fn find_node(&self, instance: ArrayView1<f64>) -> Result<&Node, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;

        if instance.len() != self.attributes.len() {
            return Err(ModelError::InputValidationError(format!(
                "instance has {} values, expected {}",
                instance.len(),
                self.attributes.len()
            )));
        }

        let mut node = root;
        loop {
            match &node.node_type {
                NodeType::Leaf { .. } => return Ok(node),
                NodeType::Internal {
                    attribute_index,
                    children,
                } => {
                    let cell = instance[*attribute_index];
                    match child_index(cell, children.len()) {
                        Some(index) => node = &children[index],
                        None => {
                            let attribute = self.attributes[*attribute_index].name();
                            return match self.params.unseen_value {
                                UnseenValuePolicy::Error => Err(ModelError::UndefinedPrediction {
                                    attribute: attribute.to_string(),
                                    value: cell,
                                }),
                                UnseenValuePolicy::BackOff => {
                                    log::warn!(
                                        "no branch for value {} of '{}', backing off to node distribution",
                                        cell,
                                        attribute
                                    );
                                    Ok(node)
                                }
                            };
                        }
                    }
                }
            }
        }
    }

    /// Classifies multiple instances using parallel processing.
    ///
    /// A failure on one instance does not affect the others.
    ///
    /// # Parameters
    ///
    /// * `x` - Instances as a 2D array with shape (n_samples, n_attributes)
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Result<Option<usize>, ModelError>>)` - One classification result per instance
    /// - `Err(ModelError::NotFitted)` - If the tree has not been fitted
    /// - `Err(ModelError::InputValidationError)` - If the number of columns does not match the schema
    pub fn predict(
        &self,
        x: ArrayView2<f64>,
    ) -> Result<Vec<Result<Option<usize>, ModelError>>, ModelError> {
        self.check_batch(x)?;

        Ok(x.axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| self.classify_instance(row))
            .collect())
    }

    /// Predicts class distributions for multiple instances using parallel processing.
    ///
    /// # Parameters
    ///
    /// * `x` - Instances as a 2D array with shape (n_samples, n_attributes)
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Result<Vec<f64>, ModelError>>)` - One distribution result per instance
    /// - `Err(ModelError)` - As for [`predict`](Self::predict)
    pub fn predict_proba(
        &self,
        x: ArrayView2<f64>,
    ) -> Result<Vec<Result<Vec<f64>, ModelError>>, ModelError> {
        self.check_batch(x)?;

        Ok(x.axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| self.distribution_for_instance(row))
            .collect())
    }

    fn check_batch(&self, x: ArrayView2<f64>) -> Result<(), ModelError> {
        if self.root.is_none() {
            return Err(ModelError::NotFitted);
        }

        if x.ncols() != self.attributes.len() {
            return Err(ModelError::InputValidationError(format!(
                "instances have {} columns, expected {}",
                x.ncols(),
                self.attributes.len()
            )));
        }

        Ok(())
    }

    /// Returns one of the additional tree measures.
    ///
    /// # Returns
    ///
    /// - `Ok(f64)` - Node count for `TreeSize`, leaf count for `NumLeaves` and `NumRules`
    /// - `Err(ModelError::NotFitted)` - If the tree has not been fitted
    pub fn measure(&self, measure: TreeMeasure) -> Result<f64, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;

        let value = match measure {
            TreeMeasure::TreeSize => root.num_nodes(),
            TreeMeasure::NumLeaves | TreeMeasure::NumRules => root.num_leaves(),
        };

        Ok(value as f64)
    }

    /// Generates a human-readable string representation of the decision tree structure.
    ///
    /// Every branch is printed as `attribute = value`; a branch ending in a leaf is
    /// followed by the leaf's class label, or `null` for a leaf no training instance
    /// reached.
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - The formatted tree
    /// - `Err(ModelError::NotFitted)` - If the model hasn't been trained yet
    pub fn generate_tree_structure(&self) -> Result<String, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;

        let mut output = String::new();
        output.push_str("Decision Tree Structure:\n");
        if root.is_leaf() {
            output.push_str(&format!("└── {}\n", self.leaf_label(root)));
        } else {
            self.print_node(root, &mut output, "");
        }
        Ok(output)
    }

    fn leaf_label(&self, node: &Node) -> &str {
        node.predicted_class()
            .and_then(|class| self.class_label(class))
            .unwrap_or("null")
    }

    // Recursively print the branches below an internal node
    fn print_node(&self, node: &Node, output: &mut String, prefix: &str) {
        let Some(attribute_index) = node.split_attribute() else {
            return;
        };
        let attribute = &self.attributes[attribute_index];
        let children = node.children();

        for (value, child) in children.iter().enumerate() {
            let is_last = value + 1 == children.len();
            let connector = if is_last { "└── " } else { "├── " };
            output.push_str(&format!(
                "{}{}{} = {}",
                prefix,
                connector,
                attribute.name(),
                attribute.value(value).unwrap_or("?")
            ));

            if child.is_leaf() {
                output.push_str(&format!(": {}\n", self.leaf_label(child)));
            } else {
                output.push('\n');
                let new_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                self.print_node(child, output, &new_prefix);
            }
        }
    }
}

impl Classifier for DecisionTree {
    /// Classifies one instance.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(class))` - The predicted class index
    /// - `Ok(None)` - The instance reached a leaf no training instance reached
    /// - `Err(ModelError::UndefinedPrediction)` - A tested value has no branch and the policy is `Error`
    /// - `Err(ModelError::NotFitted)` - If the tree has not been fitted
    fn classify_instance(&self, instance: ArrayView1<f64>) -> Result<Option<usize>, ModelError> {
        let node = self.find_node(instance)?;
        Ok(match &node.node_type {
            NodeType::Leaf { class, .. } => *class,
            NodeType::Internal { .. } => majority_class(&node.class_counts),
        })
    }

    /// Computes the class distribution for one instance.
    ///
    /// Laplace smoothing is applied when `use_laplace` is set.
    fn distribution_for_instance(
        &self,
        instance: ArrayView1<f64>,
    ) -> Result<Vec<f64>, ModelError> {
        let node = self.find_node(instance)?;

        if self.params.use_laplace {
            return Ok(laplace(&node.class_counts));
        }

        Ok(match &node.node_type {
            NodeType::Leaf { probabilities, .. } => probabilities.clone(),
            NodeType::Internal { .. } => normalized(&node.class_counts),
        })
    }
}
