use super::*;

fn weather_tree(params: DecisionTreeParams) -> (Dataset, DecisionTree) {
    let data = load_weather().unwrap();
    let mut tree = tree_with(params);
    tree.fit(&data).unwrap();
    (data, tree)
}

#[test]
fn test_default_params() {
    let params = DecisionTreeParams::default();
    assert_eq!(params.criterion, SplitCriterion::InformationGain);
    assert_eq!(params.gain_epsilon, 1e-6);
    assert_eq!(params.min_instances_per_leaf, 0.0);
    assert_eq!(params.max_depth, None);
    assert!(!params.use_laplace);
    assert_eq!(params.unseen_value, UnseenValuePolicy::Error);
}

#[test]
fn test_new_rejects_invalid_params() {
    let params = DecisionTreeParams {
        gain_epsilon: f64::NAN,
        ..Default::default()
    };
    assert!(matches!(
        DecisionTree::new(Some(params)),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_unfitted_tree() {
    let tree = DecisionTree::new(None).unwrap();
    let instance = array![0.0, 0.0];

    assert!(tree.get_root().is_none());
    assert_eq!(tree.get_n_classes(), 0);
    assert_eq!(
        tree.classify_instance(instance.view()),
        Err(ModelError::NotFitted)
    );
    assert_eq!(
        tree.distribution_for_instance(instance.view()),
        Err(ModelError::NotFitted)
    );
    assert!(matches!(
        tree.predict(array![[0.0, 0.0]].view()),
        Err(ModelError::NotFitted)
    ));
    assert_eq!(tree.measure(TreeMeasure::TreeSize), Err(ModelError::NotFitted));
    assert_eq!(tree.generate_tree_structure(), Err(ModelError::NotFitted));
}

#[test]
fn test_perfectly_separable_attribute() {
    let data = separable_dataset();
    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    let root = tree.get_root().unwrap();
    assert_eq!(root.split_attribute(), Some(0));
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children()[0].predicted_class(), Some(0));
    assert_eq!(root.children()[1].predicted_class(), Some(1));
    assert_eq!(root.children()[0].probabilities(), Some(&[1.0, 0.0][..]));
    assert_eq!(root.class_counts(), &[2.0, 2.0]);

    for row in 0..data.num_instances() {
        assert_eq!(
            tree.classify_instance(data.instance(row)).unwrap(),
            data.class_value(row)
        );
    }
}

#[test]
fn test_single_class_yields_single_leaf() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![vec!["x", "1"], vec!["y", "1"], vec!["x", "1"]];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    let root = tree.get_root().unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.predicted_class(), Some(1));
    assert_eq!(root.probabilities(), Some(&[0.0, 1.0][..]));
    assert_eq!(
        tree.classify_instance(array![0.0, MISSING].view()).unwrap(),
        Some(1)
    );
}

#[test]
fn test_empty_dataset_yields_degenerate_leaf() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows: Vec<Vec<&str>> = vec![];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    let root = tree.get_root().unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.predicted_class(), None);
    assert_eq!(root.probabilities(), Some(&[0.0, 0.0][..]));

    let instance = array![1.0, MISSING];
    assert_eq!(tree.classify_instance(instance.view()).unwrap(), None);
    assert_eq!(
        tree.distribution_for_instance(instance.view()).unwrap(),
        vec![0.0, 0.0]
    );
    assert_eq!(
        tree.generate_tree_structure().unwrap(),
        "Decision Tree Structure:\n└── null\n"
    );
}

#[test]
fn test_value_without_training_instances_gets_empty_leaf() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y", "z"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![
        vec!["x", "0"],
        vec!["x", "0"],
        vec!["y", "1"],
        vec!["y", "1"],
    ];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    let root = tree.get_root().unwrap();
    assert_eq!(root.children().len(), 3);
    let empty = &root.children()[2];
    assert!(empty.is_leaf());
    assert_eq!(empty.predicted_class(), None);
    assert_eq!(empty.weight(), 0.0);

    assert_eq!(
        tree.classify_instance(array![2.0, MISSING].view()).unwrap(),
        None
    );
    assert_eq!(
        tree.generate_tree_structure().unwrap(),
        "Decision Tree Structure:\n├── a = x: 0\n├── a = y: 1\n└── a = z: null\n"
    );
}

#[test]
fn test_numeric_attribute_is_rejected() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::numeric("t"),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let data = Dataset::new(attributes, array![[0.0, 1.5, 0.0], [1.0, 2.5, 1.0]], 2).unwrap();

    let mut tree = DecisionTree::default();
    let result = tree.fit(&data).map(|_| ());
    assert_eq!(
        result,
        Err(ModelError::UnsupportedAttributeType {
            attribute: "t".to_string(),
            kind: crate::dataset::AttributeKind::Numeric,
        })
    );
    // A failed fit leaves the tree unfitted
    assert!(tree.get_root().is_none());
}

#[test]
fn test_date_attribute_is_rejected() {
    let attributes = vec![
        Attribute::date("when"),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let data = Dataset::new(attributes, array![[1.7e9, 0.0]], 1).unwrap();
    assert!(matches!(
        DecisionTree::default().induce(&data),
        Err(ModelError::UnsupportedAttributeType { .. })
    ));
}

#[test]
fn test_missing_value_rejected_by_information_gain() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![vec!["x", "0"], vec!["y", "1"], vec!["?", "1"]];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();

    assert_eq!(
        DecisionTree::default().induce(&data),
        Err(ModelError::MissingValueNotAllowed {
            attribute: "a".to_string(),
            row: 2,
        })
    );

    let reciprocal = tree_with(DecisionTreeParams {
        criterion: SplitCriterion::ReciprocalGain,
        ..Default::default()
    });
    assert!(matches!(
        reciprocal.induce(&data),
        Err(ModelError::MissingValueNotAllowed { .. })
    ));
}

#[test]
fn test_rows_with_missing_class_are_ignored() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![
        vec!["x", "0"],
        vec!["y", "1"],
        vec!["?", "?"],
        vec!["x", "?"],
    ];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();

    let root = DecisionTree::default().induce(&data).unwrap();
    assert_eq!(root.split_attribute(), Some(0));
    assert_eq!(root.weight(), 2.0);
}

#[test]
fn test_missing_aware_gain_routes_missing_values_fractionally() {
    let weather = load_weather().unwrap();
    let mut values = weather.values().to_owned();
    values[[0, 0]] = MISSING;
    let data = Dataset::new(weather.attributes().to_vec(), values, 4).unwrap();

    let tree = tree_with(DecisionTreeParams {
        criterion: SplitCriterion::MissingAwareGain,
        ..Default::default()
    });
    let root = tree.induce(&data).unwrap();

    assert_eq!(root.split_attribute(), Some(0));
    let routed: f64 = root.children().iter().map(Node::weight).sum();
    assert_abs_diff_eq!(routed, 14.0, epsilon = 1e-9);
    assert_abs_diff_eq!(root.children()[0].weight(), 4.0 + 4.0 / 13.0, epsilon = 1e-9);
    assert_abs_diff_eq!(root.children()[2].weight(), 5.0 + 5.0 / 13.0, epsilon = 1e-9);
}

#[test]
fn test_gain_ratio_penalizes_attribute_with_missing_values() {
    let weather = load_weather().unwrap();
    let mut values = weather.values().to_owned();
    values[[0, 0]] = MISSING;
    let data = Dataset::new(weather.attributes().to_vec(), values, 4).unwrap();

    let tree = tree_with(DecisionTreeParams {
        criterion: SplitCriterion::GainRatio,
        ..Default::default()
    });
    // The unknown bag inflates the split information of outlook, so humidity wins
    let root = tree.induce(&data).unwrap();
    assert_eq!(root.split_attribute(), Some(2));
}

#[test]
fn test_weather_tree_shape() {
    let (data, tree) = weather_tree(DecisionTreeParams::default());
    let root = tree.get_root().unwrap();

    assert_eq!(root.split_attribute(), Some(0));
    let sunny = &root.children()[0];
    let overcast = &root.children()[1];
    let rainy = &root.children()[2];

    assert_eq!(sunny.split_attribute(), Some(2));
    assert_eq!(sunny.children()[0].predicted_class(), Some(1));
    assert_eq!(sunny.children()[1].predicted_class(), Some(0));
    assert_eq!(overcast.predicted_class(), Some(0));
    assert_eq!(rainy.split_attribute(), Some(3));
    assert_eq!(rainy.children()[0].predicted_class(), Some(0));
    assert_eq!(rainy.children()[1].predicted_class(), Some(1));

    assert_eq!(root.num_nodes(), 8);
    assert_eq!(root.num_leaves(), 5);
    assert_eq!(root.depth(), 2);

    let depths: Vec<usize> = root.preorder().map(|(depth, _)| depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 1, 1, 2, 2]);

    assert_eq!(tree.get_n_classes(), 2);
    assert_eq!(tree.class_label(0), Some("yes"));
    assert_eq!(tree.get_class_index(), data.class_index());
}

#[test]
fn test_weather_training_instances_are_reproduced() {
    let (data, tree) = weather_tree(DecisionTreeParams::default());
    for row in 0..data.num_instances() {
        assert_eq!(
            tree.classify_instance(data.instance(row)).unwrap(),
            data.class_value(row),
            "instance {}",
            row
        );
    }
}

#[test]
fn test_leaves_are_not_split_again() {
    let (data, tree) = weather_tree(DecisionTreeParams::default());
    let root = tree.get_root().unwrap();

    // The training instances reaching a leaf carry a single class, so they offer no gain
    for leaf in root.preorder().map(|(_, node)| node).filter(|n| n.is_leaf()) {
        let non_zero = leaf.class_counts().iter().filter(|&&c| c > 0.0).count();
        assert!(non_zero <= 1);
    }

    let overcast_rows: Vec<(usize, f64)> = (0..data.num_instances())
        .filter(|&row| data.value(row, 0) == Some(1))
        .map(|row| (row, 1.0))
        .collect();
    let dist = Distribution::whole(&data, &overcast_rows);
    assert_eq!(dist.class_weights(), array![4.0, 0.0]);
}

#[test]
fn test_induction_is_deterministic() {
    let (_, first) = weather_tree(DecisionTreeParams::default());
    let (_, second) = weather_tree(DecisionTreeParams::default());
    assert_eq!(first.get_root(), second.get_root());
}

#[test]
fn test_criteria_agree_on_weather() {
    let (_, reference) = weather_tree(DecisionTreeParams::default());

    for criterion in [
        SplitCriterion::MissingAwareGain,
        SplitCriterion::GainRatio,
        SplitCriterion::ReciprocalGain,
    ] {
        let (_, tree) = weather_tree(DecisionTreeParams {
            criterion,
            ..Default::default()
        });
        assert_eq!(tree.get_root(), reference.get_root(), "{:?}", criterion);
    }
}

#[test]
fn test_max_depth_limits_growth() {
    let (_, stump) = weather_tree(DecisionTreeParams {
        max_depth: Some(0),
        ..Default::default()
    });
    let root = stump.get_root().unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.predicted_class(), Some(0));
    let probabilities = root.probabilities().unwrap();
    assert_abs_diff_eq!(probabilities[0], 9.0 / 14.0, epsilon = 1e-12);

    let (_, shallow) = weather_tree(DecisionTreeParams {
        max_depth: Some(1),
        ..Default::default()
    });
    let root = shallow.get_root().unwrap();
    assert_eq!(root.depth(), 1);
    assert_eq!(root.num_leaves(), 3);
    // sunny: 2 yes / 3 no
    assert_eq!(root.children()[0].predicted_class(), Some(1));
}

#[test]
fn test_min_instances_per_leaf() {
    let data = separable_dataset();

    let strict = tree_with(DecisionTreeParams {
        min_instances_per_leaf: 3.0,
        ..Default::default()
    });
    assert!(strict.induce(&data).unwrap().is_leaf());

    let loose = tree_with(DecisionTreeParams {
        min_instances_per_leaf: 2.0,
        ..Default::default()
    });
    assert_eq!(loose.induce(&data).unwrap().split_attribute(), Some(0));
}

#[test]
fn test_gain_epsilon_forces_leaf() {
    let (_, tree) = weather_tree(DecisionTreeParams {
        gain_epsilon: 0.5,
        ..Default::default()
    });
    assert!(tree.get_root().unwrap().is_leaf());
}

#[test]
fn test_unseen_value_is_an_error_by_default() {
    let data = separable_dataset();
    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    let result = tree.classify_instance(array![MISSING, 0.0].view());
    assert!(matches!(
        result,
        Err(ModelError::UndefinedPrediction { ref attribute, value })
            if attribute == "a" && value.is_nan()
    ));

    let result = tree.classify_instance(array![5.0, 0.0].view());
    assert!(matches!(
        result,
        Err(ModelError::UndefinedPrediction { value, .. }) if value == 5.0
    ));
}

#[test]
fn test_unseen_value_back_off() {
    let data = separable_dataset();
    let mut tree = tree_with(DecisionTreeParams {
        unseen_value: UnseenValuePolicy::BackOff,
        ..Default::default()
    });
    tree.fit(&data).unwrap();

    let instance = array![MISSING, MISSING];
    assert_eq!(tree.classify_instance(instance.view()).unwrap(), Some(0));
    assert_eq!(
        tree.distribution_for_instance(instance.view()).unwrap(),
        vec![0.5, 0.5]
    );
}

#[test]
fn test_instance_length_is_checked() {
    let data = separable_dataset();
    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    assert!(matches!(
        tree.classify_instance(array![0.0].view()),
        Err(ModelError::InputValidationError(_))
    ));
    assert!(matches!(
        tree.predict(array![[0.0, 0.0, 0.0]].view()),
        Err(ModelError::InputValidationError(_))
    ));
}

#[test]
fn test_laplace_smoothing() {
    let data = separable_dataset();
    let mut tree = tree_with(DecisionTreeParams {
        use_laplace: true,
        ..Default::default()
    });
    tree.fit(&data).unwrap();

    let distribution = tree.distribution_for_instance(data.instance(0)).unwrap();
    assert_abs_diff_eq!(distribution[0], 0.75, epsilon = 1e-12);
    assert_abs_diff_eq!(distribution[1], 0.25, epsilon = 1e-12);
    // Classification still follows the raw leaf
    assert_eq!(tree.classify_instance(data.instance(0)).unwrap(), Some(0));
}

#[test]
fn test_predict_batch_keeps_errors_per_instance() {
    let (data, tree) = weather_tree(DecisionTreeParams::default());

    let mut batch = data.values().slice(s![0..3, ..]).to_owned();
    batch[[1, 0]] = MISSING;

    let predictions = tree.predict(batch.view()).unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0], Ok(Some(1)));
    assert!(matches!(
        predictions[1],
        Err(ModelError::UndefinedPrediction { .. })
    ));
    assert_eq!(predictions[2], Ok(Some(0)));

    let probabilities = tree.predict_proba(batch.view()).unwrap();
    assert_eq!(probabilities[0], Ok(vec![0.0, 1.0]));
    assert!(probabilities[1].is_err());
}

#[test]
fn test_measures() {
    let (_, tree) = weather_tree(DecisionTreeParams::default());
    assert_eq!(tree.measure(TreeMeasure::TreeSize).unwrap(), 8.0);
    assert_eq!(tree.measure(TreeMeasure::NumLeaves).unwrap(), 5.0);
    assert_eq!(tree.measure(TreeMeasure::NumRules).unwrap(), 5.0);
}

#[test]
fn test_refit_replaces_tree() {
    let mut tree = DecisionTree::default();
    tree.fit(&separable_dataset()).unwrap();
    assert_eq!(tree.get_attributes().len(), 2);

    let weather = load_weather().unwrap();
    tree.fit(&weather).unwrap();
    assert_eq!(tree.get_attributes().len(), 5);
    assert_eq!(tree.get_class_index(), 4);
    assert_eq!(tree.get_root().unwrap().num_nodes(), 8);
}

#[test]
fn test_instance_weights_drive_majority() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![vec!["x", "0"], vec!["x", "1"]];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1)
        .unwrap()
        .with_weights(array![1.0, 3.0])
        .unwrap();

    let root = DecisionTree::default().induce(&data).unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.predicted_class(), Some(1));
    assert_eq!(root.probabilities(), Some(&[0.25, 0.75][..]));
}

#[test]
fn test_tiny_weights_still_split() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![vec!["x", "0"], vec!["x", "0"], vec!["y", "1"]];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1)
        .unwrap()
        .with_weights(array![1e-7, 1e-7, 1e-7])
        .unwrap();

    let root = DecisionTree::default().induce(&data).unwrap();
    assert_eq!(root.split_attribute(), Some(0));

    let x = &root.children()[0];
    let y = &root.children()[1];
    assert_eq!(x.predicted_class(), Some(0));
    assert_eq!(x.probabilities(), Some(&[1.0, 0.0][..]));
    assert_eq!(y.predicted_class(), Some(1));
    assert_eq!(y.probabilities(), Some(&[0.0, 1.0][..]));
}

#[test]
fn test_tiny_weight_leaf_is_normalized() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![vec!["x", "0"], vec!["x", "1"]];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1)
        .unwrap()
        .with_weights(array![1e-7, 3e-7])
        .unwrap();

    let root = DecisionTree::default().induce(&data).unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.predicted_class(), Some(1));
    let probabilities = root.probabilities().unwrap();
    assert_abs_diff_eq!(probabilities[0], 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(probabilities[1], 0.75, epsilon = 1e-12);
}

#[test]
fn test_equal_gain_prefers_first_attribute() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("b", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![
        vec!["x", "x", "0"],
        vec!["x", "x", "0"],
        vec!["y", "y", "1"],
        vec!["y", "y", "1"],
    ];
    let data = Dataset::from_nominal_rows(attributes, &rows, 2).unwrap();

    // Repeated runs guard against the parallel scoring leaking into the choice
    for _ in 0..20 {
        let root = DecisionTree::default().induce(&data).unwrap();
        assert_eq!(root.split_attribute(), Some(0));
    }

    let reciprocal = tree_with(DecisionTreeParams {
        criterion: SplitCriterion::ReciprocalGain,
        ..Default::default()
    });
    assert_eq!(reciprocal.induce(&data).unwrap().split_attribute(), Some(0));
}

#[test]
fn test_equal_gain_prefers_first_attribute_after_class_column() {
    let attributes = vec![
        Attribute::categorical("c", ["0", "1"]).unwrap(),
        Attribute::categorical("p", ["u", "v"]).unwrap(),
        Attribute::categorical("q", ["u", "v"]).unwrap(),
    ];
    // p and q separate the classes equally well with different layouts
    let rows = vec![
        vec!["0", "u", "v"],
        vec!["0", "u", "v"],
        vec!["1", "v", "u"],
        vec!["1", "v", "u"],
    ];
    let data = Dataset::from_nominal_rows(attributes, &rows, 0).unwrap();

    let root = DecisionTree::default().induce(&data).unwrap();
    assert_eq!(root.split_attribute(), Some(1));
}

#[test]
fn test_class_tie_predicts_lowest_index() {
    let attributes = vec![
        Attribute::categorical("a", ["x", "y"]).unwrap(),
        Attribute::categorical("c", ["0", "1"]).unwrap(),
    ];
    let rows = vec![vec!["x", "1"], vec!["x", "0"]];
    let data = Dataset::from_nominal_rows(attributes, &rows, 1).unwrap();

    let mut tree = DecisionTree::default();
    tree.fit(&data).unwrap();

    let root = tree.get_root().unwrap();
    assert!(root.is_leaf());
    assert_eq!(root.predicted_class(), Some(0));
    assert_eq!(root.probabilities(), Some(&[0.5, 0.5][..]));
    assert_eq!(tree.classify_instance(data.instance(0)).unwrap(), Some(0));
}

#[test]
fn test_getters_return_fitted_state() {
    let params = DecisionTreeParams {
        max_depth: Some(3),
        ..Default::default()
    };
    let mut tree = tree_with(params.clone());
    assert_eq!(tree.get_parameters(), &params);
    assert!(tree.get_attributes().is_empty());

    tree.fit(&separable_dataset()).unwrap();
    assert_eq!(tree.get_attributes()[0].name(), "a");
    assert_eq!(tree.get_root().map(Node::num_nodes), Some(3));
}
