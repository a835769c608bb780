use super::*;

/// Depth-2 tree over two features with three classes.
///
/// ```text
/// 0: f0 <= 0.5 ? 1 : 2
/// 1: leaf [4, 0, 0]
/// 2: f1 <= 1.5 ? 3 : 4
/// 3: leaf [0, 3, 1]
/// 4: leaf [0, 1, 5]
/// ```
pub(crate) fn sample_tree() -> TreeModel {
    TreeModel {
        lefts: vec![1, -1, 3, -1, -1],
        rights: vec![2, -1, 4, -1, -1],
        thresholds: vec![0.5, LEAF, 1.5, LEAF, LEAF],
        indices: vec![0, -2, 1, -2, -2],
        classes: vec![
            vec![4, 4, 6],
            vec![4, 0, 0],
            vec![0, 4, 6],
            vec![0, 3, 1],
            vec![0, 1, 5],
        ],
        n_features: None,
    }
}

/// A root split with only a left child. The root's own counts favour
/// class 1 but must never be reported.
///
/// ```text
/// 0: f0 <= 0.5 ? 1 : -
/// 1: leaf [3, 0]
/// ```
pub(crate) fn one_sided_tree() -> TreeModel {
    TreeModel {
        lefts: vec![1, -1],
        rights: vec![-1, -1],
        thresholds: vec![0.5, LEAF],
        indices: vec![0, -2],
        classes: vec![vec![0, 5], vec![3, 0]],
        n_features: None,
    }
}

/// 2 inputs, one hidden layer of 2 relu units, 3 softmax outputs.
pub(crate) fn sample_mlp() -> MlpModel {
    MlpModel {
        layers: vec![2, 3],
        weights: vec![
            vec![vec![1.0, -1.0], vec![0.5, 2.0]],
            vec![vec![1.0, 0.0, -1.0], vec![0.0, 1.0, 0.5]],
        ],
        biases: vec![vec![0.0, 0.1], vec![0.2, -0.2, 0.0]],
        hidden_activation: Activation::Relu,
        output_activation: Some(Activation::Softmax),
    }
}

#[test]
fn test_tree_walk_reaches_expected_leaves() {
    let tree = sample_tree();
    assert_eq!(tree.leaf(&[0.0, 9.0]), Some(1));
    assert_eq!(tree.leaf(&[1.0, 1.0]), Some(3));
    assert_eq!(tree.leaf(&[1.0, 2.0]), Some(4));
    // Ties go left.
    assert_eq!(tree.leaf(&[0.5, 2.0]), Some(1));
}

#[test]
fn test_tree_walk_into_missing_child_scores_zero() {
    let tree = one_sided_tree();
    assert_eq!(tree.leaf(&[0.9]), None);
    assert_eq!(tree.predict(&[0.9]), 0);
    assert_eq!(tree.predict_proba(&[0.9]), vec![0.0, 0.0]);
    assert_eq!(tree.leaf(&[0.1]), Some(1));
    assert_eq!(tree.predict(&[0.1]), 0);
}

#[test]
fn test_tree_predict_and_proba() {
    let tree = sample_tree();
    assert_eq!(tree.predict(&[0.0, 0.0]), 0);
    assert_eq!(tree.predict(&[1.0, 1.0]), 1);
    assert_eq!(tree.predict(&[1.0, 2.0]), 2);
    assert_eq!(tree.predict_proba(&[1.0, 1.0]), vec![0.0, 0.75, 0.25]);
}

#[test]
fn test_tree_argmax_prefers_first_maximum() {
    let mut tree = sample_tree();
    tree.classes[1] = vec![2, 2, 0];
    assert_eq!(tree.predict(&[0.0, 0.0]), 0);
}

#[test]
fn test_tree_n_features_defaults_to_largest_index() {
    let mut tree = sample_tree();
    assert_eq!(tree.n_features(), 2);
    tree.n_features = Some(4);
    assert_eq!(tree.n_features(), 4);
}

#[test]
fn test_tree_validate_accepts_sample() {
    assert!(sample_tree().validate().is_ok());
}

#[test]
fn test_empty_tree_is_not_fitted() {
    let err = TreeModel::default().validate().unwrap_err();
    assert!(matches!(err, PorterError::NotFitted { field: "lefts", .. }));
}

#[test]
fn test_tree_rejects_length_mismatch() {
    let mut tree = sample_tree();
    tree.thresholds.pop();
    let err = tree.validate().unwrap_err();
    assert!(err.to_string().contains("`thresholds` has 4 entries"));
}

#[test]
fn test_tree_rejects_cycle() {
    let mut tree = sample_tree();
    tree.lefts[2] = 0;
    let err = tree.validate().unwrap_err();
    assert!(matches!(err, PorterError::InvalidDescriptor { .. }));
    assert!(err.to_string().contains("reachable twice"));
}

#[test]
fn test_tree_rejects_dangling_child() {
    let mut tree = sample_tree();
    tree.rights[2] = 17;
    assert!(tree.validate().is_err());
}

#[test]
fn test_tree_rejects_ragged_classes() {
    let mut tree = sample_tree();
    tree.classes[3] = vec![1, 2];
    assert!(tree.validate().is_err());
}

#[test]
fn test_tree_rejects_feature_out_of_declared_range() {
    let mut tree = sample_tree();
    tree.n_features = Some(1);
    assert!(tree.validate().is_err());
}

#[test]
fn test_mlp_forward_matches_hand_computation() {
    let mlp = sample_mlp();
    // hidden = relu([1*1 + 2*0.5 + 0, 1*-1 + 2*2 + 0.1]) = [2.0, 3.1]
    // out = [2.2, 2.9, -0.45] before softmax
    let proba = mlp.predict_proba(&[1.0, 2.0]);
    let raw: [f64; 3] = [2.2f64, 2.9, -0.45];
    let sum: f64 = raw.iter().map(|v| v.exp()).sum();
    for (p, r) in proba.iter().zip(raw.iter()) {
        assert!((p - r.exp() / sum).abs() < 1e-12);
    }
    assert_eq!(mlp.predict(&[1.0, 2.0]), 1.0);
}

#[test]
fn test_mlp_single_logistic_unit_yields_two_classes() {
    let mlp = MlpModel {
        layers: vec![1],
        weights: vec![vec![vec![0.0]]],
        biases: vec![vec![0.0]],
        hidden_activation: Activation::Relu,
        output_activation: Some(Activation::Logistic),
    };
    assert!(mlp.validate().is_ok());
    assert_eq!(mlp.n_classes(), 2);
    assert_eq!(mlp.predict_proba(&[3.0]), vec![0.5, 0.5]);
}

#[test]
fn test_mlp_regressor_predicts_first_output() {
    let mlp = MlpModel {
        layers: vec![1],
        weights: vec![vec![vec![2.0], vec![-1.0]]],
        biases: vec![vec![0.5]],
        hidden_activation: Activation::Identity,
        output_activation: None,
    };
    let model = ModelDescriptor::from(mlp);
    assert_eq!(model.kind(), ModelKind::MlpRegressor);
    assert_eq!(model.predict(&[1.0, 1.0]), 1.5);
    assert!(model.predict_proba(&[1.0, 1.0]).is_none());
}

#[test]
fn test_mlp_rejects_shape_mismatch() {
    let mut mlp = sample_mlp();
    mlp.weights[1].pop();
    let err = mlp.validate().unwrap_err();
    assert!(err.to_string().contains("layer 1 weights have 1 rows, expected 2"));
}

#[test]
fn test_mlp_rejects_softmax_hidden_activation() {
    let mut mlp = sample_mlp();
    mlp.hidden_activation = Activation::Softmax;
    assert!(mlp.validate().is_err());
}

#[test]
fn test_descriptor_from_json() {
    let json = r#"{
        "type": "tree",
        "lefts": [1, -1, -1],
        "rights": [2, -1, -1],
        "thresholds": [0.25, -2.0, -2.0],
        "indices": [0, -2, -2],
        "classes": [[3, 3], [3, 0], [0, 3]]
    }"#;
    let model = ModelDescriptor::from_json(json).unwrap();
    assert_eq!(model.kind(), ModelKind::DecisionTreeClassifier);
    assert_eq!(model.n_features(), 1);
    assert_eq!(model.predict(&[1.0]), 1.0);
}

#[test]
fn test_descriptor_mlp_json_accepts_bias_alias() {
    let json = r#"{
        "type": "mlp",
        "layers": [1],
        "weights": [[[1.0]]],
        "bias": [[0.0]],
        "output_activation": "logistic"
    }"#;
    let model = ModelDescriptor::from_json(json).unwrap();
    assert_eq!(model.kind(), ModelKind::MlpClassifier);
    if let ModelDescriptor::Mlp(mlp) = &model {
        assert_eq!(mlp.hidden_activation, Activation::Relu);
    }
}

#[test]
fn test_descriptor_missing_arrays_is_not_fitted() {
    let err = ModelDescriptor::from_json(r#"{"type": "mlp"}"#).unwrap_err();
    assert!(matches!(err, PorterError::NotFitted { field: "layers", .. }));
}

#[test]
fn test_descriptor_unknown_type_is_invalid() {
    let err = ModelDescriptor::from_json(r#"{"type": "forest"}"#).unwrap_err();
    assert!(matches!(err, PorterError::InvalidDescriptor { .. }));
}
