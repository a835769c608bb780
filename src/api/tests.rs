use super::*;
use crate::config::{HarnessOptions, LanguageOverride};
use crate::model::tests::{one_sided_tree, sample_mlp, sample_tree};
use crate::model::{MlpModel, TreeModel, LEAF};
use crate::runtime::{CommandOutput, Shell};

/// Answers every row command with the descriptor's own prediction.
struct ReferenceShell(ModelDescriptor);

impl Shell for ReferenceShell {
    fn run(&self, command: &str) -> std::io::Result<CommandOutput> {
        // Quoted paths never parse as numbers.
        let features: Vec<f64> = command
            .split_whitespace()
            .filter_map(|t| t.parse().ok())
            .collect();
        Ok(CommandOutput {
            success: true,
            stdout: format!("{{\"predict\": {}}}\n", self.0.predict(&features)),
            stderr: String::new(),
        })
    }
}

fn harness(model: ModelDescriptor, dir: &Path) -> Harness {
    let options = HarnessOptions {
        workers: Some(2),
        check_dependencies: false,
        directory: Some(dir.join("work")),
        poll_attempts: 1,
        poll_interval_ms: 0,
        retry_delay_ms: 0,
        ..HarnessOptions::default()
    };
    Harness::with_shell(options, Box::new(ReferenceShell(model)))
}

fn rows() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0],
        vec![1.0, 1.0],
        vec![1.0, 2.0],
        vec![0.25, 3.0],
    ]
}

#[test]
fn test_defaults_follow_the_model_kind() {
    let tree = Estimator::new(sample_tree().into()).unwrap();
    assert_eq!(tree.language(), Language::Java);
    assert_eq!(tree.mode(), Mode::Attached);
    assert_eq!(tree.method(), Method::Predict);
    assert_eq!(tree.class_name(), "DecisionTreeClassifier");

    let mlp = Estimator::new(sample_mlp().into()).unwrap();
    assert_eq!(mlp.language(), Language::JavaScript);
    assert_eq!(mlp.class_name(), "MLPClassifier");
}

#[test]
fn test_invalid_descriptor_is_rejected_up_front() {
    let err = Estimator::from_json(r#"{"type": "tree", "lefts": []}"#).unwrap_err();
    assert!(matches!(err, PorterError::NotFitted { .. }));
}

#[test]
fn test_port_uses_builder_settings() {
    let ported = Estimator::new(sample_tree().into())
        .unwrap()
        .with_language(Language::Ruby)
        .with_mode(Mode::Exported)
        .with_method(Method::PredictProba)
        .with_class_name("Iris")
        .port()
        .unwrap();
    assert_eq!(ported.source_file_name(), "Iris.rb");
    assert_eq!(ported.data_file_name().as_deref(), Some("Iris.json"));
    assert!(ported.source.contains("predictProba"));
}

#[test]
fn test_configured_extension_names_the_file() {
    let mut config = PorterConfig::default();
    config.languages.insert(
        "js".to_string(),
        LanguageOverride {
            extension: Some("mjs".to_string()),
            ..LanguageOverride::default()
        },
    );
    let dir = tempfile::tempdir().unwrap();
    let written = Estimator::new(sample_tree().into())
        .unwrap()
        .with_language(Language::JavaScript)
        .with_config(config)
        .save(dir.path())
        .unwrap();
    assert_eq!(written, vec![dir.path().join("DecisionTreeClassifier.mjs")]);
}

#[test]
fn test_unsupported_combination_is_rejected() {
    let err = Estimator::new(sample_mlp().into())
        .unwrap()
        .with_language(Language::Php)
        .port()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "the language PHP is not supported for the model `MLPClassifier`"
    );
}

#[test]
fn test_predict_matches_reference() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = sample_tree().into();
    let estimator = Estimator::new(model.clone())
        .unwrap()
        .with_language(Language::JavaScript);
    let predicted: Vec<f64> = estimator
        .predict_with(&harness(model.clone(), dir.path()), &rows())
        .unwrap()
        .into_iter()
        .map(|p| p.unwrap().predict)
        .collect();
    let expected: Vec<f64> = rows().iter().map(|r| model.predict(r)).collect();
    assert_eq!(predicted, expected);
}

#[test]
fn test_score_against_reference_and_labels() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = sample_tree().into();
    let estimator = Estimator::new(model.clone())
        .unwrap()
        .with_language(Language::Php);
    let harness = harness(model, dir.path());

    assert_eq!(estimator.score_with(&harness, &rows(), None, true).unwrap(), 1.0);
    // Rows land in classes [0, 1, 2, 0]; one label is off.
    let labels = [0.0, 1.0, 2.0, 2.0];
    assert_eq!(
        estimator.score_with(&harness, &rows(), Some(&labels), true).unwrap(),
        0.75
    );
    assert_eq!(
        estimator.score_with(&harness, &rows(), Some(&labels), false).unwrap(),
        3.0
    );
    assert_eq!(estimator.score_with(&harness, &[], None, true).unwrap(), 0.0);
}

#[test]
fn test_score_length_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = sample_tree().into();
    let estimator = Estimator::new(model.clone()).unwrap();
    let err = estimator
        .score_with(&harness(model, dir.path()), &rows(), Some(&[1.0]), true)
        .unwrap_err();
    assert!(matches!(err, PorterError::InvalidInput(_)));
}

#[test]
fn test_regressor_cannot_be_scored() {
    let dir = tempfile::tempdir().unwrap();
    let regressor = MlpModel {
        output_activation: None,
        ..sample_mlp()
    };
    let model: ModelDescriptor = regressor.into();
    let estimator = Estimator::new(model.clone()).unwrap();
    let err = estimator
        .score_with(&harness(model, dir.path()), &[vec![1.0, 2.0]], None, true)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "scoring is not supported for the model `MLPRegressor`"
    );
}

#[test]
fn test_short_rows_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = sample_mlp().into();
    let estimator = Estimator::new(model.clone()).unwrap();
    let err = estimator
        .predict_with(&harness(model, dir.path()), &[vec![1.0]])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid input: row 0 has 1 features, the model expects 2"
    );
}

/// Splits on feature 0 only, for inputs two features wide.
fn first_feature_stump(n_features: Option<usize>) -> TreeModel {
    TreeModel {
        lefts: vec![1, -1, -1],
        rights: vec![2, -1, -1],
        thresholds: vec![0.5, LEAF, LEAF],
        indices: vec![0, -2, -2],
        classes: vec![vec![1, 1], vec![1, 0], vec![0, 1]],
        n_features,
    }
}

#[test]
fn test_declared_width_covers_unsplit_features() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = first_feature_stump(Some(2)).into();
    let estimator = Estimator::new(model.clone())
        .unwrap()
        .with_language(Language::JavaScript);
    assert!(estimator
        .port()
        .unwrap()
        .source
        .contains("features.length !== 2"));
    let predicted = estimator
        .predict_with(&harness(model, dir.path()), &[vec![0.9, 7.0]])
        .unwrap();
    assert_eq!(predicted[0].as_ref().unwrap().predict, 1.0);
}

#[test]
fn test_rows_wider_than_the_program_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = first_feature_stump(None).into();
    let estimator = Estimator::new(model.clone())
        .unwrap()
        .with_language(Language::JavaScript);
    let err = estimator
        .predict_with(&harness(model, dir.path()), &[vec![0.0, 7.0]])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid input: row 0 has 2 features, the model expects 1"
    );
    assert!(!dir.path().join("work").exists());
}

#[test]
fn test_non_finite_features_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = sample_tree().into();
    let estimator = Estimator::new(model.clone()).unwrap();
    let harness = harness(model, dir.path());
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = estimator
            .predict_with(&harness, &[vec![0.0, 1.0], vec![0.5, value]])
            .unwrap_err();
        assert!(matches!(err, PorterError::InvalidInput(_)), "{}", err);
        assert!(err.to_string().contains("row 1 feature 1"), "{}", err);
    }
    assert!(!dir.path().join("work").exists());
}

#[test]
fn test_missing_child_predicts_zero_counts() {
    let dir = tempfile::tempdir().unwrap();
    let model: ModelDescriptor = one_sided_tree().into();
    let estimator = Estimator::new(model.clone())
        .unwrap()
        .with_language(Language::JavaScript);
    // The root's own counts favour class 1; neither row may report them.
    let predicted: Vec<f64> = estimator
        .predict_with(&harness(model, dir.path()), &[vec![0.9], vec![0.1]])
        .unwrap()
        .into_iter()
        .map(|p| p.unwrap().predict)
        .collect();
    assert_eq!(predicted, vec![0.0, 0.0]);
}

#[test]
fn test_show_lists_every_kind() {
    let report = Estimator::show(None);
    for kind in ModelKind::ALL {
        assert!(report.contains(kind.name()));
    }
}
