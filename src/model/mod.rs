//! Neutral model descriptors.
//!
//! A descriptor is the language-agnostic numeric form of a fitted model:
//! plain arrays plus a little metadata, produced by whatever extracted the
//! model from its training runtime. Everything downstream (capability
//! checks, code generation, the execution harness) consumes only this.
//!
//! The descriptors can also be evaluated natively. The reference evaluator
//! mirrors the lookup logic of the generated programs and stands in for the
//! original model when no expected predictions are supplied.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PorterError, Result};

#[cfg(test)]
pub(crate) mod tests;

/// Threshold sentinel marking a leaf node.
pub const LEAF: f64 = -2.0;

/// Child sentinel marking a missing child.
pub const NO_CHILD: i64 = -1;

// ─── Kinds ─────────────────────────────────────────────────────────

/// Estimator family a descriptor stands for. Keys the capability registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    DecisionTreeClassifier,
    MlpClassifier,
    MlpRegressor,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::DecisionTreeClassifier,
        ModelKind::MlpClassifier,
        ModelKind::MlpRegressor,
    ];

    /// Estimator name, also the default class name of generated code.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::DecisionTreeClassifier => "DecisionTreeClassifier",
            ModelKind::MlpClassifier => "MLPClassifier",
            ModelKind::MlpRegressor => "MLPRegressor",
        }
    }

    pub fn is_classifier(&self) -> bool {
        !matches!(self, ModelKind::MlpRegressor)
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Descriptor ────────────────────────────────────────────────────

/// A fitted model in neutral form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelDescriptor {
    Tree(TreeModel),
    Mlp(MlpModel),
}

impl ModelDescriptor {
    /// Parse a descriptor from JSON and validate its shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: ModelDescriptor =
            serde_json::from_str(json).map_err(|e| PorterError::InvalidDescriptor {
                kind: "model".to_string(),
                reason: e.to_string(),
            })?;
        model.validate()?;
        Ok(model)
    }

    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PorterError::io("cannot read", path, e))?;
        Self::from_json(&json)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelDescriptor::Tree(_) => ModelKind::DecisionTreeClassifier,
            ModelDescriptor::Mlp(mlp) if mlp.is_classifier() => ModelKind::MlpClassifier,
            ModelDescriptor::Mlp(_) => ModelKind::MlpRegressor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelDescriptor::Tree(tree) => tree.validate(),
            ModelDescriptor::Mlp(mlp) => mlp.validate(),
        }
    }

    /// Number of input features a prediction row must carry.
    pub fn n_features(&self) -> usize {
        match self {
            ModelDescriptor::Tree(tree) => tree.n_features(),
            ModelDescriptor::Mlp(mlp) => mlp.n_inputs(),
        }
    }

    /// Native prediction: the class index for classifiers, the first
    /// output for regressors.
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self {
            ModelDescriptor::Tree(tree) => tree.predict(features) as f64,
            ModelDescriptor::Mlp(mlp) => mlp.predict(features),
        }
    }

    /// Native class probabilities, `None` for regressors.
    pub fn predict_proba(&self, features: &[f64]) -> Option<Vec<f64>> {
        match self {
            ModelDescriptor::Tree(tree) => Some(tree.predict_proba(features)),
            ModelDescriptor::Mlp(mlp) if mlp.is_classifier() => Some(mlp.predict_proba(features)),
            ModelDescriptor::Mlp(_) => None,
        }
    }
}

impl From<TreeModel> for ModelDescriptor {
    fn from(tree: TreeModel) -> Self {
        ModelDescriptor::Tree(tree)
    }
}

impl From<MlpModel> for ModelDescriptor {
    fn from(mlp: MlpModel) -> Self {
        ModelDescriptor::Mlp(mlp)
    }
}

fn invalid(kind: ModelKind, reason: String) -> PorterError {
    PorterError::InvalidDescriptor {
        kind: kind.name().to_string(),
        reason,
    }
}

fn not_fitted(kind: ModelKind, field: &'static str) -> PorterError {
    PorterError::NotFitted {
        kind: kind.name().to_string(),
        field,
    }
}

// ─── Decision tree ─────────────────────────────────────────────────

/// Decision tree in parallel-array form, rooted at node 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeModel {
    /// Left child per node, `-1` when absent.
    #[serde(default)]
    pub lefts: Vec<i64>,
    /// Right child per node, `-1` when absent.
    #[serde(default)]
    pub rights: Vec<i64>,
    /// Split threshold per node, `-2.0` for leaves.
    #[serde(default)]
    pub thresholds: Vec<f64>,
    /// Split feature index per node. Meaningless for leaves.
    #[serde(default)]
    pub indices: Vec<i64>,
    /// Per-node class counts. Only leaf rows are used.
    #[serde(default)]
    pub classes: Vec<Vec<u64>>,
    /// Input width. Defaults to one past the largest split feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_features: Option<usize>,
}

impl TreeModel {
    const KIND: ModelKind = ModelKind::DecisionTreeClassifier;

    pub fn len(&self) -> usize {
        self.lefts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lefts.is_empty()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.thresholds[node] == LEAF
    }

    pub fn n_classes(&self) -> usize {
        self.classes.first().map_or(0, Vec::len)
    }

    pub fn n_features(&self) -> usize {
        self.n_features.unwrap_or_else(|| {
            self.split_nodes()
                .map(|node| self.indices[node] as usize + 1)
                .max()
                .unwrap_or(1)
        })
    }

    fn split_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&node| !self.is_leaf(node))
    }

    /// Check the array shapes and the tree structure.
    ///
    /// Walks the tree from the root with an explicit stack; a node reached
    /// twice means a cycle or a shared subtree, both rejected.
    pub fn validate(&self) -> Result<()> {
        let kind = Self::KIND;
        if self.lefts.is_empty() {
            return Err(not_fitted(kind, "lefts"));
        }
        if self.rights.is_empty() {
            return Err(not_fitted(kind, "rights"));
        }
        if self.thresholds.is_empty() {
            return Err(not_fitted(kind, "thresholds"));
        }
        if self.indices.is_empty() {
            return Err(not_fitted(kind, "indices"));
        }
        if self.classes.is_empty() {
            return Err(not_fitted(kind, "classes"));
        }

        let n = self.lefts.len();
        for (name, len) in [
            ("rights", self.rights.len()),
            ("thresholds", self.thresholds.len()),
            ("indices", self.indices.len()),
            ("classes", self.classes.len()),
        ] {
            if len != n {
                return Err(invalid(
                    kind,
                    format!("`{}` has {} entries, `lefts` has {}", name, len, n),
                ));
            }
        }

        let n_classes = self.n_classes();
        if n_classes == 0 {
            return Err(invalid(kind, "class count rows are empty".to_string()));
        }
        if let Some(row) = self.classes.iter().position(|r| r.len() != n_classes) {
            return Err(invalid(
                kind,
                format!(
                    "class count row {} has {} entries, expected {}",
                    row,
                    self.classes[row].len(),
                    n_classes
                ),
            ));
        }

        let mut visited = vec![false; n];
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            if visited[node] {
                return Err(invalid(kind, format!("node {} is reachable twice", node)));
            }
            visited[node] = true;
            if self.is_leaf(node) {
                continue;
            }
            let feature = self.indices[node];
            if feature < 0 {
                return Err(invalid(
                    kind,
                    format!("split node {} has feature index {}", node, feature),
                ));
            }
            if let Some(width) = self.n_features {
                if feature as usize >= width {
                    return Err(invalid(
                        kind,
                        format!(
                            "split node {} uses feature {} but the model has {} features",
                            node, feature, width
                        ),
                    ));
                }
            }
            for child in [self.lefts[node], self.rights[node]] {
                if child == NO_CHILD {
                    continue;
                }
                if child < 0 || child as usize >= n {
                    return Err(invalid(
                        kind,
                        format!("node {} points to missing child {}", node, child),
                    ));
                }
                stack.push(child as usize);
            }
        }
        Ok(())
    }

    /// Walk from the root to the leaf a feature vector falls into.
    /// `None` when the walk leaves a split through a missing child; such
    /// inputs score zero for every class.
    ///
    /// Panics if `features` is shorter than a split feature index.
    pub fn leaf(&self, features: &[f64]) -> Option<usize> {
        let mut node = 0usize;
        while !self.is_leaf(node) {
            let feature = self.indices[node] as usize;
            let next = if features[feature] <= self.thresholds[node] {
                self.lefts[node]
            } else {
                self.rights[node]
            };
            if next == NO_CHILD {
                return None;
            }
            node = next as usize;
        }
        Some(node)
    }

    /// Class with the highest count at the leaf; ties go to the lower index.
    pub fn predict(&self, features: &[f64]) -> usize {
        self.leaf(features).map_or(0, |node| argmax_counts(&self.classes[node]))
    }

    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let Some(node) = self.leaf(features) else {
            return vec![0.0; self.n_classes()];
        };
        let counts = &self.classes[node];
        let sum: u64 = counts.iter().sum();
        counts
            .iter()
            .map(|&c| if sum > 0 { c as f64 / sum as f64 } else { 0.0 })
            .collect()
    }
}

fn argmax_counts(counts: &[u64]) -> usize {
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate().skip(1) {
        if count > counts[best] {
            best = i;
        }
    }
    best
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

// ─── Multi-layer perceptron ────────────────────────────────────────

/// Activation function identifiers, as named by the training library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Identity,
    Logistic,
    Tanh,
    Relu,
    Softmax,
}

impl Activation {
    pub fn key(&self) -> &'static str {
        match self {
            Activation::Identity => "identity",
            Activation::Logistic => "logistic",
            Activation::Tanh => "tanh",
            Activation::Relu => "relu",
            Activation::Softmax => "softmax",
        }
    }

    fn allowed_hidden(&self) -> bool {
        !matches!(self, Activation::Softmax)
    }

    fn allowed_output(&self) -> bool {
        matches!(
            self,
            Activation::Identity | Activation::Logistic | Activation::Softmax
        )
    }

    fn apply(&self, values: &mut [f64]) {
        match self {
            Activation::Identity => {}
            Activation::Logistic => {
                for v in values.iter_mut() {
                    *v = 1.0 / (1.0 + (-*v).exp());
                }
            }
            Activation::Tanh => {
                for v in values.iter_mut() {
                    *v = v.tanh();
                }
            }
            Activation::Relu => {
                for v in values.iter_mut() {
                    *v = v.max(0.0);
                }
            }
            Activation::Softmax => {
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let mut sum = 0.0;
                for v in values.iter_mut() {
                    *v = (*v - max).exp();
                    sum += *v;
                }
                for v in values.iter_mut() {
                    *v /= sum;
                }
            }
        }
    }
}

impl std::fmt::Display for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

fn default_hidden_activation() -> Activation {
    Activation::Relu
}

/// Fully-connected feed-forward network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MlpModel {
    /// Output width of every hidden layer and of the output layer.
    #[serde(default)]
    pub layers: Vec<usize>,
    /// Per layer, an input × output weight matrix.
    #[serde(default)]
    pub weights: Vec<Vec<Vec<f64>>>,
    /// Per layer, one bias per output unit.
    #[serde(default, alias = "bias")]
    pub biases: Vec<Vec<f64>>,
    #[serde(default = "default_hidden_activation")]
    pub hidden_activation: Activation,
    /// Present for classifiers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_activation: Option<Activation>,
}

impl MlpModel {
    fn model_kind(&self) -> ModelKind {
        if self.is_classifier() {
            ModelKind::MlpClassifier
        } else {
            ModelKind::MlpRegressor
        }
    }

    pub fn is_classifier(&self) -> bool {
        self.output_activation.is_some()
    }

    pub fn n_inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    pub fn n_outputs(&self) -> usize {
        self.layers.last().copied().unwrap_or(0)
    }

    /// Number of classes a classifier distinguishes. A single logistic
    /// output unit stands for two classes.
    pub fn n_classes(&self) -> usize {
        match self.n_outputs() {
            1 => 2,
            n => n,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let kind = self.model_kind();
        if self.layers.is_empty() {
            return Err(not_fitted(kind, "layers"));
        }
        if self.weights.is_empty() {
            return Err(not_fitted(kind, "weights"));
        }
        if self.biases.is_empty() {
            return Err(not_fitted(kind, "biases"));
        }
        let n_layers = self.layers.len();
        if self.weights.len() != n_layers || self.biases.len() != n_layers {
            return Err(invalid(
                kind,
                format!(
                    "{} layer sizes, {} weight matrices and {} bias vectors",
                    n_layers,
                    self.weights.len(),
                    self.biases.len()
                ),
            ));
        }
        if self.n_inputs() == 0 {
            return Err(invalid(kind, "the first weight matrix has no rows".to_string()));
        }

        let mut fan_in = self.n_inputs();
        for (i, &size) in self.layers.iter().enumerate() {
            if size == 0 {
                return Err(invalid(kind, format!("layer {} has no units", i)));
            }
            if self.weights[i].len() != fan_in {
                return Err(invalid(
                    kind,
                    format!(
                        "layer {} weights have {} rows, expected {}",
                        i,
                        self.weights[i].len(),
                        fan_in
                    ),
                ));
            }
            if let Some(row) = self.weights[i].iter().position(|r| r.len() != size) {
                return Err(invalid(
                    kind,
                    format!(
                        "layer {} weight row {} has {} columns, expected {}",
                        i,
                        row,
                        self.weights[i][row].len(),
                        size
                    ),
                ));
            }
            if self.biases[i].len() != size {
                return Err(invalid(
                    kind,
                    format!(
                        "layer {} has {} biases, expected {}",
                        i,
                        self.biases[i].len(),
                        size
                    ),
                ));
            }
            fan_in = size;
        }

        if !self.hidden_activation.allowed_hidden() {
            return Err(invalid(
                kind,
                format!("`{}` is not a hidden activation", self.hidden_activation),
            ));
        }
        if let Some(output) = self.output_activation {
            if !output.allowed_output() {
                return Err(invalid(
                    kind,
                    format!("`{}` is not an output activation", output),
                ));
            }
        }
        Ok(())
    }

    /// Forward pass through every layer.
    pub fn forward(&self, features: &[f64]) -> Vec<f64> {
        let last = self.layers.len() - 1;
        let mut activations = features.to_vec();
        for (i, &size) in self.layers.iter().enumerate() {
            let mut next = self.biases[i].clone();
            debug_assert_eq!(next.len(), size);
            for (j, &input) in activations.iter().enumerate() {
                for (k, unit) in next.iter_mut().enumerate() {
                    *unit += input * self.weights[i][j][k];
                }
            }
            if i == last {
                self.output_activation
                    .unwrap_or(Activation::Identity)
                    .apply(&mut next);
            } else {
                self.hidden_activation.apply(&mut next);
            }
            activations = next;
        }
        activations
    }

    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let out = self.forward(features);
        if out.len() == 1 {
            vec![1.0 - out[0], out[0]]
        } else {
            out
        }
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.is_classifier() {
            argmax(&self.predict_proba(features)) as f64
        } else {
            self.forward(features)[0]
        }
    }
}
