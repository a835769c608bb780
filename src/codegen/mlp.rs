//! Multi-layer perceptron lowering. The weights are flattened into nested
//! literals; the forward pass itself lives in the class template.

use serde::Serialize;
use serde_json::value::RawValue;

use super::literal::{self, Converter, Scalar};
use super::{ModelEmitter, Target};
use crate::error::{PorterError, Result};
use crate::model::{Activation, MlpModel, ModelKind};
use crate::support::Mode;
use crate::template::TemplateSet;

pub(crate) struct MlpEmitter<'a> {
    mlp: &'a MlpModel,
}

#[derive(Serialize)]
struct MlpData<'a> {
    layers: &'a [usize],
    weights: Vec<Vec<Vec<Box<RawValue>>>>,
    bias: Vec<Vec<Box<RawValue>>>,
}

impl<'a> MlpEmitter<'a> {
    pub(crate) fn new(mlp: &'a MlpModel) -> Self {
        MlpEmitter { mlp }
    }

    fn declarations(&self, set: &TemplateSet, converter: &Converter) -> [(&'static str, String); 3] {
        let mlp = self.mlp;
        let weights = literal::list(
            set,
            mlp.weights.iter().map(|matrix| {
                literal::list(
                    set,
                    matrix.iter().map(|row| literal::doubles(set, converter, row)),
                )
            }),
        );
        let bias = literal::list(
            set,
            mlp.biases.iter().map(|row| literal::doubles(set, converter, row)),
        );
        let layers = literal::ints(set, &mlp.layers);
        // Weights and biases are ragged; the MLP languages only need the rank.
        [
            (
                "layers",
                literal::declare(set, Scalar::Int, "layers", &layers, &[mlp.layers.len()]),
            ),
            (
                "weights",
                literal::declare(set, Scalar::Double, "weights", &weights, &[0, 0, 0]),
            ),
            (
                "bias",
                literal::declare(set, Scalar::Double, "bias", &bias, &[mlp.layers.len(), 0]),
            ),
        ]
    }
}

impl ModelEmitter for MlpEmitter<'_> {
    fn kind(&self) -> ModelKind {
        if self.mlp.is_classifier() {
            ModelKind::MlpClassifier
        } else {
            ModelKind::MlpRegressor
        }
    }

    fn source(&self, set: &TemplateSet, target: &Target) -> Result<String> {
        let mlp = self.mlp;
        let skeleton = match target.mode {
            Mode::Attached => "mlp.attached",
            Mode::Exported => "mlp.exported",
            Mode::Combined => "mlp.combined",
        };
        if !set.has(skeleton) {
            return Err(PorterError::NotSupported {
                kind: self.kind().name().to_string(),
                what: format!("the packaging mode '{}' in {}", target.mode, set.language),
            });
        }

        let class_name = target.class_name.as_str();
        let hidden = set.text(&format!("activation.hidden.{}", mlp.hidden_activation.key()));
        let output_activation = mlp.output_activation.unwrap_or(Activation::Identity);
        let output_fn = set.text(&format!("activation.output.{}", output_activation.key()));
        let methods = if mlp.is_classifier() {
            set.text("mlp.classifier")
        } else {
            set.text("mlp.regressor")
        };
        let class = set.render(
            "mlp.class",
            &[
                ("class_name", class_name),
                ("hidden_activation", hidden),
                ("output_activation", output_fn),
                ("methods", methods),
            ],
        );
        let n_features = mlp.n_inputs().to_string();

        let mut bindings: Vec<(&str, &str)> = vec![
            ("class_name", class_name),
            ("class", class.as_str()),
            ("n_features", n_features.as_str()),
            ("output", set.text(target.output_template())),
        ];
        let declarations = match target.mode {
            Mode::Attached => Some(self.declarations(set, &target.converter)),
            Mode::Combined | Mode::Exported => None,
        };
        for (name, text) in declarations.iter().flatten() {
            bindings.push((*name, text.as_str()));
        }
        Ok(set.render(skeleton, &bindings))
    }

    fn data(&self, converter: &Converter) -> Result<String> {
        let mlp = self.mlp;
        let weights = mlp
            .weights
            .iter()
            .map(|matrix| {
                matrix
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|&v| literal::json_number(converter, v))
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        let bias = mlp
            .biases
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| literal::json_number(converter, v))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        let data = MlpData {
            layers: &mlp.layers,
            weights,
            bias,
        };
        serde_json::to_string(&data).map_err(|e| PorterError::InvalidDescriptor {
            kind: self.kind().name().to_string(),
            reason: e.to_string(),
        })
    }
}
