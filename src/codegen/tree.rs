//! Decision tree lowering: nested conditionals, array literals and the
//! exported data document.

use serde::Serialize;
use serde_json::value::RawValue;

use super::literal::{self, Converter, Scalar};
use super::{ModelEmitter, Target};
use crate::error::{PorterError, Result};
use crate::model::{ModelKind, TreeModel, NO_CHILD};
use crate::support::Mode;
use crate::template::TemplateSet;

pub(crate) struct TreeEmitter<'a> {
    tree: &'a TreeModel,
}

/// Everything the branch walk needs that does not change per node.
struct Walk<'a> {
    set: &'a TemplateSet,
    converter: &'a Converter,
    features: String,
    classes: String,
}

impl Walk<'_> {
    fn line(&self, out: &mut String, depth: usize, text: &str) {
        out.push('\n');
        if let Some(base) = self.set.indent {
            out.push_str(&self.set.text("indent").repeat(base + depth));
        }
        out.push_str(text);
    }
}

#[derive(Serialize)]
struct TreeData<'a> {
    lefts: &'a [i64],
    rights: &'a [i64],
    thresholds: Vec<Box<RawValue>>,
    indices: &'a [i64],
    classes: &'a [Vec<u64>],
}

impl<'a> TreeEmitter<'a> {
    pub(crate) fn new(tree: &'a TreeModel) -> Self {
        TreeEmitter { tree }
    }

    /// Lower the whole tree into branch code, starting at the root.
    pub(crate) fn branches(&self, set: &TemplateSet, converter: &Converter) -> String {
        let walk = Walk {
            set,
            converter,
            features: format!("{}features", set.prefix),
            classes: format!("{}classes", set.prefix),
        };
        let mut out = String::new();
        self.branch(&walk, 0, 0, &mut out);
        out.trim_start().to_string()
    }

    fn branch(&self, walk: &Walk<'_>, node: usize, depth: usize, out: &mut String) {
        let tree = self.tree;
        let set = walk.set;

        if tree.is_leaf(node) {
            for (class, &count) in tree.classes[node].iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let assign = set.render(
                    "assign",
                    &[
                        ("classes", &walk.classes),
                        ("index", &class.to_string()),
                        ("value", &count.to_string()),
                    ],
                );
                walk.line(out, depth, &format!("{}{}", assign, set.text("join")));
            }
            return;
        }

        let feature = tree.indices[node].to_string();
        let threshold = walk.converter.convert(tree.thresholds[node]);
        let condition = |op: &str| {
            set.render(
                "if",
                &[
                    ("features", &walk.features),
                    ("index", &feature),
                    ("op", op),
                    ("threshold", &threshold),
                ],
            )
        };

        let left = tree.lefts[node];
        let right = tree.rights[node];
        match (left != NO_CHILD, right != NO_CHILD) {
            (true, true) => {
                walk.line(out, depth, &condition("<="));
                self.branch(walk, left as usize, depth + 1, out);
                walk.line(out, depth, set.text("else"));
                self.branch(walk, right as usize, depth + 1, out);
                walk.line(out, depth, set.text("endif"));
            }
            (true, false) => {
                walk.line(out, depth, &condition("<="));
                self.branch(walk, left as usize, depth + 1, out);
                walk.line(out, depth, set.text("endif"));
            }
            (false, true) => {
                walk.line(out, depth, &condition(">"));
                self.branch(walk, right as usize, depth + 1, out);
                walk.line(out, depth, set.text("endif"));
            }
            (false, false) => {}
        }
    }

    /// The four parallel arrays and the class-count matrix as declarations,
    /// sentinels kept verbatim.
    fn declarations(&self, set: &TemplateSet, converter: &Converter) -> [(&'static str, String); 5] {
        let tree = self.tree;
        let n = tree.len();
        let rows = literal::list(set, tree.classes.iter().map(|row| literal::ints(set, row)));
        [
            (
                "lefts",
                literal::declare(set, Scalar::Int, "lefts", &literal::ints(set, &tree.lefts), &[n]),
            ),
            (
                "rights",
                literal::declare(set, Scalar::Int, "rights", &literal::ints(set, &tree.rights), &[n]),
            ),
            (
                "thresholds",
                literal::declare(
                    set,
                    Scalar::Double,
                    "thresholds",
                    &literal::doubles(set, converter, &tree.thresholds),
                    &[n],
                ),
            ),
            (
                "indices",
                literal::declare(set, Scalar::Int, "indices", &literal::ints(set, &tree.indices), &[n]),
            ),
            (
                "classes",
                literal::declare(set, Scalar::Int, "classes", &rows, &[n, tree.n_classes()]),
            ),
        ]
    }
}

impl ModelEmitter for TreeEmitter<'_> {
    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTreeClassifier
    }

    fn source(&self, set: &TemplateSet, target: &Target) -> Result<String> {
        let tree = self.tree;
        let class_name = target.class_name.as_str();
        let n_features = tree.n_features().to_string();
        let n_classes = tree.n_classes().to_string();
        let methods = set.render("tree.methods", &[("class_name", class_name)]);
        let output = set.text(target.output_template());

        let skeleton = match target.mode {
            Mode::Attached => "tree.attached",
            Mode::Combined => "tree.combined",
            Mode::Exported => "tree.exported",
        };
        if !set.has(skeleton) {
            return Err(PorterError::NotSupported {
                kind: self.kind().name().to_string(),
                what: format!("the packaging mode '{}' in {}", target.mode, set.language),
            });
        }

        let declarations = match target.mode {
            Mode::Exported => None,
            Mode::Attached | Mode::Combined => Some(self.declarations(set, &target.converter)),
        };
        let branches = match target.mode {
            Mode::Combined => self.branches(set, &target.converter),
            Mode::Attached | Mode::Exported => String::new(),
        };

        let mut bindings: Vec<(&str, &str)> = vec![
            ("class_name", class_name),
            ("n_features", n_features.as_str()),
            ("n_classes", n_classes.as_str()),
            ("methods", methods.as_str()),
            ("output", output),
            ("tree", branches.as_str()),
        ];
        for (name, text) in declarations.iter().flatten() {
            bindings.push((*name, text.as_str()));
        }
        Ok(set.render(skeleton, &bindings))
    }

    fn data(&self, converter: &Converter) -> Result<String> {
        let tree = self.tree;
        let thresholds = tree
            .thresholds
            .iter()
            .map(|&v| literal::json_number(converter, v))
            .collect::<Result<Vec<_>>>()?;
        let data = TreeData {
            lefts: &tree.lefts,
            rights: &tree.rights,
            thresholds,
            indices: &tree.indices,
            classes: &tree.classes,
        };
        serde_json::to_string(&data).map_err(|e| PorterError::InvalidDescriptor {
            kind: self.kind().name().to_string(),
            reason: e.to_string(),
        })
    }
}
