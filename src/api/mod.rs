//! Public entry point: one fitted model, one target, port/run/score.
//!
//! ```no_run
//! use porter::{Estimator, Language, Mode};
//!
//! let estimator = Estimator::load("tree.json".as_ref())?
//!     .with_language(Language::Go)
//!     .with_mode(Mode::Exported);
//! let ported = estimator.port()?;
//! println!("{}", ported.source);
//! # Ok::<(), porter::PorterError>(())
//! ```

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codegen::{self, Converter, Ported, Target};
use crate::config::PorterConfig;
use crate::error::{PorterError, Result};
use crate::model::{ModelDescriptor, ModelKind};
use crate::runtime::{Harness, Prediction};
use crate::score;
use crate::support::{self, Language, Method, Mode};

/// A validated model descriptor bound to a target language, packaging
/// mode, printed method, class name and number converter.
#[derive(Clone, Debug)]
pub struct Estimator {
    model: ModelDescriptor,
    language: Language,
    mode: Mode,
    method: Method,
    class_name: String,
    converter: Converter,
    config: PorterConfig,
}

impl Estimator {
    /// Wrap a descriptor, targeting the default language and mode for its
    /// kind. The class name defaults to the kind's name.
    pub fn new(model: ModelDescriptor) -> Result<Self> {
        model.validate()?;
        let kind = model.kind();
        let (language, mode) = support::default_target(kind);
        Ok(Estimator {
            model,
            language,
            mode,
            method: Method::default(),
            class_name: kind.name().to_string(),
            converter: Converter::default(),
            config: PorterConfig::default(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::new(ModelDescriptor::from_json(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::new(ModelDescriptor::load(path)?)
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_config(mut self, config: PorterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(&self) -> &ModelDescriptor {
        &self.model
    }

    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn config(&self) -> &PorterConfig {
        &self.config
    }

    fn target(&self) -> Target {
        let mut target = Target::new(self.language, self.mode, self.method, self.class_name.clone())
            .with_converter(self.converter.clone());
        target.extension = self.config.language(self.language).extension;
        target
    }

    // ─── Port ──────────────────────────────────────────────────────

    /// Generate the program text (and EXPORTED data document).
    pub fn port(&self) -> Result<Ported> {
        codegen::port(&self.model, &self.target())
    }

    /// Port and write the files into `dir`.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.port()?.save(dir)
    }

    // ─── Run ───────────────────────────────────────────────────────

    /// Run the ported program once per row with the configured harness.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Option<Prediction>>> {
        self.predict_with(&Harness::new(self.config.harness.clone()), rows)
    }

    pub fn predict_with(&self, harness: &Harness, rows: &[Vec<f64>]) -> Result<Vec<Option<Prediction>>> {
        self.check_rows(rows)?;
        let ported = self.port()?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let spec = self.config.language(self.language);
        harness.run(&ported, &spec, rows)
    }

    /// Accuracy of the ported program. `expected` defaults to the
    /// descriptor's own predictions.
    pub fn score(&self, rows: &[Vec<f64>], expected: Option<&[f64]>, normalize: bool) -> Result<f64> {
        self.score_with(&Harness::new(self.config.harness.clone()), rows, expected, normalize)
    }

    pub fn score_with(
        &self,
        harness: &Harness,
        rows: &[Vec<f64>],
        expected: Option<&[f64]>,
        normalize: bool,
    ) -> Result<f64> {
        if !self.kind().is_classifier() {
            return Err(PorterError::NotSupported {
                kind: self.kind().name().to_string(),
                what: "scoring".to_string(),
            });
        }
        let reference: Vec<f64>;
        let expected = match expected {
            Some(labels) => labels,
            None => {
                self.check_rows(rows)?;
                reference = rows.iter().map(|row| self.model.predict(row)).collect();
                &reference
            }
        };
        if expected.len() != rows.len() {
            return Err(PorterError::InvalidInput(format!(
                "{} rows but {} expected labels",
                rows.len(),
                expected.len()
            )));
        }
        let predicted = self.predict_with(harness, rows)?;
        let accuracy = score::accuracy(&predicted, expected, normalize)?;
        debug!(rows = rows.len(), accuracy, "scored ported model");
        Ok(accuracy)
    }

    /// Capability report, optionally limited to one language.
    pub fn show(language: Option<Language>) -> String {
        support::report(language)
    }

    /// Rows must match the model's input width exactly: generated
    /// programs take one argument per feature. Every value must be finite.
    fn check_rows(&self, rows: &[Vec<f64>]) -> Result<()> {
        let n_features = self.model.n_features();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(PorterError::InvalidInput(format!(
                    "row {} has {} features, the model expects {}",
                    i,
                    row.len(),
                    n_features
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(PorterError::InvalidInput(format!(
                    "row {} feature {} is {}, features must be finite",
                    i, j, row[j]
                )));
            }
        }
        Ok(())
    }
}
