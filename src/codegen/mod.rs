//! Model-to-source compilation.
//!
//! `port` validates the descriptor, checks the requested combination
//! against the capability registry, picks the emitter for the model family
//! and renders the packaging mode's skeleton. The result is the program
//! text plus, for EXPORTED, the data document the program loads at start.

pub mod literal;
mod mlp;
mod tree;


use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use literal::Converter;
pub(crate) use mlp::MlpEmitter;
pub(crate) use tree::TreeEmitter;

use crate::error::{PorterError, Result};
use crate::model::{ModelDescriptor, ModelKind};
use crate::support::{self, Language, Method, Mode};
use crate::template::TemplateSet;

// ─── Types ─────────────────────────────────────────────────────────

/// What to generate: language, packaging, printed method and naming.
#[derive(Clone, Debug)]
pub struct Target {
    pub language: Language,
    pub mode: Mode,
    pub method: Method,
    /// Name of the generated class, also the stem of the written files.
    pub class_name: String,
    /// Source file extension, without the dot.
    pub extension: String,
    pub converter: Converter,
}

impl Target {
    pub fn new(language: Language, mode: Mode, method: Method, class_name: impl Into<String>) -> Self {
        Target {
            language,
            mode,
            method,
            class_name: class_name.into(),
            extension: language.extension().to_string(),
            converter: Converter::default(),
        }
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    fn output_template(&self) -> &'static str {
        match self.method {
            Method::Predict => "output.predict",
            Method::PredictProba => "output.predict_proba",
        }
    }
}

/// A generated program, ready to be saved or executed.
#[derive(Clone, Debug)]
pub struct Ported {
    pub class_name: String,
    pub language: Language,
    pub mode: Mode,
    pub method: Method,
    pub extension: String,
    /// Program text.
    pub source: String,
    /// Compact JSON data document, EXPORTED only.
    pub data: Option<String>,
}

impl Ported {
    pub fn source_file_name(&self) -> String {
        format!("{}.{}", self.class_name, self.extension)
    }

    pub fn data_file_name(&self) -> Option<String> {
        self.data.as_ref().map(|_| format!("{}.json", self.class_name))
    }

    /// Write the source (and data) file into `dir`, returning the written
    /// paths in that order.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .map_err(|e| PorterError::io("cannot create directory", dir, e))?;
        let mut written = Vec::new();
        let source_path = dir.join(self.source_file_name());
        std::fs::write(&source_path, &self.source)
            .map_err(|e| PorterError::io("cannot write", &source_path, e))?;
        written.push(source_path);
        if let (Some(data), Some(name)) = (&self.data, self.data_file_name()) {
            let data_path = dir.join(name);
            std::fs::write(&data_path, data)
                .map_err(|e| PorterError::io("cannot write", &data_path, e))?;
            written.push(data_path);
        }
        debug!(files = written.len(), dir = %dir.display(), "saved ported model");
        Ok(written)
    }
}

// ─── Emitter Factory ───────────────────────────────────────────────

/// Lowering of one model family into a language's templates.
pub(crate) trait ModelEmitter {
    fn kind(&self) -> ModelKind;
    /// Program text for the target's mode and method.
    fn source(&self, set: &TemplateSet, target: &Target) -> Result<String>;
    /// EXPORTED data document.
    fn data(&self, converter: &Converter) -> Result<String>;
}

pub(crate) fn create_emitter(model: &ModelDescriptor) -> Box<dyn ModelEmitter + '_> {
    match model {
        ModelDescriptor::Tree(tree) => Box::new(TreeEmitter::new(tree)),
        ModelDescriptor::Mlp(mlp) => Box::new(MlpEmitter::new(mlp)),
    }
}

/// True when `name` can be used as a class name in every target language.
pub fn is_valid_class_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ─── Port ──────────────────────────────────────────────────────────

/// Compile `model` into a standalone program for `target`.
pub fn port(model: &ModelDescriptor, target: &Target) -> Result<Ported> {
    model.validate()?;
    support::check(model.kind(), target.language, target.mode, target.method)?;
    if !is_valid_class_name(&target.class_name) {
        return Err(PorterError::InvalidInput(format!(
            "'{}' is not a valid class name",
            target.class_name
        )));
    }

    let set = TemplateSet::load(target.language);
    let emitter = create_emitter(model);
    let source = emitter.source(&set, target)?;
    let data = match target.mode {
        Mode::Exported => Some(emitter.data(&target.converter)?),
        Mode::Attached | Mode::Combined => None,
    };
    info!(
        kind = %emitter.kind(),
        language = %target.language,
        mode = %target.mode,
        method = %target.method,
        bytes = source.len(),
        "ported model"
    );
    Ok(Ported {
        class_name: target.class_name.clone(),
        language: target.language,
        mode: target.mode,
        method: target.method,
        extension: target.extension.clone(),
        source,
        data,
    })
}
