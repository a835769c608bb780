//! Capability registry: which (model, language, mode, method) combinations
//! the code generator can emit.
//!
//! The table is static and data-driven. Every request is checked against it
//! before a single template is rendered.

use std::fmt;
use std::str::FromStr;

use crate::error::{PorterError, Result};
use crate::model::ModelKind;

// ─── Keys ──────────────────────────────────────────────────────────

/// Target programming language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    C,
    Go,
    Java,
    JavaScript,
    Php,
    Ruby,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::C,
        Language::Go,
        Language::Java,
        Language::JavaScript,
        Language::Php,
        Language::Ruby,
    ];

    /// Short identifier used in config sections and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Go => "go",
            Language::Java => "java",
            Language::JavaScript => "js",
            Language::Php => "php",
            Language::Ruby => "ruby",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Php => "PHP",
            Language::Ruby => "Ruby",
        }
    }

    /// Default source file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Go => "go",
            Language::Java => "java",
            Language::JavaScript => "js",
            Language::Php => "php",
            Language::Ruby => "rb",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = PorterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "go" => Ok(Language::Go),
            "java" => Ok(Language::Java),
            "js" | "javascript" => Ok(Language::JavaScript),
            "php" => Ok(Language::Php),
            "rb" | "ruby" => Ok(Language::Ruby),
            _ => Err(PorterError::InvalidInput(format!(
                "unknown language '{}' (expected one of: c, go, java, js, php, ruby)",
                s
            ))),
        }
    }
}

/// How data and logic are laid out in the emitted program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Model data inlined as literals, evaluated by a generic lookup loop.
    Attached,
    /// Model data inlined as literals, evaluated by generated branch code.
    Combined,
    /// Model data in a sibling JSON file read at program start.
    Exported,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Attached, Mode::Combined, Mode::Exported];

    pub fn key(&self) -> &'static str {
        match self {
            Mode::Attached => "attached",
            Mode::Combined => "combined",
            Mode::Exported => "exported",
        }
    }

    fn symbol(&self) -> char {
        match self {
            Mode::Attached => 'ᴀ',
            Mode::Combined => 'ᴄ',
            Mode::Exported => 'ᴇ',
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mode {
    type Err = PorterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "attached" => Ok(Mode::Attached),
            "combined" => Ok(Mode::Combined),
            "exported" => Ok(Mode::Exported),
            _ => Err(PorterError::InvalidInput(format!(
                "unknown packaging mode '{}' (expected attached, combined or exported)",
                s
            ))),
        }
    }
}

/// Which entry point the generated program prints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    #[default]
    Predict,
    PredictProba,
}

impl Method {
    pub fn key(&self) -> &'static str {
        match self {
            Method::Predict => "predict",
            Method::PredictProba => "predict_proba",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Method {
    type Err = PorterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "predict" => Ok(Method::Predict),
            "predict_proba" => Ok(Method::PredictProba),
            _ => Err(PorterError::InvalidInput(format!(
                "unknown method '{}' (expected predict or predict_proba)",
                s
            ))),
        }
    }
}

// ─── Registry ──────────────────────────────────────────────────────

struct Entry {
    kind: ModelKind,
    languages: &'static [Language],
    modes: &'static [Mode],
    methods: &'static [Method],
}

const ALL_MODES: &[Mode] = &[Mode::Attached, Mode::Combined, Mode::Exported];
const BOTH_METHODS: &[Method] = &[Method::Predict, Method::PredictProba];

const REGISTRY: &[Entry] = &[
    Entry {
        kind: ModelKind::DecisionTreeClassifier,
        languages: &[Language::C],
        modes: &[Mode::Attached, Mode::Combined],
        methods: BOTH_METHODS,
    },
    Entry {
        kind: ModelKind::DecisionTreeClassifier,
        languages: &[
            Language::Go,
            Language::Java,
            Language::JavaScript,
            Language::Php,
            Language::Ruby,
        ],
        modes: ALL_MODES,
        methods: BOTH_METHODS,
    },
    Entry {
        kind: ModelKind::MlpClassifier,
        languages: &[Language::Java, Language::JavaScript],
        modes: &[Mode::Attached, Mode::Exported],
        methods: BOTH_METHODS,
    },
    Entry {
        kind: ModelKind::MlpRegressor,
        languages: &[Language::JavaScript],
        modes: &[Mode::Attached, Mode::Exported],
        methods: &[Method::Predict],
    },
];

/// Whether the generator can emit `kind` as `language` in `mode` with
/// `method` as the printed entry point.
pub fn supports(kind: ModelKind, language: Language, mode: Mode, method: Method) -> bool {
    REGISTRY.iter().any(|e| {
        e.kind == kind
            && e.languages.contains(&language)
            && e.modes.contains(&mode)
            && e.methods.contains(&method)
    })
}

/// Like [`supports`], but names the first unsupported part of the request.
pub fn check(kind: ModelKind, language: Language, mode: Mode, method: Method) -> Result<()> {
    let entries: Vec<&Entry> = REGISTRY
        .iter()
        .filter(|e| e.kind == kind && e.languages.contains(&language))
        .collect();
    let unsupported = |what: String| PorterError::NotSupported {
        kind: kind.name().to_string(),
        what,
    };
    if entries.is_empty() {
        return Err(unsupported(format!("the language {}", language)));
    }
    if !entries.iter().any(|e| e.modes.contains(&mode)) {
        return Err(unsupported(format!(
            "the packaging mode '{}' in {}",
            mode, language
        )));
    }
    if !supports(kind, language, mode, method) {
        return Err(unsupported(format!(
            "the method '{}' in {} ({})",
            method, language, mode
        )));
    }
    Ok(())
}

/// Languages the generator can emit `kind` in.
pub fn languages(kind: ModelKind) -> Vec<Language> {
    Language::ALL
        .into_iter()
        .filter(|&l| {
            REGISTRY
                .iter()
                .any(|e| e.kind == kind && e.languages.contains(&l))
        })
        .collect()
}

/// Language and packaging mode used when the caller names neither.
pub fn default_target(kind: ModelKind) -> (Language, Mode) {
    match kind {
        ModelKind::DecisionTreeClassifier => (Language::Java, Mode::Attached),
        ModelKind::MlpClassifier | ModelKind::MlpRegressor => {
            (Language::JavaScript, Mode::Attached)
        }
    }
}

// ─── Report ────────────────────────────────────────────────────────

fn cell(kind: ModelKind, language: Language) -> String {
    Mode::ALL
        .iter()
        .map(|&mode| {
            if supports(kind, language, mode, Method::PredictProba) {
                format!("✓{}ᴾ", mode.symbol())
            } else if supports(kind, language, mode, Method::Predict) {
                format!("✓{} ", mode.symbol())
            } else {
                "···".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len);
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

/// Render the registry as a table: one row per model kind, one column per
/// language, and per cell one symbol per packaging mode (`ᴀ`, `ᴄ`, `ᴇ`),
/// marked `ᴾ` when probabilities are available and `···` when the mode is
/// not supported.
pub fn report(language: Option<Language>) -> String {
    let languages: Vec<Language> = match language {
        Some(l) => vec![l],
        None => Language::ALL.to_vec(),
    };
    let mut kinds = ModelKind::ALL.to_vec();
    kinds.sort_by_key(|k| k.name());

    let mut header = vec!["Estimator".to_string()];
    header.extend(languages.iter().map(|l| l.label().to_string()));
    let mut rows = Vec::new();
    for kind in &kinds {
        let mut row = vec![kind.name().to_string()];
        row.extend(languages.iter().map(|&l| cell(*kind, l)));
        rows.push(row);
    }

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(rows.iter())
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |row: &[String]| -> String {
        row.iter()
            .enumerate()
            .map(|(col, text)| {
                if col == 0 {
                    format!(" {:<w$} ", text, w = widths[col])
                } else {
                    format!(" {} ", center(text, widths[col]))
                }
            })
            .collect::<Vec<_>>()
            .join("|")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render(&header));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+"),
    );
    out.push('\n');
    for row in &rows {
        out.push_str(&render(row));
        out.push('\n');
    }
    out
}
