pub mod port;
pub mod predict;
pub mod score;
pub mod show;

use std::path::{Path, PathBuf};
use std::process;

use clap::Args;
use porter::{Converter, Estimator, Language, Method, Mode, PorterConfig};

/// Target selection shared by every command that generates code.
#[derive(Args)]
pub struct TargetArgs {
    /// Target language (c, go, java, js, php, ruby); default depends on the model
    #[arg(short, long)]
    pub language: Option<Language>,
    /// Packaging mode (attached, combined, exported)
    #[arg(short, long)]
    pub mode: Option<Mode>,
    /// Printed method (predict, predict_proba)
    #[arg(long)]
    pub method: Option<Method>,
    /// Class name (default: the model kind)
    #[arg(long)]
    pub class_name: Option<String>,
    /// Format numbers with this many decimal places
    #[arg(long, value_name = "N")]
    pub precision: Option<usize>,
}

/// Print the error and exit with status 1.
pub fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", err);
    process::exit(1);
}

/// The config named on the command line, or the nearest `porter.toml`.
pub fn load_config(path: Option<&Path>) -> PorterConfig {
    let result = match path {
        Some(path) => PorterConfig::load(path),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            PorterConfig::discover(&cwd)
        }
    };
    result.unwrap_or_else(|e| fail(e))
}

/// Load a descriptor and apply the target flags.
pub fn load_estimator(model: &Path, target: TargetArgs, config: PorterConfig) -> Estimator {
    let mut estimator = Estimator::load(model)
        .unwrap_or_else(|e| fail(e))
        .with_config(config);
    if let Some(language) = target.language {
        estimator = estimator.with_language(language);
    }
    if let Some(mode) = target.mode {
        estimator = estimator.with_mode(mode);
    }
    if let Some(method) = target.method {
        estimator = estimator.with_method(method);
    }
    if let Some(class_name) = target.class_name {
        estimator = estimator.with_class_name(class_name);
    }
    if let Some(precision) = target.precision {
        estimator = estimator.with_converter(Converter::fixed(precision));
    }
    estimator
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path.display(), e)));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| fail(format!("cannot parse '{}': {}", path.display(), e)))
}

/// A JSON array of feature arrays.
pub fn read_rows(path: &Path) -> Vec<Vec<f64>> {
    read_json(path)
}

/// A JSON array of class labels.
pub fn read_labels(path: &Path) -> Vec<f64> {
    read_json(path)
}
