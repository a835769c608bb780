//! Harness options and toolchain overrides.
//!
//! Everything has a built-in default. A `porter.toml` found in the working
//! directory or one of its ancestors (or named explicitly) overrides
//! individual values:
//!
//! ```toml
//! [harness]
//! workers = 4
//! cleanup = true
//! retry_attempts = 10
//!
//! [languages.c]
//! compile = "clang {{src_path}} -std=c99 -lm -o {{dest_path}}"
//! dependencies = ["clang"]
//! ```

pub mod language;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub use language::{LanguageOverride, LanguageSpec, RuntimeLibrary};

use crate::error::{PorterError, Result};
use crate::support::Language;

/// Name of the configuration file searched for.
pub const CONFIG_FILE: &str = "porter.toml";

// ─── Harness ───────────────────────────────────────────────────────

/// How generated programs are compiled and run.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessOptions {
    /// Worker threads for the per-row runs. Defaults to the number of
    /// logical cores; 1 runs every row on the calling thread.
    pub workers: Option<usize>,
    /// Remove generated files and the working directory afterwards.
    pub cleanup: bool,
    /// Verify the toolchain binaries before writing anything.
    pub check_dependencies: bool,
    /// Shell used to run compile and execute commands.
    pub shell: PathBuf,
    /// Working directory. A fresh one under the system temp dir if unset.
    pub directory: Option<PathBuf>,
    /// How often to check that the files a run depends on exist.
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
    /// Total attempts per row before a run counts as failed.
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    /// Fail the batch on unparsable program output instead of leaving the
    /// row empty.
    pub strict_output: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions {
            workers: None,
            cleanup: true,
            check_dependencies: true,
            shell: PathBuf::from("/bin/sh"),
            directory: None,
            poll_attempts: 10,
            poll_interval_ms: 100,
            retry_attempts: 10,
            retry_delay_ms: 100,
            strict_output: false,
        }
    }
}

impl HarnessOptions {
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let err = |reason: &str| PorterError::Config {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };
        if self.workers == Some(0) {
            return Err(err("harness.workers must be at least 1"));
        }
        if self.retry_attempts == 0 {
            return Err(err("harness.retry_attempts must be at least 1"));
        }
        Ok(())
    }
}

// ─── File ──────────────────────────────────────────────────────────

/// Parsed `porter.toml`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PorterConfig {
    pub harness: HarnessOptions,
    /// Toolchain overrides keyed by language key (`c`, `go`, `java`, `js`,
    /// `php`, `ruby`).
    pub languages: BTreeMap<String, LanguageOverride>,
}

impl PorterConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PorterError::io("cannot read config", path, e))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: PorterConfig = toml::from_str(content).map_err(|e| PorterError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.harness.validate(path)?;
        for key in config.languages.keys() {
            key.parse::<Language>().map_err(|_| PorterError::Config {
                path: path.to_path_buf(),
                reason: format!("unknown language section [languages.{}]", key),
            })?;
        }
        Ok(config)
    }

    /// Search `start_dir` and its ancestors for `porter.toml`.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Load the nearest `porter.toml` above `start_dir`, or the defaults
    /// when there is none.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        match Self::find(start_dir) {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Toolchain for `language`: the built-in spec with this file's
    /// overrides applied.
    pub fn language(&self, language: Language) -> LanguageSpec {
        let mut spec = LanguageSpec::builtin(language);
        for (key, overrides) in &self.languages {
            if key.parse::<Language>().ok() == Some(language) {
                spec.apply(overrides);
            }
        }
        spec
    }
}
