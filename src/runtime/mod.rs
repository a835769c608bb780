//! Execution harness for ported programs.
//!
//! A batch runs in a few fixed steps: check that the toolchain binaries
//! exist, write the program into a working directory, compile it once,
//! wait for the files the run depends on, then spawn the program once per
//! input row across a worker pool. Every file the harness creates is
//! tracked and removed afterwards unless cleanup is disabled.
//!
//! Processes are started through the [`Shell`] trait, so tests can stand
//! in for a real toolchain.

mod artifacts;
mod compile;
pub mod shell;


use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use artifacts::Artifacts;
use compile::Workspace;
pub use shell::{CommandOutput, Shell, SystemShell};

use crate::codegen::Ported;
use crate::config::{HarnessOptions, LanguageSpec};
use crate::error::{PorterError, Result};
use crate::support::Mode;

// ─── Types ─────────────────────────────────────────────────────────

/// One line of program output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predict: f64,
    #[serde(
        rename = "predictProba",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub predict_proba: Option<Vec<f64>>,
}

/// How often a failing row command is attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least 1.
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_options(options: &HarnessOptions) -> Self {
        RetryPolicy {
            attempts: options.retry_attempts.max(1),
            delay: options.retry_delay(),
        }
    }
}

// ─── Helpers ───────────────────────────────────────────────────────

/// Run `command` until it exits successfully or the policy is exhausted.
pub fn run_with_retry(shell: &dyn Shell, command: &str, policy: RetryPolicy) -> Result<CommandOutput> {
    let attempts = policy.attempts.max(1);
    let mut last = String::new();
    for attempt in 1..=attempts {
        match shell.run(command) {
            Ok(output) if output.success => return Ok(output),
            Ok(output) => last = output.combined(),
            Err(e) => last = format!("cannot launch: {}", e),
        }
        if attempt < attempts {
            warn!(command, attempt, "command failed, retrying");
            std::thread::sleep(policy.delay);
        }
    }
    Err(PorterError::ExecutionFailed {
        command: command.to_string(),
        attempts,
        output: last,
    })
}

/// Wait until every path exists. Returns false when the attempts run out.
pub fn wait_for(paths: &[PathBuf], attempts: u32, interval: Duration) -> bool {
    for attempt in 0..attempts {
        if paths.iter().all(|p| p.exists()) {
            return true;
        }
        if attempt + 1 < attempts {
            std::thread::sleep(interval);
        }
    }
    paths.iter().all(|p| p.exists())
}

/// Parse one program's stdout. `Ok(None)` marks a malformed line when
/// `strict` is off.
pub fn parse_prediction(command: &str, stdout: &str, strict: bool) -> Result<Option<Prediction>> {
    match serde_json::from_str::<Prediction>(stdout.trim()) {
        Ok(prediction) => Ok(Some(prediction)),
        Err(e) if strict => Err(PorterError::MalformedOutput {
            command: command.to_string(),
            output: stdout.to_string(),
            reason: e.to_string(),
        }),
        Err(e) => {
            warn!(command, output = stdout.trim(), error = %e, "malformed program output");
            Ok(None)
        }
    }
}

fn check_dependencies(spec: &LanguageSpec) -> Result<()> {
    for binary in &spec.dependencies {
        if !shell::is_available(binary) {
            return Err(PorterError::MissingDependency {
                language: spec.language.to_string(),
                binary: binary.clone(),
            });
        }
    }
    Ok(())
}

fn fresh_dir() -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("porter-{}-{}-{}", std::process::id(), nanos, seq))
}

fn write_tracked(path: &Path, content: &str, artifacts: &mut Artifacts) -> Result<()> {
    artifacts.track(path);
    std::fs::write(path, content).map_err(|e| PorterError::io("cannot write", path, e))
}

// ─── Harness ───────────────────────────────────────────────────────

/// Compiles and runs ported programs.
pub struct Harness {
    options: HarnessOptions,
    shell: Box<dyn Shell>,
}

impl Harness {
    pub fn new(options: HarnessOptions) -> Self {
        let shell = SystemShell::new(options.shell.clone());
        Harness {
            options,
            shell: Box::new(shell),
        }
    }

    pub fn with_shell(options: HarnessOptions, shell: Box<dyn Shell>) -> Self {
        Harness { options, shell }
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    /// Run `ported` once per row. Output `i` belongs to row `i`; a row
    /// whose output could not be parsed is `None`.
    pub fn run(
        &self,
        ported: &Ported,
        spec: &LanguageSpec,
        rows: &[Vec<f64>],
    ) -> Result<Vec<Option<Prediction>>> {
        if self.options.check_dependencies {
            check_dependencies(spec)?;
        }
        let mut artifacts = Artifacts::default();
        let result = self.run_tracked(ported, spec, rows, &mut artifacts);
        if self.options.cleanup {
            artifacts.cleanup();
        } else if let Some(first) = artifacts.files().first() {
            info!(path = %first.display(), "keeping generated files");
        }
        result
    }

    fn run_tracked(
        &self,
        ported: &Ported,
        spec: &LanguageSpec,
        rows: &[Vec<f64>],
        artifacts: &mut Artifacts,
    ) -> Result<Vec<Option<Prediction>>> {
        let dir = self.options.directory.clone().unwrap_or_else(fresh_dir);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| PorterError::io("cannot create directory", &dir, e))?;
            artifacts.track_dir(&dir);
        }

        let source = dir.join(ported.source_file_name());
        write_tracked(&source, &ported.source, artifacts)?;
        let data = match (&ported.data, ported.data_file_name()) {
            (Some(text), Some(name)) => {
                let path = dir.join(name);
                write_tracked(&path, text, artifacts)?;
                Some(path)
            }
            _ => None,
        };

        let mut workspace = Workspace {
            dir: dir.clone(),
            class_name: ported.class_name.clone(),
            source,
            data,
            class_paths: Vec::new(),
        };
        if spec.is_compiled() {
            workspace.class_paths.push(dir.clone());
            if let (Mode::Exported, Some(library)) = (ported.mode, &spec.runtime_library) {
                let jar = compile::resolve_library(library, &dir, artifacts)?;
                workspace.class_paths.push(jar);
            }
            compile::compile(self.shell.as_ref(), spec, &workspace, artifacts)?;
        }

        let needed = workspace.runnable(spec);
        if !wait_for(&needed, self.options.poll_attempts, self.options.poll_interval()) {
            debug!(paths = ?needed, "files still missing after polling");
        }

        let mut command = workspace.render(&spec.execute)?;
        if let Some(data) = &workspace.data {
            command.push(' ');
            command.push_str(&shell::quote_path(data));
        }
        info!(
            language = %spec.language,
            rows = rows.len(),
            workers = self.options.workers(),
            "running ported model"
        );
        self.run_rows(&command, rows)
    }

    fn run_rows(&self, command: &str, rows: &[Vec<f64>]) -> Result<Vec<Option<Prediction>>> {
        let task = |(index, row): (usize, &Vec<f64>)| (index, self.run_row(command, row));
        let workers = self.options.workers().min(rows.len().max(1));
        let outcomes: Vec<(usize, Result<Option<Prediction>>)> = if workers <= 1 {
            rows.iter().enumerate().map(task).collect()
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => pool.install(|| rows.par_iter().enumerate().map(task).collect()),
                Err(e) => {
                    warn!(error = %e, "cannot start worker pool, running rows sequentially");
                    rows.iter().enumerate().map(task).collect()
                }
            }
        };

        let mut slots: Vec<Option<Prediction>> = vec![None; rows.len()];
        for (index, outcome) in outcomes {
            slots[index] = outcome?;
        }
        Ok(slots)
    }

    fn run_row(&self, command: &str, row: &[f64]) -> Result<Option<Prediction>> {
        let mut full = command.to_string();
        for value in row {
            full.push_str(&format!(" {:?}", value));
        }
        debug!(command = %full, "running row");
        let output = run_with_retry(
            self.shell.as_ref(),
            &full,
            RetryPolicy::from_options(&self.options),
        )?;
        parse_prediction(&full, &output.stdout, self.options.strict_output)
    }
}
