use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::artifacts::Artifacts;
use super::shell::{quote, quote_path, Shell};
use crate::config::{LanguageSpec, RuntimeLibrary};
use crate::error::{PorterError, Result};
use crate::support::Language;
use crate::template;

// ─── Workspace ─────────────────────────────────────────────────────

/// Where a ported program lives on disk, and what its commands need.
#[derive(Clone, Debug)]
pub(crate) struct Workspace {
    pub dir: PathBuf,
    pub class_name: String,
    pub source: PathBuf,
    pub data: Option<PathBuf>,
    /// Class path entries, reused by the execute command.
    pub class_paths: Vec<PathBuf>,
}

impl Workspace {
    /// Compiled binary: the source path without its extension.
    pub fn dest(&self) -> PathBuf {
        self.source.with_extension("")
    }

    /// Paths the execute command reads.
    pub fn runnable(&self, spec: &LanguageSpec) -> Vec<PathBuf> {
        let mut paths = vec![match (spec.is_compiled(), spec.language) {
            (false, _) => self.source.clone(),
            (true, Language::Java) => self.dir.join(format!("{}.class", self.class_name)),
            (true, _) => self.dest(),
        }];
        paths.extend(self.data.clone());
        paths
    }

    fn class_path(&self) -> Result<String> {
        if self.class_paths.is_empty() {
            return Ok(String::new());
        }
        let joined = std::env::join_paths(&self.class_paths).map_err(|e| {
            PorterError::InvalidInput(format!("cannot build class path: {}", e))
        })?;
        Ok(format!("-cp {}", quote(&joined.to_string_lossy())))
    }

    /// Render a compile or execute command template.
    pub fn render(&self, command: &str) -> Result<String> {
        let src_path = quote_path(&self.source);
        let dest_path = quote_path(&self.dest());
        let dest_dir = quote_path(&self.dir);
        let class_path = self.class_path()?;
        let bindings = [
            ("src_path", src_path.as_str()),
            ("dest_path", dest_path.as_str()),
            ("dest_dir", dest_dir.as_str()),
            ("class_name", self.class_name.as_str()),
            ("class_path", class_path.as_str()),
        ];
        template::try_fill(command, &bindings).map_err(|slot| {
            PorterError::InvalidInput(format!(
                "command `{}` uses the unknown slot `{}`",
                command, slot
            ))
        })
    }
}

// ─── Runtime Library ───────────────────────────────────────────────

/// Locate the runtime library, downloading it into `dir` when no local
/// copy is configured.
pub(crate) fn resolve_library(
    library: &RuntimeLibrary,
    dir: &Path,
    artifacts: &mut Artifacts,
) -> Result<PathBuf> {
    if let Ok(path) = std::env::var(&library.path_env) {
        if !path.is_empty() {
            debug!(path = %path, "using runtime library from environment");
            return Ok(PathBuf::from(path));
        }
    }
    let dest = dir.join(&library.file_name);
    if dest.exists() {
        return Ok(dest);
    }
    let url = std::env::var(&library.url_env)
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| library.url.clone());
    download(&url, &dest)?;
    artifacts.track(&dest);
    Ok(dest)
}

fn download(url: &str, dest: &Path) -> Result<()> {
    info!(url, dest = %dest.display(), "downloading runtime library");
    let err = |reason: String| PorterError::Download {
        url: url.to_string(),
        reason,
    };
    let mut response = ureq::get(url).call().map_err(|e| err(e.to_string()))?;
    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| err(e.to_string()))?;
    std::fs::write(dest, bytes).map_err(|e| PorterError::io("cannot write", dest, e))
}

// ─── Compile ───────────────────────────────────────────────────────

/// Run the compile command once. Produced binaries and class files are
/// tracked for cleanup even when compilation fails.
pub(crate) fn compile(
    shell: &dyn Shell,
    spec: &LanguageSpec,
    workspace: &Workspace,
    artifacts: &mut Artifacts,
) -> Result<()> {
    let Some(template) = &spec.compile else {
        return Ok(());
    };
    let command = workspace.render(template)?;
    debug!(command = %command, "compiling");
    let result = shell.run(&command);

    match spec.language {
        Language::Java => artifacts.track_class_files(&workspace.dir, &workspace.class_name),
        _ => {
            let dest = workspace.dest();
            if dest != workspace.source {
                artifacts.track(dest);
            }
        }
    }

    let output = result.map_err(|e| PorterError::CompilationFailed {
        command: command.clone(),
        output: e.to_string(),
    })?;
    if output.success {
        return Ok(());
    }
    Err(classify(command, output.combined()))
}

/// Map compiler output to the most specific compilation error.
pub(crate) fn classify(command: String, output: String) -> PorterError {
    if output.contains("code too large") {
        PorterError::CodeTooLarge { command, output }
    } else if output.contains("too many constants") {
        PorterError::TooManyConstants { command, output }
    } else {
        PorterError::CompilationFailed { command, output }
    }
}
