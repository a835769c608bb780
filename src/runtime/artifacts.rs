use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Files and directories created during one harness run.
///
/// Removal is best effort: a file that is already gone or cannot be
/// deleted is logged and skipped.
#[derive(Debug, Default)]
pub struct Artifacts {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl Artifacts {
    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.files.contains(&path) {
            self.files.push(path);
        }
    }

    /// Track a directory the run created. It is removed with everything
    /// left inside it.
    pub fn track_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Track the class files `javac` leaves for `class_name`, including
    /// nested classes (`Name$Inner.class`).
    pub fn track_class_files(&mut self, dir: &Path, class_name: &str) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        let exact = format!("{}.class", class_name);
        let nested = format!("{}$", class_name);
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == exact || (name.starts_with(&nested) && name.ends_with(".class")) {
                self.track(entry.path());
            }
        }
    }

    pub fn cleanup(&mut self) {
        for file in self.files.drain(..) {
            match std::fs::remove_file(&file) {
                Ok(()) => debug!(path = %file.display(), "removed"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %file.display(), error = %e, "cannot remove"),
            }
        }
        for dir in self.dirs.drain(..).rev() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %dir.display(), error = %e, "cannot remove directory");
                }
            }
        }
    }
}
