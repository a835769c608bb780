use serde::Deserialize;

use crate::support::Language;

/// Environment variable naming an existing Gson jar.
pub const GSON_PATH_ENV: &str = "PORTER_GSON_PATH";
/// Environment variable overriding the Gson download URL.
pub const GSON_URL_ENV: &str = "PORTER_GSON_URL";

const GSON_URL: &str = "https://repo1.maven.org/maven2/com/google/code/gson/gson/2.10.1/gson-2.10.1.jar";

/// A support library an EXPORTED program needs on its class path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeLibrary {
    /// File name inside the working directory.
    pub file_name: String,
    pub url: String,
    /// Environment variable that points at an existing copy.
    pub path_env: String,
    /// Environment variable that overrides `url`.
    pub url_env: String,
}

impl RuntimeLibrary {
    fn gson() -> Self {
        RuntimeLibrary {
            file_name: "gson.jar".to_string(),
            url: GSON_URL.to_string(),
            path_env: GSON_PATH_ENV.to_string(),
            url_env: GSON_URL_ENV.to_string(),
        }
    }
}

/// Toolchain description of a target language.
///
/// Command templates use the same `{{slot}}` syntax as the code templates.
/// Available slots: `src_path`, `dest_path`, `dest_dir`, `class_name` and
/// `class_path` (a ready `-cp` argument, empty when there is nothing to
/// add). Paths are shell-quoted before substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSpec {
    pub language: Language,
    /// Source file extension, without the dot.
    pub extension: String,
    /// Absent for interpreted languages.
    pub compile: Option<String>,
    pub execute: String,
    /// Binaries that must be on `PATH` before anything is written.
    pub dependencies: Vec<String>,
    /// Needed by EXPORTED programs only.
    pub runtime_library: Option<RuntimeLibrary>,
}

impl LanguageSpec {
    /// Built-in toolchain for a language.
    pub fn builtin(language: Language) -> Self {
        let (compile, execute, dependencies): (Option<&str>, &str, &[&str]) = match language {
            Language::C => (
                Some("gcc {{src_path}} -std=c99 -lm -o {{dest_path}}"),
                "{{dest_path}}",
                &["gcc"],
            ),
            Language::Go => (
                Some("go build -o {{dest_path}} {{src_path}}"),
                "{{dest_path}}",
                &["go"],
            ),
            Language::Java => (
                Some("javac {{class_path}} -d {{dest_dir}} {{src_path}}"),
                "java {{class_path}} {{class_name}}",
                &["java", "javac"],
            ),
            Language::JavaScript => (None, "node {{src_path}}", &["node"]),
            Language::Php => (None, "php {{src_path}}", &["php"]),
            Language::Ruby => (None, "ruby {{src_path}}", &["ruby"]),
        };
        LanguageSpec {
            language,
            extension: language.extension().to_string(),
            compile: compile.map(str::to_string),
            execute: execute.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            runtime_library: match language {
                Language::Java => Some(RuntimeLibrary::gson()),
                _ => None,
            },
        }
    }

    pub fn is_compiled(&self) -> bool {
        self.compile.is_some()
    }

    pub(crate) fn apply(&mut self, overrides: &LanguageOverride) {
        if let Some(compile) = &overrides.compile {
            self.compile = if compile.trim().is_empty() {
                None
            } else {
                Some(compile.clone())
            };
        }
        if let Some(execute) = &overrides.execute {
            self.execute = execute.clone();
        }
        if let Some(dependencies) = &overrides.dependencies {
            self.dependencies = dependencies.clone();
        }
        if let Some(extension) = &overrides.extension {
            self.extension = extension.trim_start_matches('.').to_string();
        }
    }
}

/// A `[languages.<key>]` section. Every field replaces the built-in value;
/// an empty `compile` turns the language into an interpreted one.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LanguageOverride {
    pub compile: Option<String>,
    pub execute: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub extension: Option<String>,
}
