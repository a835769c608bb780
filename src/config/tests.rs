use super::*;

#[test]
fn test_defaults() {
    let config = PorterConfig::default();
    let harness = &config.harness;
    assert!(harness.cleanup);
    assert!(harness.check_dependencies);
    assert!(!harness.strict_output);
    assert_eq!(harness.shell, PathBuf::from("/bin/sh"));
    assert_eq!(harness.poll_attempts, 10);
    assert_eq!(harness.poll_interval(), Duration::from_millis(100));
    assert_eq!(harness.retry_attempts, 10);
    assert_eq!(harness.retry_delay(), Duration::from_millis(100));
    assert!(harness.workers() >= 1);
}

#[test]
fn test_builtin_languages() {
    let c = LanguageSpec::builtin(Language::C);
    assert_eq!(c.extension, "c");
    assert_eq!(
        c.compile.as_deref(),
        Some("gcc {{src_path}} -std=c99 -lm -o {{dest_path}}")
    );
    assert_eq!(c.dependencies, vec!["gcc"]);
    assert!(c.runtime_library.is_none());

    let java = LanguageSpec::builtin(Language::Java);
    assert_eq!(java.dependencies, vec!["java", "javac"]);
    let gson = java.runtime_library.unwrap();
    assert_eq!(gson.file_name, "gson.jar");
    assert_eq!(gson.path_env, "PORTER_GSON_PATH");

    let ruby = LanguageSpec::builtin(Language::Ruby);
    assert!(!ruby.is_compiled());
    assert_eq!(ruby.extension, "rb");
    assert_eq!(ruby.execute, "ruby {{src_path}}");
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    std::fs::write(
        &path,
        r#"
[harness]
workers = 3
cleanup = false
retry_attempts = 2
retry_delay_ms = 0
strict_output = true

[languages.c]
compile = "clang {{src_path}} -lm -o {{dest_path}}"
dependencies = ["clang"]

[languages.javascript]
execute = "bun {{src_path}}"
extension = ".mjs"
"#,
    )
    .unwrap();

    let config = PorterConfig::load(&path).unwrap();
    assert_eq!(config.harness.workers(), 3);
    assert!(!config.harness.cleanup);
    assert_eq!(config.harness.retry_attempts, 2);
    assert_eq!(config.harness.retry_delay(), Duration::ZERO);
    assert!(config.harness.strict_output);
    // Untouched values keep their defaults.
    assert_eq!(config.harness.poll_attempts, 10);

    let c = config.language(Language::C);
    assert_eq!(c.compile.as_deref(), Some("clang {{src_path}} -lm -o {{dest_path}}"));
    assert_eq!(c.dependencies, vec!["clang"]);
    assert_eq!(c.execute, "{{dest_path}}");

    let js = config.language(Language::JavaScript);
    assert_eq!(js.execute, "bun {{src_path}}");
    assert_eq!(js.extension, "mjs");
    assert_eq!(js.dependencies, vec!["node"]);
}

#[test]
fn test_empty_compile_makes_language_interpreted() {
    let config = PorterConfig::parse(
        "[languages.go]\ncompile = \"\"\nexecute = \"go run {{src_path}}\"\n",
        Path::new("porter.toml"),
    )
    .unwrap();
    let go = config.language(Language::Go);
    assert!(!go.is_compiled());
    assert_eq!(go.execute, "go run {{src_path}}");
}

#[test]
fn test_rejects_unknown_keys() {
    let err = PorterConfig::parse("[harness]\nthreads = 2\n", Path::new("porter.toml")).unwrap_err();
    assert!(matches!(err, PorterError::Config { .. }));
    assert!(err.to_string().contains("porter.toml"));
}

#[test]
fn test_rejects_unknown_language() {
    let err = PorterConfig::parse("[languages.cobol]\nexecute = \"x\"\n", Path::new("p.toml"))
        .unwrap_err();
    assert!(err.to_string().contains("[languages.cobol]"));
}

#[test]
fn test_rejects_zero_workers() {
    let err = PorterConfig::parse("[harness]\nworkers = 0\n", Path::new("p.toml")).unwrap_err();
    assert!(err.to_string().contains("harness.workers"));
}

#[test]
fn test_find_in_ancestors() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE), "[harness]\nworkers = 1\n").unwrap();

    let found = PorterConfig::find(&nested).unwrap();
    assert_eq!(found, dir.path().join(CONFIG_FILE));
    let config = PorterConfig::discover(&nested).unwrap();
    assert_eq!(config.harness.workers(), 1);
}

#[test]
fn test_discover_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    // The temp dir's ancestors are not expected to carry a porter.toml.
    if PorterConfig::find(dir.path()).is_none() {
        assert_eq!(PorterConfig::discover(dir.path()).unwrap(), PorterConfig::default());
    }
}
