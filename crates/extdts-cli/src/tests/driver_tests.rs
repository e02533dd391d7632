use crate::args::CliArgs;
use crate::driver::{compile, discover_schemas, load_feature_tables, parse_schemas, run};
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ALARMS: &str = r#"{
    "namespace": "alarms",
    "functions": [{"name": "clearAll", "parameters": []}]
}"#;

const STORAGE: &str = r#"[{
    "namespace": "storage",
    "properties": {"QUOTA_BYTES": {"type": "integer", "value": 102400}}
}]"#;

const API_FEATURES: &str = r#"{
    "alarms": {"channel": "stable"},
    "storage": {"channel": "beta"}
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A schema tree plus a feature directory.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "schemas/alarms.json", ALARMS);
    write(dir.path(), "schemas/nested/storage.json", STORAGE);
    write(dir.path(), "schemas/README.md", "not a schema");
    write(dir.path(), "features/_api_features.json", API_FEATURES);
    dir
}

fn args(dir: &TempDir, extra: &[&str]) -> CliArgs {
    let schemas = dir.path().join("schemas");
    let features = dir.path().join("features");
    let mut argv = vec![
        "extdts".to_string(),
        schemas.display().to_string(),
        "-f".to_string(),
        features.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(argv).unwrap()
}

#[test]
fn test_discover_schemas_recurses_and_filters() {
    let dir = fixture();
    write(dir.path(), "schemas/_api_features.json", "{}");

    let files = discover_schemas(&[dir.path().join("schemas")]).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["alarms.json", "storage.json"]);
}

#[test]
fn test_discover_schemas_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = discover_schemas(&[dir.path().join("nope")]).unwrap_err();
    assert!(err.to_string().contains("input not found"));
}

#[test]
fn test_api_feature_file_is_required() {
    let dir = TempDir::new().unwrap();
    let err = load_feature_tables(dir.path()).unwrap_err();
    assert!(err.to_string().contains("_api_features.json"));
}

#[test]
fn test_optional_feature_files_are_loaded() {
    let dir = fixture();
    write(
        dir.path(),
        "features/_permission_features.json",
        r#"{"alarms": {"channel": "stable"}}"#,
    );

    let tables = load_feature_tables(&dir.path().join("features")).unwrap();
    assert!(tables.contains("api:alarms"));
    assert!(tables.contains("permission:alarms"));
}

#[test]
fn test_parse_schemas_in_parallel_keeps_order() {
    let dir = fixture();
    let files = discover_schemas(&[dir.path().join("schemas")]).unwrap();

    let namespaces = parse_schemas(&files, Some(2)).unwrap();
    let names: Vec<&str> = namespaces.iter().map(|ns| ns.name.as_str()).collect();
    assert_eq!(names, ["alarms", "storage"]);
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = fixture();
    write(dir.path(), "schemas/broken.json", "{\"namespace\": ");
    let files = discover_schemas(&[dir.path().join("schemas")]).unwrap();

    let err = parse_schemas(&files, Some(1)).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
}

#[test]
fn test_compile_end_to_end() {
    let dir = fixture();
    let result = compile(&args(&dir, &[])).unwrap();

    assert_eq!(result.files, 2);
    assert_eq!(result.namespaces, 2);
    assert!(result.symbols.is_none());
    assert!(result.declarations.contains("export function clearAll(): void;"));
    assert!(result.declarations.contains("export const QUOTA_BYTES = 102400;"));
    assert!(result.declarations.contains("@beta"));
}

#[test]
fn test_run_writes_outputs() {
    let dir = fixture();
    let out = dir.path().join("out/index.d.ts");
    let symbols = dir.path().join("out/symbols.json");
    let out_arg = out.display().to_string();
    let symbols_arg = symbols.display().to_string();

    run(&args(&dir, &["-o", &out_arg, "--symbols", &symbols_arg, "--no-root"])).unwrap();

    let declarations = fs::read_to_string(&out).unwrap();
    assert!(declarations.starts_with("declare namespace alarms {"));

    let table: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&symbols).unwrap()).unwrap();
    assert_eq!(table["alarms.clearAll"]["kind"], "function");
    assert_eq!(table["storage.QUOTA_BYTES"]["kind"], "const");
}

#[test]
fn test_history_file_is_applied() {
    let dir = fixture();
    write(
        dir.path(),
        "history.json",
        r#"{"alarms": {"channel": "stable", "firstStableVersion": 22}}"#,
    );
    let history = dir.path().join("history.json").display().to_string();

    let result = compile(&args(&dir, &["--history", &history])).unwrap();
    assert!(result.declarations.contains("@since Chrome 22"));
}
