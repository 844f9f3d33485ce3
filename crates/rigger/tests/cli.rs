//! Runs commands against projects laid out in temporary directories.

use std::fs;
use std::path::Path;

use clap::Parser;
use rigger::{execute, Cli};
use serde_json::Value;
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let target = root.join(path);
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(target, content).unwrap();
}

const INDEX_CSS: &str = "body { margin: 0; color: #222; }\n";

fn react_site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "package.json", r#"{"dependencies": {"react": "^18.2.0"}}"#);
    write(root, "src/main.tsx", "import './index.css';\n");
    write(root, "src/index.css", INDEX_CSS);
    write(root, "src/other.css", ".note { padding: 4px; }\n");
    write(root, "node_modules/lib/reset.css", "a { color: red; }\n");
    write(
        root,
        "tailwind.config.js",
        "module.exports = { theme: { colors: { brand: '#0af' } } }\n",
    );
    dir
}

fn run(root: &Path, args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["rigger", "--root", root.to_str().unwrap()];
    argv.extend_from_slice(args);
    execute(&Cli::try_parse_from(argv)?)
}

fn run_json(root: &Path, args: &[&str]) -> Value {
    let mut args = args.to_vec();
    args.extend_from_slice(&["--output", "json"]);
    serde_json::from_str(&run(root, &args).unwrap()).unwrap()
}

fn param<'a>(scan: &'a Value, label: &str) -> &'a Value {
    scan["params"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["label"] == label)
        .unwrap()
}

#[test]
fn scan_reports_project_and_parameters() {
    let site = react_site();
    let scan = run_json(site.path(), &["scan"]);

    assert_eq!(scan["projectType"], "react");
    assert_eq!(scan["cssFile"], "src/index.css");
    assert_eq!(scan["cssCandidates"].as_array().unwrap().len(), 2);
    assert_eq!(scan["params"].as_array().unwrap().len(), 3);
    assert_eq!(param(&scan, "brand")["origin"], "tailwind");
    assert_eq!(param(&scan, "margin")["source"]["file"], "src/index.css");
}

#[test]
fn scan_text_output() {
    let site = react_site();
    let text = run(site.path(), &["scan", "--output", "text"]).unwrap();
    assert!(text.starts_with("Project: react\nStylesheet: src/index.css\n"));
    assert!(text.contains("\nColour\n"));
    assert!(text.contains("\nDiagnostics\n  Detected react dependency in package.json"));
    assert!(!text.contains('\u{1b}'));
}

#[test]
fn candidates_skip_excluded_directories() {
    let site = react_site();
    let text = run(site.path(), &["candidates", "-o", "text"]).unwrap();
    let first = text.lines().next().unwrap();
    assert!(first.contains("src/index.css"));
    assert!(!text.contains("node_modules"));
}

#[test]
fn css_and_tokens_commands() {
    let site = react_site();
    let css = run_json(site.path(), &["css", "src/other.css"]);
    assert_eq!(css[0]["label"], "padding");
    assert_eq!(css[0]["source"]["file"], "src/other.css");

    let absolute = site.path().join("src/other.css");
    let again = run_json(site.path(), &["css", absolute.to_str().unwrap()]);
    assert_eq!(again[0]["id"], css[0]["id"]);

    let tokens = run_json(site.path(), &["tokens", "tailwind.config.js"]);
    assert_eq!(tokens[0]["id"], "rig.tw.colors-brand");
    let none = run_json(site.path(), &["tokens", "tailwind.config.js", "--limit", "0"]);
    assert_eq!(none, Value::Array(Vec::new()));

    let err = run(site.path(), &["css", "missing.css"]).unwrap_err();
    assert!(err.to_string().starts_with("failed to read"));
}

#[test]
fn plan_prints_a_diff_without_writing() {
    let site = react_site();
    let text = run(site.path(), &["plan", "-o", "text"]).unwrap();

    assert!(text.starts_with("--- a/src/index.css\n+++ b/src/index.css\n"));
    assert!(text.contains("\n+/* rigger:start */"));
    assert!(text.contains(&format!("\n-{}", INDEX_CSS.trim_end())));
    assert!(text.ends_with("3 parameters, 9 insertions(+), 1 deletions(-)"));
    assert_eq!(fs::read_to_string(site.path().join("src/index.css")).unwrap(), INDEX_CSS);
}

#[test]
fn apply_writes_stylesheet_and_config() {
    let site = react_site();
    let scan = run_json(site.path(), &["scan"]);
    let margin = param(&scan, "margin");
    let overrides = site.path().join("overrides.json");
    fs::write(&overrides, format!(r#"{{"{}": 8}}"#, margin["id"].as_str().unwrap())).unwrap();

    let report = run_json(site.path(), &["apply", "--overrides", overrides.to_str().unwrap()]);
    assert_eq!(report["params"], 3);
    assert_eq!(report["files"].as_array().unwrap().len(), 2);

    let css = fs::read_to_string(site.path().join("src/index.css")).unwrap();
    let var = margin["cssVar"].as_str().unwrap();
    assert!(css.starts_with("/* rigger:start */\n:root {\n"));
    assert!(css.contains(&format!("  {}: 8;", var)));
    assert!(css.contains(&format!("body {{ margin: var({});", var)));

    let config: Value =
        serde_json::from_str(&fs::read_to_string(site.path().join("rig.config.json")).unwrap())
            .unwrap();
    assert_eq!(config["version"], "0.1");
    assert_eq!(config["files"][0]["file"], "src/index.css");
    assert_eq!(config["params"].as_array().unwrap().len(), 3);
}

#[test]
fn applying_twice_keeps_every_variable_declared() {
    let site = react_site();
    let scan = run_json(site.path(), &["scan"]);
    let margin = param(&scan, "margin");
    let color = param(&scan, "color");
    run(site.path(), &["apply"]).unwrap();
    let first = fs::read_to_string(site.path().join("src/index.css")).unwrap();

    let overrides = site.path().join("overrides.json");
    fs::write(&overrides, format!(r#"{{"{}": 8}}"#, margin["id"].as_str().unwrap())).unwrap();
    run(site.path(), &["apply", "--overrides", overrides.to_str().unwrap()]).unwrap();
    let second = fs::read_to_string(site.path().join("src/index.css")).unwrap();

    let margin_var = margin["cssVar"].as_str().unwrap();
    let color_var = color["cssVar"].as_str().unwrap();
    assert!(first.contains(&format!("  {}: 0;", margin_var)));
    assert!(second.contains(&format!("  {}: 8;", margin_var)));
    assert!(second.contains(&format!("  {}: #222;", color_var)));
    assert!(second.contains("  --rig-tw-colors-brand: #0af;"));
    assert_eq!(second.matches("/* rigger:start */").count(), 1);

    let body = second.split("/* rigger:end */").nth(1).unwrap();
    for reference in body.split("var(").skip(1) {
        let name = &reference[..reference.find(')').unwrap()];
        assert!(
            second.contains(&format!("  {}: ", name)),
            "{} is referenced but not declared",
            name
        );
    }
}

#[test]
fn snapshot_honours_configuration() {
    let site = react_site();
    write(
        site.path(),
        "rigger.yaml",
        "stylesheet: src/other.css\nsnapshot_file: out/snap.json\n",
    );

    let report = run_json(site.path(), &["snapshot"]);
    assert_eq!(report["params"], 2);

    let snapshot: Value =
        serde_json::from_str(&fs::read_to_string(site.path().join("out/snap.json")).unwrap())
            .unwrap();
    assert_eq!(snapshot["files"][0]["file"], "src/other.css");
    assert_eq!(snapshot["overrides"], Value::Object(Default::default()));
    let values: Vec<&Value> = snapshot["params"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| &p["value"])
        .collect();
    assert!(values.contains(&&Value::from(4)));
    assert!(values.contains(&&Value::from("#0af")));
}

#[test]
fn plan_without_stylesheet_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "tailwind.config.js", "colors: { a: '#fff' }");
    let err = run(dir.path(), &["plan"]).unwrap_err();
    assert!(err.to_string().starts_with("no stylesheet to rewrite"));
}

#[test]
fn bad_root_and_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = run(&missing, &["scan"]).unwrap_err();
    assert!(err.to_string().contains("is not a directory"));

    write(dir.path(), "rigger.yaml", "token_limit: many\n");
    let err = run(dir.path(), &["scan"]).unwrap_err();
    assert!(err.to_string().starts_with("invalid configuration in"));
}
