//! CLI contract tests.

use std::collections::BTreeMap;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;

fn cli(dir: &Path) -> Command {
    let mut cmd = match Command::cargo_bin("evergreen-matrix") {
        Ok(cmd) => cmd,
        Err(err) => panic!("binary should be built: {err}"),
    };
    cmd.current_dir(dir)
        .env_remove("EVERGREEN_MATRIX_CONFIG")
        .env_remove("EVERGREEN_MATRIX_FORMAT")
        .env_remove("EVERGREEN_MATRIX_OUTPUT")
        .env_remove("EVERGREEN_MATRIX_LOG_LEVEL")
        .env("RUST_LOG", "warn");
    cmd
}

fn temp_dir() -> tempfile::TempDir {
    match tempfile::tempdir() {
        Ok(tmp) => tmp,
        Err(err) => panic!("should create temp dir: {err}"),
    }
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = match cmd.output() {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn generate_defaults_to_yaml_on_stdout() {
    let tmp = temp_dir();
    let out = stdout_of(cli(tmp.path()).arg("generate"));
    assert!(out.starts_with("buildvariants:\n"));
    assert!(out.contains("- name: releng\n"));
    assert!(out.contains("batchtime: 1440"));
    assert!(out.contains("libmongocapi_cmake_flags:"));
}

#[test]
fn generate_json_for_selected_variants() {
    let tmp = temp_dir();
    let out = stdout_of(cli(tmp.path()).args([
        "generate", "--format", "json", "--variant", "darwin", "--variant", "gcc49",
    ]));
    let doc: Value = match serde_json::from_str(&out) {
        Ok(doc) => doc,
        Err(err) => panic!("output should be JSON: {err}\n{out}"),
    };
    let names: Vec<&str> = doc["buildvariants"]
        .as_array()
        .map(|list| list.iter().filter_map(|v| v["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["gcc49", "darwin"]);
    assert_eq!(doc["buildvariants"][1]["display_name"], "*Darwin, macOS (Apple LLVM)");
    assert!(doc["buildvariants"][0].get("batchtime").is_none());
}

#[test]
fn generate_writes_output_file() {
    let tmp = temp_dir();
    let target = tmp.path().join(".evergreen").join("variants.yml");
    let out = stdout_of(cli(tmp.path()).args(["generate", "--output"]).arg(&target));
    assert!(out.is_empty());
    let written = match std::fs::read_to_string(&target) {
        Ok(written) => written,
        Err(err) => panic!("output file should exist at {}: {err}", target.display()),
    };
    assert!(written.starts_with("buildvariants:"));
}

#[test]
fn generate_rejects_unknown_variant() {
    let tmp = temp_dir();
    let output = match cli(tmp.path())
        .args(["generate", "--variant", "solaris"])
        .output()
    {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown variant: solaris"));
}

#[test]
fn config_file_in_working_directory_is_honoured() {
    let tmp = temp_dir();
    if let Err(err) = std::fs::write(
        tmp.path().join("evergreen-matrix.toml"),
        "[output]\nformat = \"json\"\n\n[select]\nvariants = [\"mingw\"]\n",
    ) {
        panic!("should write config: {err}");
    }
    let out = stdout_of(cli(tmp.path()).arg("generate"));
    assert!(out.starts_with('{'));
    assert!(out.contains("\"mingw\""));
    assert!(!out.contains("\"releng\""));
}

#[test]
fn list_prints_one_line_per_variant() {
    let tmp = temp_dir();
    let out = stdout_of(cli(tmp.path()).arg("list"));
    assert_eq!(out.lines().count(), 32);
    assert!(out.lines().any(|l| l.starts_with("zseries-rhel72 ")));
}

#[test]
fn check_passes_on_shipped_table() {
    let tmp = temp_dir();
    let out = stdout_of(cli(tmp.path()).arg("check"));
    assert_eq!(out.trim(), "ok: 32 variants");
}

#[test]
fn flags_prints_android_expansions() {
    let tmp = temp_dir();
    let out = stdout_of(cli(tmp.path()).args(["flags", "android", "arm64-v8a"]));
    let parsed: BTreeMap<String, String> = match serde_yaml::from_str(&out) {
        Ok(parsed) => parsed,
        Err(err) => panic!("output should be YAML: {err}\n{out}"),
    };
    assert_eq!(parsed.len(), 2);
    assert_eq!(
        parsed.get("setup_android_toolchain").map(String::as_str),
        Some("JAVA_HOME=/opt/java/jdk8/ ./.evergreen/setup-android-toolchain.sh arm64-v8a arm64")
    );
}

#[test]
fn flags_prints_ios_expansions_as_json() {
    let tmp = temp_dir();
    let out = stdout_of(cli(tmp.path()).args([
        "flags",
        "ios",
        "iphonesimulator",
        "--format",
        "json",
    ]));
    let doc: Value = match serde_json::from_str(&out) {
        Ok(doc) => doc,
        Err(err) => panic!("output should be JSON: {err}\n{out}"),
    };
    assert_eq!(
        doc["libmongocapi_compile_env"],
        "DEVELOPER_DIR=/Applications/Xcode9.2.app"
    );
    let flags = doc["libmongocapi_cmake_flags"].as_str().unwrap_or_default();
    assert!(flags.contains("-arch x86_64"));
}

#[test]
fn invalid_format_env_is_reported_on_stderr() {
    let tmp = temp_dir();
    let output = match cli(tmp.path())
        .env("EVERGREEN_MATRIX_FORMAT", "xml")
        .arg("check")
        .output()
    {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok: 32 variants");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ignoring invalid env override"),
        "stderr should carry the warning: {stderr}"
    );
    assert!(stderr.contains("xml"));
}
