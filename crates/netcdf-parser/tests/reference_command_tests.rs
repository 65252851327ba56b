//! External reference command tests. The commands are small `sh` scripts.
#![cfg(unix)]

use std::path::{Path, PathBuf};

use netcdf_parser::{ExternalReferenceGenerator, NetCdfError, ReferenceGenerator};
use serde_json::Value;
use tempfile::TempDir;

fn script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("make_refs.sh");
    std::fs::write(&path, body).expect("write script");
    path
}

fn sh(script: &Path) -> ExternalReferenceGenerator {
    ExternalReferenceGenerator::from_command(&["sh".to_string(), script.display().to_string()]).unwrap()
}

#[test]
fn test_command_receives_input_url_output() {
    let dir = TempDir::new().unwrap();
    let cmd = sh(&script(
        &dir,
        r#"printf '{"input":"%s","url":"%s"}' "$1" "$2" > "$3""#,
    ));
    let input = dir.path().join("sst_20220101.nc");
    let output = dir.path().join("sst_20220101.json");

    cmd.generate(&input, "https://data.example.com/sst_20220101.nc", &output)
        .unwrap();

    let refs: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(refs["input"], input.display().to_string());
    assert_eq!(refs["url"], "https://data.example.com/sst_20220101.nc");
}

#[test]
fn test_command_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let cmd = sh(&script(&dir, "echo 'cannot read input' >&2\nexit 3\n"));
    let output = dir.path().join("out.json");

    let err = cmd
        .generate(&dir.path().join("in.nc"), "https://data.example.com/in.nc", &output)
        .unwrap_err();

    match err {
        NetCdfError::CommandError(msg) => assert!(msg.contains("cannot read input"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_command_without_output_file_fails() {
    let dir = TempDir::new().unwrap();
    let cmd = sh(&script(&dir, "exit 0\n"));
    let output = dir.path().join("out.json");

    let err = cmd
        .generate(&dir.path().join("in.nc"), "https://data.example.com/in.nc", &output)
        .unwrap_err();

    match err {
        NetCdfError::CommandError(msg) => assert!(msg.contains("did not write"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_program_fails() {
    let dir = TempDir::new().unwrap();
    let cmd = ExternalReferenceGenerator::from_command(&["no-such-reference-tool".to_string()]).unwrap();

    let err = cmd
        .generate(&dir.path().join("in.nc"), "https://data.example.com/in.nc", &dir.path().join("out.json"))
        .unwrap_err();
    assert!(matches!(err, NetCdfError::CommandError(_)));
}
