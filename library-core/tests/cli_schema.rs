//! The schema export binary: stdout is the schema and nothing else.

use library_core::{emit_schema, SCHEMA_ID};
use serde_json::Value;
use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_library-cli"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run library-cli")
}

#[test]
fn no_arguments_prints_schema() {
    let out = run(&[]);
    assert!(out.status.success());
    let printed: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(printed, emit_schema());
    assert_eq!(printed["$id"], SCHEMA_ID);
}

#[test]
fn schema_subcommand_matches_default() {
    let default = run(&[]);
    let explicit = run(&["schema"]);
    assert!(explicit.status.success());
    assert_eq!(default.stdout, explicit.stdout);
}

#[test]
fn compact_output_is_one_line() {
    let out = run(&["schema", "--compact"]);
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout).unwrap();
    assert_eq!(text.trim_end().lines().count(), 1);
    let printed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(printed, emit_schema());
}

#[test]
fn compact_flag_works_without_subcommand() {
    let bare = run(&["--compact"]);
    assert!(bare.status.success());
    assert_eq!(bare.stdout, run(&["schema", "--compact"]).stdout);
    assert_eq!(bare.stdout, run(&["--compact", "schema"]).stdout);
    let text = String::from_utf8(bare.stdout).unwrap();
    assert_eq!(text.trim_end().lines().count(), 1);
}

#[test]
fn unknown_subcommand_fails() {
    let out = run(&["validate", "manifest.yaml"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}
