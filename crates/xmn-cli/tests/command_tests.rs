//! End-to-end tests running the xmn binary against a temporary packs root.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn xmn(root: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xmn"))
        .arg("--root")
        .arg(root.path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn install_pack(root: &TempDir, dir: &str, manifest: &str) {
    let path = root.path().join(dir);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("pack.json"), manifest).unwrap();
}

#[test]
fn test_packs_lists_enabled_packs() {
    let root = TempDir::new().unwrap();
    install_pack(&root, "route-tweaks", r#"{"name": "RouteTweaks", "version": "1.0.2"}"#);
    install_pack(&root, "old", r#"{"name": "Legacy", "enabled": false}"#);

    let output = xmn(&root, &["packs"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("RouteTweaks"));
    assert!(stdout.contains("1.0.2"));
    assert!(!stdout.contains("Legacy"));
}

#[test]
fn test_packs_json_output() {
    let root = TempDir::new().unwrap();
    install_pack(&root, "route-tweaks", r#"{"name": "RouteTweaks"}"#);

    let output = xmn(&root, &["packs", "--json"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value[0]["name"], "RouteTweaks");
    assert!(value[0]["version"].is_null());
}

#[test]
fn test_version_comparison() {
    let root = TempDir::new().unwrap();

    let output = xmn(&root, &["version", "0.91.3 (build 4)", "0.91"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "0.91.3 > 0.91");

    let output = xmn(&root, &["version", "1.x", "1.0"]);
    assert!(!output.status.success());
}

#[test]
fn test_settings_document() {
    let root = TempDir::new().unwrap();
    install_pack(&root, "route-tweaks", r#"{"name": "RouteTweaks"}"#);
    let document = root.path().join("route-tweaks").join("settings.json");

    let output = xmn(&root, &["settings", "RouteTweaks"]);
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("no settings document"));

    fs::write(&document, r#"{"max_wagons":12}"#).unwrap();
    let output = xmn(&root, &["settings", "RouteTweaks"]);
    assert!(String::from_utf8(output.stdout).unwrap().contains("\"max_wagons\": 12"));

    fs::write(&document, "{broken").unwrap();
    let output = xmn(&root, &["settings", "RouteTweaks"]);
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("malformed"));

    let output = xmn(&root, &["settings", "Missing"]);
    assert!(!output.status.success());
}
