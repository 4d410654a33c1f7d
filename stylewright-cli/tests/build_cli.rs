use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::str::contains;

fn stylewright(root: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stylewright"));
    cmd.current_dir(root.path()).env("RUST_LOG", "warn");
    cmd
}

fn project() -> assert_fs::TempDir {
    let root = assert_fs::TempDir::new().expect("root");
    root.child("css/amp.css")
        .write_str("body{color:red}")
        .expect("amp.css");
    root.child("css/video-autoplay.css")
        .write_str("/* mask */\n.i-amphtml-video-mask {\n  z-index: 1;\n}\n")
        .expect("video-autoplay.css");
    root
}

#[test]
fn build_writes_artifacts_and_reports_completion() {
    let root = project();

    stylewright(&root)
        .arg("build")
        .assert()
        .success()
        .stdout(contains("Recompiled all CSS files into build/"));

    root.child("build/css.js")
        .assert(r#"export const cssText = "body{color:red}""#);
    root.child("build/css/v0.css").assert("body{color:red}");
    root.child("build/css/video-autoplay.css")
        .assert(".i-amphtml-video-mask{z-index:1}");
    root.child("EXTENSIONS_CSS_MAP").assert("{}");
}

#[test]
fn build_json_report_lists_entries_in_order() {
    let root = project();

    let output = stylewright(&root)
        .args(["build", "--json", "--compile-all"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["label"], "Recompiled all CSS files into");
    assert_eq!(report["compile_all"], true);
    assert_eq!(report["entries"][0]["source"], "amp.css");
    assert_eq!(report["entries"][1]["source"], "video-autoplay.css");
    assert_eq!(report["entries"][0]["writes"]["module"]["status"], "written");
}

#[test]
fn build_respects_root_flag() {
    let root = project();
    let elsewhere = assert_fs::TempDir::new().expect("cwd");

    Command::new(assert_cmd::cargo::cargo_bin!("stylewright"))
        .current_dir(elsewhere.path())
        .args(["build", "--root"])
        .arg(root.path())
        .assert()
        .success();

    root.child("build/css/v0.css").assert("body{color:red}");
}

#[test]
fn build_fails_on_syntax_error_with_location() {
    let root = project();
    root.child("css/video-autoplay.css")
        .write_str(".a {\n  color: red;\n")
        .expect("broken");

    stylewright(&root)
        .arg("build")
        .assert()
        .failure()
        .stderr(contains("video-autoplay.css"));

    // The first entry was already written before the failure.
    root.child("build/css/v0.css").assert("body{color:red}");
}

#[test]
fn check_reports_missing_then_consistent() {
    let root = project();

    stylewright(&root)
        .arg("check")
        .assert()
        .failure()
        .stdout(contains("MISSING"));

    stylewright(&root).arg("build").assert().success();

    stylewright(&root)
        .arg("check")
        .assert()
        .success()
        .stdout(contains("CONSISTENT"));
}

#[test]
fn check_flags_hand_edited_stylesheet() {
    let root = project();
    stylewright(&root).arg("build").assert().success();
    root.child("build/css/v0.css")
        .write_str("body{color:blue}")
        .expect("edit");

    stylewright(&root)
        .args(["check", "--json"])
        .assert()
        .failure()
        .stdout(contains(r#""state": "diverged""#));
}

#[test]
fn entries_lists_builtin_registry() {
    let root = project();

    stylewright(&root)
        .arg("entries")
        .assert()
        .success()
        .stdout(contains("css/amp.css"))
        .stdout(contains("build/css.js"))
        .stdout(contains("build/video-autoplay.css.js"));
}
