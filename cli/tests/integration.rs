use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::{tempdir, TempDir};

fn texmf_tree() -> TempDir {
    let tmp = tempdir().expect("tempdir");
    let root = tmp.path();

    let pkg = root.join("tex/latex/geometry");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(
        pkg.join("geometry.sty"),
        "%% geometry.sty\n\
         % Copyright (C) 1996-2003 Hideo Umeki\n\
         % Copyright (C) 2008-2020 Hideo Umeki\n\
         \\ProvidesPackage{geometry}[2020/01/02 v5.9 Page Geometry]\n",
    )
    .unwrap();

    let fonts = root.join("fonts/tfm/public/cm");
    fs::create_dir_all(&fonts).unwrap();
    fs::write(fonts.join("cmr10.tfm"), b"").unwrap();

    let docs = root.join("doc/latex/fontspec");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("fontspec.pdf"), b"").unwrap();

    tmp
}

fn texfind(texmf: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_texfind"))
        .arg("--texmf-dist")
        .arg(texmf)
        .args(["--timeout", "60"])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run texfind")
}

#[test]
fn package_json_reports_metadata() {
    let tree = texmf_tree();
    let output = texfind(tree.path(), &["package", "geometry.sty", "--json"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: Value = serde_json::from_slice(&output.stdout).expect("parse json output");
    assert_eq!(parsed["kind"], "package_found");
    assert_eq!(parsed["value"]["author"], "Hideo Umeki");
    assert_eq!(parsed["value"]["version"], "2020/01/02 v5.9 Page Geometry");
    assert!(parsed["value"]["path"]
        .as_str()
        .unwrap()
        .ends_with("geometry.sty"));
}

#[test]
fn package_query_falls_back_to_documentation() {
    let tree = texmf_tree();
    let output = texfind(tree.path(), &["package", "fontspec.sty"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("path: "), "stdout:\n{stdout}");
    assert!(stdout.trim_end().ends_with("fontspec.pdf"));
}

#[test]
fn unknown_package_terminates_with_not_found() {
    let tree = texmf_tree();
    let output = texfind(tree.path(), &["package", "nosuchpackage.sty"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "not found: nosuchpackage.sty\n"
    );
}

#[test]
fn font_lookup_ignores_case() {
    let tree = texmf_tree();
    let output = texfind(tree.path(), &["font", "CMR10.TFM"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_end().ends_with("cmr10.tfm"), "stdout:\n{stdout}");
}

#[test]
fn missing_distribution_fails_with_message() {
    let tmp = tempdir().expect("tempdir");
    let output = texfind(&tmp.path().join("absent"), &["font", "cmr10.tfm"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "), "stderr:\n{stderr}");
}
