extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn mandel() -> Command {
    Command::cargo_bin("mandel").unwrap()
}

#[test]
fn renders_a_png() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    mandel()
        .args(&["-o", out.to_str().unwrap(), "-s", "32x24", "-i", "40"])
        .assert()
        .success();
    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], PNG_MAGIC);
}

#[test]
fn threaded_output_matches_single_threaded() {
    let dir = tempfile::tempdir().unwrap();
    let single = dir.path().join("single.png");
    let threaded = dir.path().join("threaded.png");
    let common = ["-s", "40x30", "-c", "-0.75,0.1", "-z", "3", "-p", "0.1,-0.2"];
    mandel()
        .args(&["-o", single.to_str().unwrap(), "-t", "1"])
        .args(&common)
        .assert()
        .success();
    mandel()
        .args(&["-o", threaded.to_str().unwrap(), "-t", "3", "--smoothing", "normalize"])
        .args(&common)
        .assert()
        .success();
    assert_eq!(fs::read(&single).unwrap(), fs::read(&threaded).unwrap());
}

#[test]
fn zero_width_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.png");
    mandel()
        .args(&["-o", out.to_str().unwrap(), "-s", "0x10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid grid configuration"));
    assert!(!out.exists());
}

#[test]
fn unwritable_output_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("out.png");
    mandel()
        .args(&["-o", out.to_str().unwrap(), "-s", "8x8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn unknown_smoothing_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    mandel()
        .args(&["-o", out.to_str().unwrap(), "--smoothing", "cubic"])
        .assert()
        .failure();
}

#[test]
fn output_is_required() {
    mandel().assert().failure();
}

fn render_to(dir: &std::path::Path, name: &str, extra: &[&str]) -> Vec<u8> {
    let out = dir.join(name);
    mandel()
        .args(&["-o", out.to_str().unwrap(), "-s", "24x18", "-i", "60"])
        .args(extra)
        .assert()
        .success();
    fs::read(&out).unwrap()
}

#[test]
fn focus_moves_the_view() {
    let dir = tempfile::tempdir().unwrap();
    let plain = render_to(dir.path(), "plain.png", &[]);
    let focused = render_to(dir.path(), "focused.png", &["-f", "3,4"]);
    let centered = render_to(dir.path(), "centered.png", &["-f", "12,9"]);
    assert_ne!(plain, focused);
    // the middle pixel already shows the center
    assert_eq!(plain, centered);
}

#[test]
fn spread_and_smoothing_change_the_colors() {
    let dir = tempfile::tempdir().unwrap();
    let plain = render_to(dir.path(), "plain.png", &[]);
    let spread = render_to(dir.path(), "spread.png", &["--spread", "5"]);
    let linear = render_to(dir.path(), "linear.png", &["--smoothing", "linear"]);
    assert_ne!(plain, spread);
    assert_ne!(plain, linear);
    assert_eq!(&linear[..8], PNG_MAGIC);
}

#[test]
fn non_positive_spread_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    mandel()
        .args(&["-o", out.to_str().unwrap(), "--spread", "0"])
        .assert()
        .failure();
}
