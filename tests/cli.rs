extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use image::GenericImageView;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn writes_a_supersampled_pixmap() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frame.ppm");
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "20x10", "-a", "2", "-i", "50"])
        .assert()
        .success();
    let img = image::open(&out).unwrap();
    assert_eq!(img.dimensions(), (40, 20));
}

#[test]
fn averaged_mode_keeps_the_canvas_size() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frame.ppm");
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "--size",
            "12x9",
            "--mode",
            "averaged",
            "--center",
            "-0.75,0.1",
            "--extent",
            "0.4x0.3",
            "--threads",
            "1",
            "--palette",
            "#000000,#202020,#404040,#808080,#c0c0c0,#ffffff",
        ])
        .assert()
        .success();
    let img = image::open(&out).unwrap();
    assert_eq!(img.dimensions(), (12, 9));
}

#[test]
fn rejects_a_bad_histogram() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frame.ppm");
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "-s",
            "4x4",
            "--breakpoints",
            "0.0,0.8,0.5,1.0",
            "--palette",
            "#000000,#111111,#222222,#ffffff",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("breakpoint 2 (0.5) is lower").from_utf8());
    assert!(!out.exists());
}

#[test]
fn rejects_mismatched_palette() {
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "4x4", "--breakpoints", "0,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 breakpoints were given for 6 colors").from_utf8());
}

#[test]
fn rejects_a_bad_size() {
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "0x10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size").from_utf8());
}

#[test]
fn rejects_a_center_that_is_not_finite() {
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "4x4", "-a", "1", "-c", "NaN,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("View center must be two finite numbers").from_utf8());
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "4x4", "-a", "1", "-c", "0,inf"])
        .assert()
        .failure();
    assert!(!std::path::Path::new("unused.ppm").exists());
}

#[test]
fn rejects_an_extent_that_is_not_finite() {
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "4x4", "-a", "1", "-e", "infx1"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("View extent must be two positive finite numbers")
                .from_utf8(),
        );
    Command::cargo_bin("mandelview")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "4x4", "-a", "1", "-e", "1xNaN"])
        .assert()
        .failure();
}
