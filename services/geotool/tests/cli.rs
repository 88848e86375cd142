//! End-to-end tests of the geotool binary.

use std::process::{Command, Output};

use serde_json::Value;

fn geotool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geotool"))
        .args(args)
        .output()
        .expect("failed to run geotool")
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "geotool failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn run_with_cache(cache_dir: &str, args: &[&str]) -> Value {
    let mut full = vec!["--cache-dir", cache_dir];
    full.extend_from_slice(args);
    json_stdout(&geotool(&full))
}

#[test]
fn test_grid_command() {
    let output = geotool(&[
        "grid", "--lon", "11.38", "--lat", "47.26", "--width", "3000", "--height", "1000",
    ]);
    let report = json_stdout(&output);
    assert_eq!(report["nx"], 1800);
    assert_eq!(report["ny"], 600);
    assert_eq!(report["order"], "ll");
}

#[test]
fn test_grid_rejects_bad_order() {
    let output = geotool(&[
        "grid", "--lon", "0", "--lat", "0", "--width", "10", "--height", "10", "--order", "xx",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_read_and_cache_path() {
    let dir = test_utils::temp_test_dir();
    let source = test_utils::write_dummy_shapefile(&dir.path().join("f1.shp"));
    let cache_dir = dir.path().join("cache");
    let source = source.to_str().unwrap();
    let cache_dir = cache_dir.to_str().unwrap();

    let run = |args: &[&str]| run_with_cache(cache_dir, args);

    let report = run(&["read", "--no-cache", source]);
    assert_eq!(report["records"], 2);
    assert_eq!(report["cached"], false);

    let report = run(&["cache-path", source]);
    assert_eq!(report["fresh"], false);

    run(&["read", source]);
    let report = run(&["cache-path", source]);
    assert_eq!(report["fresh"], true);
}

#[test]
fn test_read_rejects_unknown_extension() {
    let dir = test_utils::temp_test_dir();
    let cache_dir = dir.path().join("cache");
    let cache_dir = cache_dir.to_str().unwrap();
    let output = geotool(&["--cache-dir", cache_dir, "read", "f1.splash"]);
    assert!(!output.status.success());
}
