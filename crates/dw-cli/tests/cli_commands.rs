//! Integration tests for the dw-cli command-line interface.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn darwinian() -> Command {
    let mut cmd = Command::cargo_bin("darwinian").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write an ASCII map into a temp directory and return both.
fn map_file(rows: &[&str]) -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.txt");
    fs::write(&path, rows.join("\n")).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_prints_bounded_grid() {
    darwinian()
        .args(["generate", "--size", "6", "--wall"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("6x6 grid")
                .and(predicate::str::contains("######"))
                .and(predicate::str::contains("#....#")),
        );
}

#[test]
fn generate_is_deterministic_per_seed() {
    let run = || {
        darwinian()
            .args(["generate", "--size", "12", "--seed", "9", "--weights", "60,20,10,10"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn generate_stats_table() {
    darwinian()
        .args(["generate", "--size", "5", "--stats"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Terrain")
                .and(predicate::str::contains("rock"))
                .and(predicate::str::contains("100.0%")),
        );
}

#[test]
fn generate_rejects_bad_probability() {
    darwinian()
        .args(["generate", "--floor-probability", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn generate_rejects_conflicting_fills() {
    darwinian()
        .args(["generate", "--floor-probability", "0.5", "--weights", "1,1,1,1"])
        .assert()
        .failure();
}

#[test]
fn generate_from_json_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gen.json");
    fs::write(
        &path,
        r#"{ "size": 7, "with_bounding_wall": true, "floor_probability": 0.45 }"#,
    )
    .unwrap();

    darwinian()
        .args(["generate", "--config", path.to_str().unwrap(), "--refine", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7x7 grid").and(predicate::str::contains("#######")));
}

#[test]
fn generate_from_invalid_json_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gen.json");
    fs::write(&path, r#"{ "size": 7, "colour": "red" }"#).unwrap();

    darwinian()
        .args(["generate", "--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn generate_from_ascii_map() {
    let (_dir, path) = map_file(&["    ", " xx ", "    ", "   x"]);
    darwinian()
        .args(["generate", "--map", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains(".##.").and(predicate::str::contains("...#")));
}

#[test]
fn generate_rejects_ragged_map() {
    let (_dir, path) = map_file(&["   ", "  ", "   "]);
    darwinian()
        .args(["generate", "--map", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// path
// ---------------------------------------------------------------------------

#[test]
fn path_found_on_open_grid() {
    darwinian()
        .args(["path", "--size", "10", "--from", "1,1", "--to", "8,7"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Path found")
                .and(predicate::str::contains("(1, 1) -> (8, 7)"))
                .and(predicate::str::contains("S"))
                .and(predicate::str::contains("T")),
        );
}

#[test]
fn path_exhausted_when_target_enclosed() {
    let (_dir, path) = map_file(&["      ", "   ###", "   # #", "   ###", "      ", "      "]);
    darwinian()
        .args(["path", "--map", &path, "--from", "0,0", "--to", "4,2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path").and(predicate::str::contains("exhausted")));
}

#[test]
fn path_rejects_wall_endpoint() {
    darwinian()
        .args(["path", "--size", "6", "--wall", "--from", "0,0", "--to", "3,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a wall"));
}

#[test]
fn path_rejects_unknown_distance() {
    darwinian()
        .args(["path", "--distance", "taxicab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown distance"));
}

#[test]
fn path_rejects_malformed_point() {
    darwinian()
        .args(["path", "--from", "1;1"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_runs_tick_budget() {
    darwinian()
        .args(["simulate", "--size", "10", "--ticks", "12", "--movers", "3"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("12 ticks")
                .and(predicate::str::contains("3 movers"))
                .and(predicate::str::contains("Scheduler paused"))
                .and(predicate::str::contains("Velocity")),
        );
}

#[test]
fn simulate_without_movers() {
    darwinian()
        .args(["simulate", "--size", "4", "--ticks", "2", "--movers", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 ticks"));
}

#[test]
fn simulate_rejects_zero_ticks() {
    darwinian()
        .args(["simulate", "--ticks", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ticks"));
}

#[test]
fn simulate_fails_on_solid_grid() {
    darwinian()
        .args(["simulate", "--size", "5", "--floor-probability", "0", "--movers", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no open cells"));
}
