use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FIXTURE: &str = "tests/e2e_data/town.qgs";

fn layerfix() -> Command {
    Command::cargo_bin("layerfix").unwrap()
}

/// Copies the fixture project and its data directory into a temp dir.
fn staged_project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("data")).unwrap();
    fs::copy(
        "tests/e2e_data/data/parks.geojson",
        dir.path().join("data/parks.geojson"),
    )
    .unwrap();
    let project = dir.path().join("town.qgs");
    fs::copy(FIXTURE, &project).unwrap();
    (dir, project)
}

fn write_replacements(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("replacements.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_formats_lists_registry() {
    layerfix()
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("GeoTIFF"))
        .stdout(predicate::str::contains("ESRI Shapefile"));
}

#[test]
fn test_formats_filtered_by_kind() {
    layerfix()
        .args(["formats", "--kind", "raster"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GeoTIFF"))
        .stdout(predicate::str::contains("ESRI Shapefile").not());
}

#[test]
fn test_layers_shows_status() {
    layerfix()
        .args(["layers", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("Layers (5 total)"))
        .stdout(predicate::str::is_match(r"parcels\s*\|\s*vector\s*\|\s*url\s*\|").unwrap())
        .stdout(predicate::str::is_match(r"zoning\s*\|\s*vector\s*\|\s*database\s*\|").unwrap());
}

#[test]
fn test_check_prints_summary() {
    layerfix()
        .args(["check", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 bad layer(s):"))
        .stdout(predicate::str::contains(" * ./data/roads.shp|layerid=0"))
        .stdout(predicate::str::contains(" * /srv/gis/elevation/dem.tif"));
}

#[test]
fn test_check_logs_summary_once() {
    let output = layerfix()
        .args(["check", FIXTURE, "--verbose"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("2 bad layer(s):").count(), 1);
    assert_eq!(stderr.matches(" * /srv/gis/elevation/dem.tif").count(), 1);
}

#[test]
fn test_check_json() {
    let output = layerfix()
        .args(["check", FIXTURE, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["count"], 2);
    assert_eq!(summary["entries"][0]["name"], "roads");
    assert_eq!(summary["entries"][1]["source"], "/srv/gis/elevation/dem.tif");
}

#[test]
fn test_check_missing_project_fails() {
    layerfix()
        .args(["check", "tests/e2e_data/missing.qgs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read project"));
}

#[test]
fn test_repair_requires_destination() {
    layerfix()
        .args(["repair", FIXTURE, "--policy", "ignore"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("--in-place"));
}

#[test]
fn test_repair_rejects_conflicting_destinations() {
    layerfix()
        .args(["repair", FIXTURE, "--policy", "ignore", "--in-place", "-o", "x.qgs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conflicting options"));
}

#[test]
fn test_repair_abort_leaves_project_unwritten() {
    let (dir, project) = staged_project();
    let output = dir.path().join("fixed.qgs");

    layerfix()
        .arg("repair")
        .arg(&project)
        .args(["--policy", "abort", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Repair aborted"))
        .stderr(predicate::str::contains("Repair of 2 bad layer(s) aborted"))
        .stderr(predicate::str::contains("Hint:"));

    assert!(!output.exists());
}

#[test]
fn test_repair_ignore_writes_nothing() {
    let (dir, project) = staged_project();
    let output = dir.path().join("fixed.qgs");

    layerfix()
        .arg("repair")
        .arg(&project)
        .args(["--policy", "ignore", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Continuing without the missing layers."))
        .stdout(predicate::str::contains("project not written"));

    assert!(!output.exists());
}

#[test]
fn test_repair_with_replacements() {
    let (dir, project) = staged_project();
    fs::create_dir(dir.path().join("moved")).unwrap();
    fs::write(dir.path().join("moved/roads.shp"), b"").unwrap();
    let map = write_replacements(
        dir.path(),
        r#"{"roads.shp": "./moved/roads.shp", "/srv/gis/elevation/dem.tif": "/nowhere/dem.tif"}"#,
    );
    let output = dir.path().join("fixed.qgs");

    let result = layerfix()
        .arg("repair")
        .arg(&project)
        .arg("--replacements")
        .arg(&map)
        .arg("--output")
        .arg(&output)
        .arg("--json")
        .output()
        .unwrap();
    assert!(result.status.success());

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["aborted"], false);
    assert_eq!(report["unprocessed"], 0);
    assert_eq!(report["layers"][0]["outcome"]["outcome"], "repaired");
    assert_eq!(report["layers"][0]["source"], "./moved/roads.shp");
    assert_eq!(report["layers"][1]["outcome"]["detail"], "/nowhere/dem.tif");

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("<datasource>./moved/roads.shp</datasource>"));
    assert!(written.contains("<datasource>/nowhere/dem.tif</datasource>"));

    let original = fs::read_to_string(&project).unwrap();
    assert!(original.contains("./data/roads.shp|layerid=0"));

    layerfix()
        .arg("check")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 bad layer(s):"))
        .stdout(predicate::str::contains(" * /nowhere/dem.tif"));
}

#[test]
fn test_repair_in_place() {
    let (dir, project) = staged_project();
    fs::write(dir.path().join("dem.tif"), b"").unwrap();
    let map = write_replacements(dir.path(), r#"{"dem.tif": "dem.tif"}"#);

    layerfix()
        .arg("repair")
        .arg(&project)
        .arg("--replacements")
        .arg(&map)
        .arg("--in-place")
        .assert()
        .success()
        .stdout(predicate::str::contains("Repaired 1 of 2 bad layer(s)."));

    let written = fs::read_to_string(&project).unwrap();
    assert!(written.contains("<datasource>dem.tif</datasource>"));
}

#[test]
fn test_repair_rejects_bad_replacement_file() {
    let (dir, project) = staged_project();
    let map = write_replacements(dir.path(), "[1, 2]");

    layerfix()
        .arg("repair")
        .arg(&project)
        .arg("--replacements")
        .arg(&map)
        .arg("--in-place")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load replacements"));
}
