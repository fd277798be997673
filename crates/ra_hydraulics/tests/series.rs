// crates/ra_hydraulics/tests/series.rs

//! 流量序列校验、配对与几何检查的组合测试

use ra_foundation::{InputError, RaError};
use ra_hydraulics::{pair_steps, validate_inputs, verify_geometry, PairingMode};
use ra_raster::{GeoTiffEngine, Grid, RasterEngine, RasterMetadata};
use std::path::{Path, PathBuf};

fn write(engine: &GeoTiffEngine, path: &Path, origin_x: f64) {
    let mut meta = RasterMetadata::new(3, 2);
    meta.geo_transform = [origin_x, 1.0, 0.0, 100.0, 0.0, -1.0];
    engine.save(&Grid::filled(meta, 1.0), path).unwrap();
}

fn series(dir: &Path, prefix: &str, tags: &[&str], engine: &GeoTiffEngine) -> Vec<PathBuf> {
    tags.iter()
        .map(|tag| {
            let path = dir.join(format!("{prefix}{tag}.tif"));
            write(engine, &path, 0.0);
            path
        })
        .collect()
}

#[test]
fn test_validated_series_pairs_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let engine = GeoTiffEngine::new();
    let depth = series(dir.path(), "h", &["050", "100", "1500"], &engine);
    let velocity = series(dir.path(), "u", &["050", "100", "1500"], &engine);
    let grain = dir.path().join("d50.tif");
    write(&engine, &grain, 0.0);

    validate_inputs(&depth, &velocity, &grain).unwrap();
    let steps = pair_steps(&depth, &velocity, PairingMode::Positional, "h", "u").unwrap();
    let names: Vec<_> = steps.iter().map(|s| s.output_file_name("tb")).collect();
    assert_eq!(names, vec!["tb050.tif", "tb100.tif", "tb1500.tif"]);

    verify_geometry(&engine, &steps, &grain).unwrap();
}

#[test]
fn test_by_tag_reports_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let engine = GeoTiffEngine::new();
    let depth = series(dir.path(), "h", &["100", "200"], &engine);
    let velocity = series(dir.path(), "u", &["200", "300"], &engine);

    let err = pair_steps(&depth, &velocity, PairingMode::ByTag, "h", "u").unwrap_err();
    assert_eq!(
        err,
        InputError::UnmatchedTags {
            depth_only: vec!["100".into()],
            velocity_only: vec!["300".into()],
            duplicates: vec![],
        }
    );
}

#[test]
fn test_shifted_raster_fails_geometry_check() {
    let dir = tempfile::tempdir().unwrap();
    let engine = GeoTiffEngine::new();
    let depth = series(dir.path(), "h", &["100"], &engine);
    let velocity = vec![dir.path().join("u100.tif")];
    write(&engine, &velocity[0], 25.0);
    let grain = dir.path().join("d50.tif");
    write(&engine, &grain, 0.0);

    let steps = pair_steps(&depth, &velocity, PairingMode::Positional, "h", "u").unwrap();
    let err = verify_geometry(&engine, &steps, &grain).unwrap_err();
    match err {
        RaError::Input(InputError::GridMismatch { other, .. }) => assert_eq!(other, velocity[0]),
        other => panic!("unexpected error: {other}"),
    }
}
