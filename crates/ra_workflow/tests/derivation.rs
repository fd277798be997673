// crates/ra_workflow/tests/derivation.rs

//! 端到端派生测试：真实 GeoTIFF 读写 + 文件存储

use ra_config::{DerivationConfig, EngineKind};
use ra_foundation::{InputError, RaError};
use ra_hydraulics::{stress, PairingMode, StressKind, UnitSystem};
use ra_raster::{GeoTiffEngine, Grid, RasterEngine, RasterMetadata};
use ra_workflow::{create_engine, Condition, ConditionStore, FileStore, MemoryStore, StressPipeline};
use std::path::{Path, PathBuf};

fn grid(values: Vec<f64>) -> Grid {
    let mut meta = RasterMetadata::new(2, 2);
    meta.geo_transform = [500_000.0, 2.0, 0.0, 4_200_000.0, 0.0, -2.0];
    meta.nodata = Some(-9999.0);
    Grid::from_data(meta, values).unwrap()
}

/// 写出一组水深/流速栅格和粒径栅格
fn write_inputs(dir: &Path, tags: &[&str]) -> (Vec<PathBuf>, Vec<PathBuf>, PathBuf) {
    let engine = GeoTiffEngine::new();
    let input = dir.join("inputs");
    std::fs::create_dir_all(&input).unwrap();

    let mut depth = Vec::new();
    let mut velocity = Vec::new();
    for (i, tag) in tags.iter().enumerate() {
        let scale = (i + 1) as f64;
        let h = input.join(format!("h{tag}.tif"));
        let u = input.join(format!("u{tag}.tif"));
        engine
            .save(&grid(vec![2.0 * scale, 1.5, 0.0, -9999.0]), &h)
            .unwrap();
        engine
            .save(&grid(vec![1.0 * scale, 0.8, 0.0, 0.5]), &u)
            .unwrap();
        depth.push(h);
        velocity.push(u);
    }
    let grain = input.join("d50.tif");
    engine
        .save(&grid(vec![0.05, 0.05, 0.05, 0.05]), &grain)
        .unwrap();
    (depth, velocity, grain)
}

fn condition(dir: &Path, unit: &str, tags: &[&str]) -> Condition {
    let (depth, velocity, grain) = write_inputs(dir, tags);
    Condition::new("baseline", unit)
        .with_depth_rasters(depth)
        .with_velocity_rasters(velocity)
        .with_grain_size_raster(grain)
        .with_output_root(dir.join("baseline_outputs"))
}

fn leftovers(folder: &Path) -> Vec<String> {
    std::fs::read_dir(folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with('.'))
        .collect()
}

#[test]
fn test_shear_rasters_written_per_discharge() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    store
        .create(&condition(dir.path(), "SI", &["100", "250", "1000"]))
        .unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let paths = pipeline.compute_shear_stress("baseline").unwrap();
    let folder = dir.path().join("baseline_outputs").join("shear rasters");
    assert_eq!(
        paths,
        vec![
            folder.join("tb100.tif"),
            folder.join("tb250.tif"),
            folder.join("tb1000.tif"),
        ]
    );
    assert!(paths.iter().all(|p| p.is_file()));
    assert!(leftovers(&folder).is_empty());

    let tb = pipeline.engine().load(&paths[0]).unwrap();
    assert_eq!(tb.shape(), (2, 2));
    assert!((tb.data[0] - 7.232_553_26).abs() < 1e-7);
    // 干单元与无数据输入
    assert_eq!(tb.data[2], -9999.0);
    assert_eq!(tb.data[3], -9999.0);
    assert_eq!(tb.meta.nodata, Some(-9999.0));
    assert_eq!(tb.meta.geo_transform[0], 500_000.0);
}

#[test]
fn test_us_customary_constants_applied() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    store
        .create(&condition(dir.path(), "U.S. customary", &["100"]))
        .unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let paths = pipeline.compute_shields_stress("baseline").unwrap();
    let ts = pipeline.engine().load(&paths[0]).unwrap();

    let c = UnitSystem::UsCustomary.constants();
    let u = stress::shear_velocity(2.0, 1.0, 0.05);
    let expected = stress::shields_stress(stress::bed_shear_stress(u, &c), 0.05, &c);
    assert!((ts.data[0] - expected).abs() < 1e-12);
}

#[test]
fn test_shields_without_shear_folder() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    store.create(&condition(dir.path(), "SI", &["100"])).unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let paths = pipeline.compute_shields_stress("baseline").unwrap();
    let root = dir.path().join("baseline_outputs");
    assert_eq!(paths, vec![root.join("shield stress rasters").join("ts100.tif")]);
    assert!(!root.join("shear rasters").exists());

    let stored = pipeline.store().require("baseline").unwrap();
    assert!(stored.shear_output_folder.is_none());
    assert_eq!(stored.shield_output_paths, paths);
}

#[test]
fn test_rerun_overwrites_same_paths() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    store
        .create(&condition(dir.path(), "SI", &["100", "250"]))
        .unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let first = pipeline.compute_shear_stress("baseline").unwrap();
    let before = pipeline.engine().load(&first[0]).unwrap().data[0];

    // 流速加倍后重算，τb 变为原来的 4 倍
    let velocity = dir.path().join("inputs").join("u100.tif");
    pipeline
        .engine()
        .save(&grid(vec![2.0, 0.8, 0.0, 0.5]), &velocity)
        .unwrap();
    let second = pipeline.compute_shear_stress("baseline").unwrap();
    assert_eq!(first, second);

    let after = pipeline.engine().load(&second[0]).unwrap().data[0];
    let c = UnitSystem::Si.constants();
    let expected = stress::bed_shear_stress(stress::shear_velocity(2.0, 2.0, 0.05), &c);
    assert!((after - expected).abs() < 1e-9);
    assert!((after - 4.0 * before).abs() < 1e-9);

    let folder = first[0].parent().unwrap();
    let count = std::fs::read_dir(folder).unwrap().count();
    assert_eq!(count, 2);
}

#[test]
fn test_failed_step_keeps_earlier_rasters() {
    let dir = tempfile::tempdir().unwrap();
    let c = condition(dir.path(), "SI", &["100", "250", "500"]);
    std::fs::write(&c.depth_rasters[1], b"garbage").unwrap();
    let store = MemoryStore::new();
    store.create(&c).unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let err = pipeline.compute_shear_stress("baseline").unwrap_err();
    assert!(matches!(err, RaError::Engine(_)));

    let folder = dir.path().join("baseline_outputs").join("shear rasters");
    assert!(folder.join("tb100.tif").is_file());
    assert!(!folder.join("tb250.tif").exists());
    assert!(!folder.join("tb500.tif").exists());
    assert!(leftovers(&folder).is_empty());

    let stored = pipeline.store().require("baseline").unwrap();
    assert!(stored.shear_output_paths.is_empty());
    assert_eq!(stored.output_folder(StressKind::Shear), Some(folder.as_path()));
}

#[test]
fn test_mismatched_series_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = condition(dir.path(), "SI", &["100", "250", "500"]);
    c.velocity_rasters.truncate(2);
    let store = MemoryStore::new();
    store.create(&c).unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let err = pipeline.compute_shear_stress("baseline").unwrap_err();
    assert_eq!(
        err.as_input(),
        Some(&InputError::LengthMismatch {
            depth: 3,
            velocity: 2
        })
    );
    assert!(!dir.path().join("baseline_outputs").exists());
    assert!(pipeline
        .store()
        .require("baseline")
        .unwrap()
        .shear_output_paths
        .is_empty());
}

#[test]
fn test_missing_grain_raster() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = condition(dir.path(), "SI", &["100"]);
    c.grain_size_raster = PathBuf::new();
    let store = MemoryStore::new();
    store.create(&c).unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let err = pipeline.compute_shields_stress("baseline").unwrap_err();
    assert_eq!(err.as_input(), Some(&InputError::MissingGrainRaster));
    assert!(!dir.path().join("baseline_outputs").exists());
}

#[test]
fn test_missing_rasters_all_reported() {
    let dir = tempfile::tempdir().unwrap();
    let c = condition(dir.path(), "SI", &["100", "250"]);
    std::fs::remove_file(&c.depth_rasters[1]).unwrap();
    std::fs::remove_file(&c.velocity_rasters[0]).unwrap();
    let store = MemoryStore::new();
    store.create(&c).unwrap();
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), DerivationConfig::default());

    let err = pipeline.compute_shear_stress("baseline").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("h250.tif"));
    assert!(msg.contains("u100.tif"));
}

#[test]
fn test_unknown_condition() {
    let pipeline = StressPipeline::new(
        MemoryStore::new(),
        GeoTiffEngine::new(),
        DerivationConfig::default(),
    );
    let err = pipeline.compute_shear_stress("nope").unwrap_err();
    assert!(matches!(err, RaError::NotFound { ref name } if name == "nope"));
}

#[test]
fn test_by_tag_pairing_reorders_velocity() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = condition(dir.path(), "SI", &["100", "250"]);
    c.velocity_rasters.reverse();
    let store = MemoryStore::new();
    store.create(&c).unwrap();

    let config = DerivationConfig {
        pairing: PairingMode::ByTag,
        ..Default::default()
    };
    let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), config);
    let paths = pipeline.compute_shear_stress("baseline").unwrap();

    // h250 与 u250 配对：深度 4.0、流速 2.0
    let tb = pipeline.engine().load(&paths[1]).unwrap();
    let c = UnitSystem::Si.constants();
    let expected = stress::bed_shear_stress(stress::shear_velocity(4.0, 2.0, 0.05), &c);
    assert!((tb.data[0] - expected).abs() < 1e-9);
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("conditions.json");
    let expected = {
        let store = FileStore::open(&table).unwrap();
        store.create(&condition(dir.path(), "SI", &["100"])).unwrap();
        let engine = create_engine(EngineKind::GeoTiff).unwrap();
        let pipeline = StressPipeline::new(store, engine, DerivationConfig::default());
        pipeline.compute_shear_stress("baseline").unwrap()
    };

    let store = FileStore::open(&table).unwrap();
    let stored = store.require("baseline").unwrap();
    assert_eq!(stored.shear_output_paths, expected);
    assert_eq!(
        stored.output_folder(StressKind::Shear),
        expected[0].parent()
    );
}
