// crates/ra_raster/tests/geotiff_io.rs

//! GeoTIFF 引擎集成测试

use ra_raster::{GeoTiffEngine, Grid, RasterEngine, RasterError, RasterMetadata};
use std::fs::File;
use tiff::encoder::{colortype, TiffEncoder};

fn engine() -> Box<dyn RasterEngine> {
    Box::new(GeoTiffEngine::new())
}

#[test]
fn test_integer_raster_widened_to_f64() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h100.tif");
    {
        let file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder
            .write_image::<colortype::Gray16>(3, 1, &[0u16, 7, 65535])
            .unwrap();
    }

    let grid = engine().load(&path).unwrap();
    assert_eq!(grid.shape(), (3, 1));
    assert_eq!(grid.data, vec![0.0, 7.0, 65535.0]);
    // 无地理参考标签时使用默认变换
    assert_eq!(grid.meta.geo_transform, ra_raster::DEFAULT_GEO_TRANSFORM);
    assert_eq!(grid.meta.nodata, None);
}

#[test]
fn test_overwrite_leaves_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tb100.tif");
    let engine = engine();

    engine
        .save(&Grid::from_rows(2, 1, vec![1.0, 2.0]).unwrap(), &path)
        .unwrap();
    engine
        .save(&Grid::from_rows(2, 1, vec![3.0, 4.0]).unwrap(), &path)
        .unwrap();

    assert_eq!(engine.load(&path).unwrap().data, vec![3.0, 4.0]);
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("tb100.tif")]);
}

#[test]
fn test_projection_and_metadata_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("d50.tif");
    let mut meta = RasterMetadata::new(2, 3);
    meta.geo_transform = [620_000.0, 0.5, 0.0, 4_300_000.0, 0.0, -0.5];
    meta.projection = Some("NAD83 / UTM zone 10N".to_string());
    meta.nodata = Some(-9999.0);
    let grid = Grid::filled(meta.clone(), 0.05);

    let engine = engine();
    engine.save(&grid, &path).unwrap();

    let read = engine.metadata(&path).unwrap();
    assert_eq!(read.width, 2);
    assert_eq!(read.height, 3);
    assert_eq!(read.projection.as_deref(), Some("NAD83 / UTM zone 10N"));
    assert_eq!(read.nodata, Some(-9999.0));
    assert!(meta.geometry_mismatch(&read).is_none());
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("tb1.tif");
    let err = engine()
        .save(&Grid::from_rows(1, 1, vec![1.0]).unwrap(), &path)
        .unwrap_err();
    assert!(matches!(err, RasterError::Io(_)));
    assert!(!path.exists());
}

#[test]
fn test_load_garbage_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.tif");
    std::fs::write(&path, b"not a tiff").unwrap();
    let err = engine().load(&path).unwrap_err();
    assert!(matches!(err, RasterError::Decode { .. }));
}

#[test]
#[ignore = "写出约 290 MB 的栅格，较慢"]
fn test_grid_above_default_decode_limit_round_trips() {
    // 6000 x 6000 x 8 字节，超过 tiff 默认的 256 MiB 解码上限
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tb100.tif");
    let mut grid = Grid::filled(RasterMetadata::new(6000, 6000), 1.25);
    grid.data[6000 * 6000 - 1] = 3.5;

    let engine = engine();
    engine.save(&grid, &path).unwrap();
    let read = engine.load(&path).unwrap();
    assert_eq!(read.shape(), (6000, 6000));
    assert_eq!(read.data[0], 1.25);
    assert_eq!(read.data[6000 * 6000 - 1], 3.5);
}
