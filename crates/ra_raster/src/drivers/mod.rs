// crates/ra_raster/src/drivers/mod.rs

//! 栅格引擎实现
//!
//! - [`geotiff`]: 纯 Rust GeoTIFF 引擎（默认）
//! - [`gdal`]: GDAL 引擎（`gdal` feature）

pub mod gdal;
pub mod geotiff;

// 重导出
pub use self::gdal::GdalEngine;
pub use self::geotiff::GeoTiffEngine;
