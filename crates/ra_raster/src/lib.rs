// crates/ra_raster/src/lib.rs

//! River Architect 栅格模块
//!
//! 提供栅格网格、逐像元代数运算与栅格文件读写。
//!
//! # 模块
//!
//! - [`grid`]: 栅格网格与逐像元运算
//! - [`engine`]: 栅格引擎抽象 (`load` / `save`)
//! - [`drivers`]: 引擎实现 (GeoTIFF, GDAL)
//! - [`atomic`]: 先写临时文件再重命名的原子写出
//! - [`error`]: 栅格错误类型
//!
//! # 可选依赖
//!
//! - `gdal`: 启用 GDAL 栅格引擎
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use ra_raster::{GeoTiffEngine, RasterEngine};
//!
//! let engine = GeoTiffEngine::new();
//! let depth = engine.load(Path::new("h100.tif"))?;
//! let doubled = depth.map(|d| 2.0 * d);
//! engine.save(&doubled, Path::new("out.tif"))?;
//! ```

pub mod atomic;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod grid;

// 重导出常用类型
pub use drivers::{GdalEngine, GeoTiffEngine};
pub use engine::RasterEngine;
pub use error::{RasterError, RasterResult};
pub use grid::{Grid, RasterMetadata, DEFAULT_GEO_TRANSFORM};
