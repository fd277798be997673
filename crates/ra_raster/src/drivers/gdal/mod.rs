// crates/ra_raster/src/drivers/gdal/mod.rs

//! GDAL 栅格引擎模块
//!
//! 通过 GDAL 读写任意 GDAL 支持的栅格格式，写出固定使用 GTiff 驱动。
//!
//! # 依赖
//!
//! 需要启用 `gdal` feature 并安装 GDAL 库；未启用时 [`GdalEngine::new`]
//! 返回 [`RasterError::NotAvailable`](crate::RasterError::NotAvailable)。

mod driver;

pub use driver::*;
