// crates/ra_raster/src/engine.rs

//! 栅格引擎抽象接口
//!
//! 核心计算只依赖 `load` / `save` 两个能力，逐像元运算由 [`Grid`] 完成，
//! 因此不绑定任何具体的栅格处理产品。

use crate::error::RasterResult;
use crate::grid::{Grid, RasterMetadata};
use std::path::Path;

/// 栅格引擎 trait
pub trait RasterEngine: Send + Sync {
    /// 引擎名称
    fn name(&self) -> &'static str;

    /// 读取第一波段为网格
    fn load(&self, path: &Path) -> RasterResult<Grid>;

    /// 将网格写出到 `path`，已存在时覆盖
    fn save(&self, grid: &Grid, path: &Path) -> RasterResult<()>;

    /// 读取栅格元数据
    ///
    /// 默认实现读取整个网格，具体引擎可以只读文件头。
    fn metadata(&self, path: &Path) -> RasterResult<RasterMetadata> {
        Ok(self.load(path)?.meta)
    }
}

impl<E: RasterEngine + ?Sized> RasterEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn load(&self, path: &Path) -> RasterResult<Grid> {
        (**self).load(path)
    }

    fn save(&self, grid: &Grid, path: &Path) -> RasterResult<()> {
        (**self).save(grid, path)
    }

    fn metadata(&self, path: &Path) -> RasterResult<RasterMetadata> {
        (**self).metadata(path)
    }
}
