// crates/ra_raster/src/drivers/gdal/driver.rs

//! GDAL 栅格引擎实现

use crate::engine::RasterEngine;
use crate::error::{RasterError, RasterResult};
use crate::grid::Grid;
use std::path::Path;

/// GDAL 栅格引擎
#[derive(Debug, Clone, Copy)]
pub struct GdalEngine {
    _private: (),
}

#[cfg(feature = "gdal")]
impl GdalEngine {
    /// 创建引擎
    pub fn new() -> RasterResult<Self> {
        Ok(Self { _private: () })
    }

    fn open(path: &Path) -> RasterResult<gdal::Dataset> {
        if !path.exists() {
            return Err(RasterError::FileNotFound(path.to_path_buf()));
        }
        Ok(gdal::Dataset::open(path)?)
    }

    fn read_metadata(dataset: &gdal::Dataset) -> RasterResult<crate::grid::RasterMetadata> {
        let (width, height) = dataset.raster_size();
        let geo_transform = dataset.geo_transform()?;
        let projection = Some(dataset.projection()).filter(|p| !p.is_empty());
        let nodata = if dataset.raster_count() > 0 {
            dataset.rasterband(1).ok().and_then(|b| b.no_data_value())
        } else {
            None
        };

        Ok(crate::grid::RasterMetadata {
            width,
            height,
            geo_transform,
            projection,
            nodata,
        })
    }
}

#[cfg(feature = "gdal")]
impl RasterEngine for GdalEngine {
    fn name(&self) -> &'static str {
        "gdal"
    }

    fn load(&self, path: &Path) -> RasterResult<Grid> {
        let dataset = Self::open(path)?;
        let meta = Self::read_metadata(&dataset)?;
        if dataset.raster_count() == 0 {
            return Err(RasterError::decode(path, "dataset has no raster bands"));
        }

        let band = dataset.rasterband(1)?;
        let (width, height) = (meta.width, meta.height);
        let buffer = band.read_as::<f64>((0, 0), (width, height), (width, height), None)?;
        let (_, data) = buffer.into_shape_and_vec();

        Grid::from_data(meta, data)
    }

    fn save(&self, grid: &Grid, path: &Path) -> RasterResult<()> {
        use gdal::raster::Buffer;
        use gdal::DriverManager;

        crate::atomic::persist_atomic(path, |tmp| {
            let driver = DriverManager::get_driver_by_name("GTiff")?;
            let (width, height) = grid.shape();
            let mut dataset = driver.create_with_band_type::<f64, _>(tmp, width, height, 1)?;
            dataset.set_geo_transform(&grid.meta.geo_transform)?;
            if let Some(projection) = grid.meta.projection.as_deref() {
                dataset.set_projection(projection)?;
            }

            let mut band = dataset.rasterband(1)?;
            band.set_no_data_value(grid.meta.nodata)?;
            let mut buffer = Buffer::new((width, height), grid.data.clone());
            band.write((0, 0), (width, height), &mut buffer)?;
            Ok(())
        })
    }

    fn metadata(&self, path: &Path) -> RasterResult<crate::grid::RasterMetadata> {
        let dataset = Self::open(path)?;
        Self::read_metadata(&dataset)
    }
}

/// 无 GDAL 支持时的占位实现
#[cfg(not(feature = "gdal"))]
impl GdalEngine {
    /// 创建引擎 (无 GDAL 支持)
    pub fn new() -> RasterResult<Self> {
        Err(RasterError::NotAvailable)
    }
}

#[cfg(not(feature = "gdal"))]
impl RasterEngine for GdalEngine {
    fn name(&self) -> &'static str {
        "gdal"
    }

    fn load(&self, _path: &Path) -> RasterResult<Grid> {
        Err(RasterError::NotAvailable)
    }

    fn save(&self, _grid: &Grid, _path: &Path) -> RasterResult<()> {
        Err(RasterError::NotAvailable)
    }
}

#[cfg(all(test, not(feature = "gdal")))]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_without_feature() {
        assert!(matches!(GdalEngine::new(), Err(RasterError::NotAvailable)));
    }
}
