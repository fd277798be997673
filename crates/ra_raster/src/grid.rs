// crates/ra_raster/src/grid.rs

//! 栅格网格
//!
//! 单波段 f64 网格及其逐像元运算。任一输入像元为无数据、或结果非有限值时，
//! 输出像元写为输出网格的无数据值。

use crate::error::{RasterError, RasterResult};
use rayon::prelude::*;

/// 默认地理变换（原点 (0, 0)，像元 1×1，北向上）
pub const DEFAULT_GEO_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, -1.0];

/// 地理变换比较容差
const GEO_TOLERANCE: f64 = 1e-9;

/// 栅格元数据
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    /// 宽度 (像素)
    pub width: usize,
    /// 高度 (像素)
    pub height: usize,
    /// 地理变换参数 [x_origin, x_res, x_rot, y_origin, y_rot, y_res]
    pub geo_transform: [f64; 6],
    /// 投影描述 (WKT 或 GeoTIFF ASCII 参数)
    pub projection: Option<String>,
    /// NoData 值
    pub nodata: Option<f64>,
}

impl RasterMetadata {
    /// 创建无地理参考的元数据
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            geo_transform: DEFAULT_GEO_TRANSFORM,
            projection: None,
            nodata: None,
        }
    }

    /// 像元总数
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// 是否为空网格
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 覆盖范围 `[min_x, min_y, max_x, max_y]`，不考虑旋转项
    pub fn bounds(&self) -> [f64; 4] {
        let [x0, dx, _, y0, _, dy] = self.geo_transform;
        let x1 = x0 + dx * self.width as f64;
        let y1 = y0 + dy * self.height as f64;
        [x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)]
    }

    /// 与另一网格的几何差异；一致时返回 `None`
    ///
    /// 比较尺寸、地理变换与投影（双方都有投影时才比较）。
    pub fn geometry_mismatch(&self, other: &RasterMetadata) -> Option<String> {
        if self.width != other.width || self.height != other.height {
            return Some(format!(
                "尺寸 {}x{} vs {}x{}",
                self.width, self.height, other.width, other.height
            ));
        }
        let differs = self
            .geo_transform
            .iter()
            .zip(other.geo_transform.iter())
            .any(|(a, b)| (a - b).abs() > GEO_TOLERANCE);
        if differs {
            return Some(format!(
                "范围 {:?} vs {:?} (像元 {} x {} vs {} x {})",
                self.bounds(),
                other.bounds(),
                self.geo_transform[1],
                self.geo_transform[5],
                other.geo_transform[1],
                other.geo_transform[5],
            ));
        }
        if let (Some(a), Some(b)) = (&self.projection, &other.projection) {
            if a.trim() != b.trim() {
                return Some("投影不同".to_string());
            }
        }
        None
    }
}

/// 单波段栅格网格
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// 元数据
    pub meta: RasterMetadata,
    /// 行优先像元数据
    pub data: Vec<f64>,
}

impl Grid {
    /// 创建填充值网格
    pub fn filled(meta: RasterMetadata, value: f64) -> Self {
        let data = vec![value; meta.len()];
        Self { meta, data }
    }

    /// 从数据创建
    pub fn from_data(meta: RasterMetadata, data: Vec<f64>) -> RasterResult<Self> {
        if data.len() != meta.len() {
            return Err(RasterError::SizeMismatch {
                expected: meta.len(),
                actual: data.len(),
            });
        }
        Ok(Self { meta, data })
    }

    /// 从行优先数据创建无地理参考网格
    pub fn from_rows(width: usize, height: usize, data: Vec<f64>) -> RasterResult<Self> {
        Self::from_data(RasterMetadata::new(width, height), data)
    }

    /// 设置 NoData 值
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.meta.nodata = nodata;
        self
    }

    /// 无数据像元改写为 NaN 并清除 nodata 定义
    pub fn nodata_to_nan(mut self) -> Self {
        if let Some(nd) = self.meta.nodata.take() {
            self.data
                .par_iter_mut()
                .filter(|v| (**v - nd).abs() < 1e-10)
                .for_each(|v| *v = f64::NAN);
        }
        self
    }

    /// 非有限像元改写为 `nodata` 并以之作为 nodata 定义
    pub fn fill_nonfinite(mut self, nodata: f64) -> Self {
        self.data
            .par_iter_mut()
            .filter(|v| !v.is_finite())
            .for_each(|v| *v = nodata);
        self.meta.nodata = Some(nodata);
        self
    }

    /// (宽, 高)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.meta.width, self.meta.height)
    }

    /// 获取像素值，无数据或越界时返回 `None`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.meta.width || y >= self.meta.height {
            return None;
        }
        let val = self.data[y * self.meta.width + x];
        if self.is_nodata(val) {
            None
        } else {
            Some(val)
        }
    }

    /// 判断是否为无数据
    #[inline]
    pub fn is_nodata(&self, value: f64) -> bool {
        value.is_nan() || self.meta.nodata.is_some_and(|nd| (value - nd).abs() < 1e-10)
    }

    /// 输出网格中代表无数据的值
    #[inline]
    fn fill_value(&self) -> f64 {
        self.meta.nodata.unwrap_or(f64::NAN)
    }

    fn check_shape(&self, other: &Grid) -> RasterResult<()> {
        if self.shape() != other.shape() {
            return Err(RasterError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }

    /// 逐像元一元运算
    pub fn map<F>(&self, f: F) -> Grid
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        let fill = self.fill_value();
        let data = self
            .data
            .par_iter()
            .map(|&a| {
                if self.is_nodata(a) {
                    return fill;
                }
                finite_or(f(a), fill)
            })
            .collect();
        Grid {
            meta: self.meta.clone(),
            data,
        }
    }

    /// 逐像元二元运算，输出继承 `self` 的元数据
    pub fn zip_with<F>(&self, other: &Grid, f: F) -> RasterResult<Grid>
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        self.check_shape(other)?;
        let fill = self.fill_value();
        let data = self
            .data
            .par_iter()
            .zip(other.data.par_iter())
            .map(|(&a, &b)| {
                if self.is_nodata(a) || other.is_nodata(b) {
                    return fill;
                }
                finite_or(f(a, b), fill)
            })
            .collect();
        Ok(Grid {
            meta: self.meta.clone(),
            data,
        })
    }

    /// 逐像元三元运算，输出继承 `self` 的元数据
    pub fn zip3_with<F>(&self, second: &Grid, third: &Grid, f: F) -> RasterResult<Grid>
    where
        F: Fn(f64, f64, f64) -> f64 + Sync + Send,
    {
        self.check_shape(second)?;
        self.check_shape(third)?;
        let fill = self.fill_value();
        let data = self
            .data
            .par_iter()
            .zip(second.data.par_iter())
            .zip(third.data.par_iter())
            .map(|((&a, &b), &c)| {
                if self.is_nodata(a) || second.is_nodata(b) || third.is_nodata(c) {
                    return fill;
                }
                finite_or(f(a, b, c), fill)
            })
            .collect();
        Ok(Grid {
            meta: self.meta.clone(),
            data,
        })
    }

    /// 有效像元的 (最小值, 最大值)
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !self.is_nodata(*v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[inline]
fn finite_or(value: f64, fill: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fill
    }
}
