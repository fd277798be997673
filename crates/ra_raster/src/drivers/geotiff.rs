// crates/ra_raster/src/drivers/geotiff.rs

//! 纯 Rust GeoTIFF 引擎
//!
//! 基于 `tiff` crate 读写单波段栅格。地理参考通过 `ModelPixelScale` /
//! `ModelTiepoint` 标签保存，NoData 使用 GDAL 约定的 `GDAL_NODATA` 标签，
//! 投影描述存放在 `GeoAsciiParams` 中。写出统一为 64 位浮点。

use crate::atomic::persist_atomic;
use crate::engine::RasterEngine;
use crate::error::{RasterError, RasterResult};
use crate::grid::{Grid, RasterMetadata, DEFAULT_GEO_TRANSFORM};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// GeoTIFF 栅格引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffEngine;

impl GeoTiffEngine {
    /// 创建引擎
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> RasterResult<Decoder<BufReader<File>>> {
        if !path.exists() {
            return Err(RasterError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        // 整幅读入，不受默认 256 MiB 解码缓冲上限约束
        Decoder::new(BufReader::new(file))
            .map(|d| d.with_limits(Limits::unlimited()))
            .map_err(|e| RasterError::decode(path, e))
    }

    fn read_metadata(
        decoder: &mut Decoder<BufReader<File>>,
        path: &Path,
    ) -> RasterResult<RasterMetadata> {
        let decode = |e: tiff::TiffError| RasterError::decode(path, e);

        let (width, height) = decoder.dimensions().map_err(decode)?;
        let mut meta = RasterMetadata::new(width as usize, height as usize);

        let scale = decoder
            .find_tag(Tag::ModelPixelScaleTag)
            .map_err(decode)?
            .map(|v| v.into_f64_vec())
            .transpose()
            .map_err(decode)?;
        let tiepoint = decoder
            .find_tag(Tag::ModelTiepointTag)
            .map_err(decode)?
            .map(|v| v.into_f64_vec())
            .transpose()
            .map_err(decode)?;

        if let (Some(scale), Some(tie)) = (scale, tiepoint) {
            if scale.len() >= 2 && tie.len() >= 6 {
                // 锚点 (i, j) 对应地理坐标 (x, y)
                let x_res = scale[0];
                let y_res = -scale[1];
                let origin_x = tie[3] - tie[0] * x_res;
                let origin_y = tie[4] - tie[1] * y_res;
                meta.geo_transform = [origin_x, x_res, 0.0, origin_y, 0.0, y_res];
            }
        }

        meta.nodata = decoder
            .find_tag(Tag::GdalNodata)
            .map_err(decode)?
            .and_then(|v| v.into_string().ok())
            .and_then(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok());

        meta.projection = decoder
            .find_tag(Tag::GeoAsciiParamsTag)
            .map_err(decode)?
            .and_then(|v| v.into_string().ok())
            .map(|s| s.trim_end_matches(['\0', '|']).to_string())
            .filter(|s| !s.is_empty());

        Ok(meta)
    }
}

fn widen<T: Copy + Into<f64>>(values: Vec<T>) -> Vec<f64> {
    values.into_iter().map(Into::into).collect()
}

impl RasterEngine for GeoTiffEngine {
    fn name(&self) -> &'static str {
        "geotiff"
    }

    fn load(&self, path: &Path) -> RasterResult<Grid> {
        let mut decoder = Self::open(path)?;
        let meta = Self::read_metadata(&mut decoder, path)?;

        let image = decoder
            .read_image()
            .map_err(|e| RasterError::decode(path, e))?;
        let data = match image {
            DecodingResult::F64(v) => v,
            DecodingResult::F32(v) => widen(v),
            DecodingResult::U8(v) => widen(v),
            DecodingResult::U16(v) => widen(v),
            DecodingResult::U32(v) => widen(v),
            DecodingResult::I8(v) => widen(v),
            DecodingResult::I16(v) => widen(v),
            DecodingResult::I32(v) => widen(v),
            #[allow(unreachable_patterns)]
            _ => {
                return Err(RasterError::UnsupportedSampleFormat {
                    path: path.to_path_buf(),
                    format: "64 位整型或多通道".to_string(),
                })
            }
        };

        if data.len() != meta.len() {
            // 多波段交错存储，只支持单波段
            return Err(RasterError::UnsupportedSampleFormat {
                path: path.to_path_buf(),
                format: format!("{} 个样本 / {} 个像元", data.len(), meta.len()),
            });
        }

        Grid::from_data(meta, data)
    }

    fn save(&self, grid: &Grid, path: &Path) -> RasterResult<()> {
        persist_atomic(path, |tmp| write_geotiff(grid, tmp, path))
    }

    fn metadata(&self, path: &Path) -> RasterResult<RasterMetadata> {
        let mut decoder = Self::open(path)?;
        Self::read_metadata(&mut decoder, path)
    }
}

/// 写出 GeoTIFF 到 `tmp`，`target` 仅用于错误信息
fn write_geotiff(grid: &Grid, tmp: &Path, target: &Path) -> RasterResult<()> {
    let encode = |e: tiff::TiffError| RasterError::encode(target, e);
    let (width, height) = grid.shape();
    let gt = if grid.meta.geo_transform == [0.0; 6] {
        DEFAULT_GEO_TRANSFORM
    } else {
        grid.meta.geo_transform
    };

    let mut writer = BufWriter::new(File::create(tmp)?);
    {
        let mut encoder = TiffEncoder::new(&mut writer).map_err(encode)?;
        let mut image = encoder
            .new_image::<colortype::Gray64Float>(width as u32, height as u32)
            .map_err(encode)?;

        let scale = [gt[1], -gt[5], 0.0];
        let tiepoint = [0.0, 0.0, 0.0, gt[0], gt[3], 0.0];
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, &scale[..])
            .map_err(encode)?;
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
            .map_err(encode)?;
        if let Some(nodata) = grid.meta.nodata {
            let text = nodata.to_string();
            image
                .encoder()
                .write_tag(Tag::GdalNodata, text.as_str())
                .map_err(encode)?;
        }
        if let Some(projection) = grid.meta.projection.as_deref() {
            image
                .encoder()
                .write_tag(Tag::GeoAsciiParamsTag, projection)
                .map_err(encode)?;
        }

        image.write_data(&grid.data).map_err(encode)?;
    }
    writer.flush()?;
    Ok(())
}
