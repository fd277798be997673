// crates/ra_hydraulics/src/validation.rs

//! 输入校验
//!
//! 在任何栅格写出之前运行完毕。只做存在性检查，不读取栅格内容。

use crate::discharge::DischargeStep;
use ra_foundation::{InputError, RaResult};
use ra_raster::RasterEngine;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 校验水深/流速序列与粒径栅格
///
/// 按顺序检查：序列非空、数量一致、粒径栅格已指定且存在、所有水深/流速栅格存在。
/// 缺失的栅格一次性全部列出。
pub fn validate_inputs(
    depth: &[PathBuf],
    velocity: &[PathBuf],
    grain: &Path,
) -> Result<(), InputError> {
    if depth.is_empty() || velocity.is_empty() {
        return Err(InputError::EmptySeries {
            depth: depth.len(),
            velocity: velocity.len(),
        });
    }
    if depth.len() != velocity.len() {
        return Err(InputError::LengthMismatch {
            depth: depth.len(),
            velocity: velocity.len(),
        });
    }
    if grain.as_os_str().is_empty() {
        return Err(InputError::MissingGrainRaster);
    }
    if !grain.exists() {
        return Err(InputError::GrainRasterNotFound {
            path: grain.to_path_buf(),
        });
    }

    let missing = |paths: &[PathBuf]| -> Vec<PathBuf> {
        paths.iter().filter(|p| !p.exists()).cloned().collect()
    };
    let missing_depth = missing(depth);
    let missing_velocity = missing(velocity);
    if !missing_depth.is_empty() || !missing_velocity.is_empty() {
        return Err(InputError::MissingRasters {
            depth: missing_depth,
            velocity: missing_velocity,
        });
    }
    debug!(steps = depth.len(), grain = %grain.display(), "输入校验通过");
    Ok(())
}

/// 检查所有流量步栅格与粒径栅格几何一致
///
/// 比较尺寸、地理变换和投影，第一处不一致返回 `InputError::GridMismatch`；
/// 读取元数据失败时返回引擎错误。
pub fn verify_geometry<E>(engine: &E, steps: &[DischargeStep], grain: &Path) -> RaResult<()>
where
    E: RasterEngine + ?Sized,
{
    let reference = engine.metadata(grain)?;
    for step in steps {
        for path in [&step.depth, &step.velocity] {
            let meta = engine.metadata(path)?;
            if let Some(reason) = reference.geometry_mismatch(&meta) {
                return Err(InputError::GridMismatch {
                    reference: grain.to_path_buf(),
                    other: path.clone(),
                    reason,
                }
                .into());
            }
        }
    }
    debug!(engine = engine.name(), steps = steps.len(), "栅格几何一致");
    Ok(())
}
