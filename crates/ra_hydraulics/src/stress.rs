// crates/ra_hydraulics/src/stress.rs

//! 床面剪切应力与 Shields 应力
//!
//! 对数流速分布（Keulegan 公式）推导剪切流速：
//!
//! ```text
//! u*  = v / (5.75 · log10(12.2 · h / (4.4 · D)))
//! τb  = ρ · u*²
//! θ   = τb / (ρ · g · (s - 1) · D)
//! ```
//!
//! 其中 h 为水深，v 为流速，D 为粒径，等效糙率高度取 2 × 2.2 D。
//! 网格版本逐像元计算，默认三张网格几何一致，尺寸不同时返回引擎错误。

use crate::units::UnitConstants;
use ra_raster::{Grid, RasterResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 对数律系数 2.3/κ
pub const LOG_LAW_COEFFICIENT: f64 = 5.75;
/// 水深系数
pub const DEPTH_COEFFICIENT: f64 = 12.2;
/// 等效糙率高度与粒径之比 (2 × 2.2)
pub const GRAIN_ROUGHNESS_RATIO: f64 = 2.0 * 2.2;

/// 派生栅格类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressKind {
    /// 床面剪切应力 τb
    Shear,
    /// 无量纲 Shields 应力 θ
    Shields,
}

impl StressKind {
    /// 所有类型
    pub const ALL: [StressKind; 2] = [StressKind::Shear, StressKind::Shields];

    /// 显示名称
    pub fn label(self) -> &'static str {
        match self {
            Self::Shear => "bed shear stress",
            Self::Shields => "Shields stress",
        }
    }
}

impl fmt::Display for StressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 剪切流速 u*
#[inline]
pub fn shear_velocity(depth: f64, velocity: f64, grain: f64) -> f64 {
    velocity
        / (LOG_LAW_COEFFICIENT
            * (DEPTH_COEFFICIENT * depth / (GRAIN_ROUGHNESS_RATIO * grain)).log10())
}

/// 床面剪切应力 τb = ρ u*²
#[inline]
pub fn bed_shear_stress(shear_velocity: f64, constants: &UnitConstants) -> f64 {
    constants.fluid_density * shear_velocity.powi(2)
}

/// Shields 应力 θ = τb / (ρ g (s-1) D)
#[inline]
pub fn shields_stress(bed_shear_stress: f64, grain: f64, constants: &UnitConstants) -> f64 {
    bed_shear_stress / (constants.submerged_weight() * grain)
}

/// 剪切流速网格，输出继承水深网格的元数据
///
/// 对数项非有限（干单元 h = 0）时像元记为无数据。
pub fn shear_velocity_grid(depth: &Grid, velocity: &Grid, grain: &Grid) -> RasterResult<Grid> {
    depth.zip3_with(velocity, grain, |h, v, d| {
        let log_term = (DEPTH_COEFFICIENT * h / (GRAIN_ROUGHNESS_RATIO * d)).log10();
        if log_term.is_finite() {
            v / (LOG_LAW_COEFFICIENT * log_term)
        } else {
            f64::NAN
        }
    })
}

/// 床面剪切应力网格
pub fn bed_shear_stress_grid(
    depth: &Grid,
    velocity: &Grid,
    grain: &Grid,
    constants: &UnitConstants,
) -> RasterResult<Grid> {
    let u_star = shear_velocity_grid(depth, velocity, grain)?;
    let constants = *constants;
    Ok(u_star.map(move |u| bed_shear_stress(u, &constants)))
}

/// Shields 应力网格，复用床面剪切应力步骤
pub fn shields_stress_grid(
    depth: &Grid,
    velocity: &Grid,
    grain: &Grid,
    constants: &UnitConstants,
) -> RasterResult<Grid> {
    let tau = bed_shear_stress_grid(depth, velocity, grain, constants)?;
    let constants = *constants;
    tau.zip_with(grain, move |t, d| shields_stress(t, d, &constants))
}

/// 按类型计算派生网格
pub fn stress_grid(
    kind: StressKind,
    depth: &Grid,
    velocity: &Grid,
    grain: &Grid,
    constants: &UnitConstants,
) -> RasterResult<Grid> {
    match kind {
        StressKind::Shear => bed_shear_stress_grid(depth, velocity, grain, constants),
        StressKind::Shields => shields_stress_grid(depth, velocity, grain, constants),
    }
}
