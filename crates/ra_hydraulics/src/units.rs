// crates/ra_hydraulics/src/units.rs

//! 单位系统
//!
//! 根据工况的单位标签解析一组不可变物理常数。解析是纯函数，每次计算时
//! 从存储的标签重新解析，不使用任何全局可变状态。

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// 英尺到米
pub const FEET_TO_METERS: f64 = 0.3048;
/// 重力加速度 [m/s²]
pub const GRAVITY: f64 = 9.81;
/// 水的密度 (SI) [kg/m³]
pub const WATER_DENSITY_SI: f64 = 1000.0;
/// 水的密度 (美制) [slug/ft³]
pub const WATER_DENSITY_US: f64 = 1.937;
/// 泥沙比重
pub const SEDIMENT_SPECIFIC_GRAVITY: f64 = 2.68;
/// 糙率基准值
pub const ROUGHNESS_BASE: f64 = 0.0473934;
/// Manning 公式美制换算系数
pub const MANNING_US_FACTOR: f64 = 1.49;

/// 单位系统
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// 美制单位 (ft, slug)
    UsCustomary,
    /// 国际单位
    #[default]
    Si,
}

impl UnitSystem {
    /// 从标签解析
    ///
    /// 不区分大小写，标签中含有 `"us"` 即视为美制（如 "US Customary"、
    /// "U.S. customary"），其余一律为国际单位。
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("us") {
            Self::UsCustomary
        } else {
            Self::Si
        }
    }

    /// 规范标签
    pub fn label(self) -> &'static str {
        match self {
            Self::UsCustomary => "us customary",
            Self::Si => "si",
        }
    }

    /// 物理常数
    pub fn constants(self) -> UnitConstants {
        let (length_factor, fluid_density, roughness) = match self {
            Self::UsCustomary => (
                FEET_TO_METERS,
                WATER_DENSITY_US,
                ROUGHNESS_BASE / MANNING_US_FACTOR,
            ),
            Self::Si => (1.0, WATER_DENSITY_SI, ROUGHNESS_BASE),
        };
        UnitConstants {
            system: self,
            length_factor,
            fluid_density,
            roughness,
            gravity: GRAVITY / length_factor,
            specific_gravity: SEDIMENT_SPECIFIC_GRAVITY,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 单位相关的物理常数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConstants {
    /// 来源单位系统
    pub system: UnitSystem,
    /// 长度换算系数（英尺→米，SI 为 1）
    pub length_factor: f64,
    /// 流体密度 ρ
    pub fluid_density: f64,
    /// 糙率系数
    pub roughness: f64,
    /// 重力加速度 g（按长度单位换算）
    pub gravity: f64,
    /// 泥沙比重 s
    pub specific_gravity: f64,
}

impl UnitConstants {
    /// 单位体积泥沙的水下重量 ρ g (s - 1)
    #[inline]
    pub fn submerged_weight(&self) -> f64 {
        self.fluid_density * self.gravity * (self.specific_gravity - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_label_variants() {
        for label in ["us", "US Customary", "u.s. customary", "  Us  "] {
            assert_eq!(UnitSystem::from_label(label), UnitSystem::UsCustomary, "{label}");
        }
    }

    #[test]
    fn test_other_labels_are_si() {
        for label in ["si", "SI", "metric", ""] {
            assert_eq!(UnitSystem::from_label(label), UnitSystem::Si, "{label}");
        }
    }

    #[test]
    fn test_us_constants() {
        let c = UnitSystem::UsCustomary.constants();
        assert_eq!(c.length_factor, 0.3048);
        assert_eq!(c.fluid_density, 1.937);
        assert_eq!(c.gravity, 9.81 / 0.3048);
        assert_eq!(c.roughness, 0.0473934 / 1.49);
        assert_eq!(c.specific_gravity, 2.68);
    }

    #[test]
    fn test_si_constants() {
        let c = UnitSystem::Si.constants();
        assert_eq!(c.length_factor, 1.0);
        assert_eq!(c.fluid_density, 1000.0);
        assert_eq!(c.gravity, 9.81);
        assert_eq!(c.roughness, 0.0473934);
        assert!((c.submerged_weight() - 1000.0 * 9.81 * 1.68).abs() < 1e-9);
    }

    #[test]
    fn test_parse_and_display() {
        let unit: UnitSystem = "US".parse().unwrap();
        assert_eq!(unit.to_string(), "us customary");
        assert_eq!(UnitSystem::from_label(&unit.to_string()), unit);
        assert_eq!(UnitSystem::Si.to_string(), "si");
    }
}
