// crates/ra_hydraulics/src/lib.rs

//! River Architect 水力计算模块
//!
//! 从水深、流速和粒径栅格推导床面剪切应力与无量纲 Shields 应力。
//!
//! # 模块
//!
//! - [`units`]: 单位系统与物理常数
//! - [`discharge`]: 流量标签提取/渲染与序列配对
//! - [`validation`]: 计算前的输入校验
//! - [`stress`]: 剪切流速、床面剪切应力与 Shields 应力
//!
//! # 示例
//!
//! ```
//! use ra_hydraulics::stress::{bed_shear_stress, shear_velocity, shields_stress};
//! use ra_hydraulics::units::UnitSystem;
//!
//! let c = UnitSystem::from_label("SI").constants();
//! let u_star = shear_velocity(2.0, 1.0, 0.05);
//! let tau = bed_shear_stress(u_star, &c);
//! let theta = shields_stress(tau, 0.05, &c);
//! assert!(theta > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod discharge;
pub mod stress;
pub mod units;
pub mod validation;

// 重导出常用类型
pub use discharge::{
    extract_discharge_tag, pair_steps, render_discharge_tag, DischargeStep, DischargeValue,
    PairingMode,
};
pub use stress::StressKind;
pub use units::{UnitConstants, UnitSystem};
pub use validation::{validate_inputs, verify_geometry};
