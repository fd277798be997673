// crates/ra_config/src/derivation.rs

//! DerivationConfig - 派生流程配置
//!
//! 定义输出子目录名、输出文件前缀、流量标签前缀、序列配对方式和栅格引擎。
//! 所有字段都有默认值，空 JSON 对象 `{}` 即为默认配置。

use ra_hydraulics::{PairingMode, StressKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// 派生流程配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationConfig {
    /// 水深/流速序列配对方式
    #[serde(default)]
    pub pairing: PairingMode,

    /// 水深文件名中的流量标签前缀
    #[serde(default = "default_depth_prefix")]
    pub depth_prefix: String,

    /// 流速文件名中的流量标签前缀（仅按标签配对时使用）
    #[serde(default = "default_velocity_prefix")]
    pub velocity_prefix: String,

    /// 工况输出目录后缀，输出目录为 `<base>/<name><suffix>`
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// 床面剪切应力输出
    #[serde(default = "default_shear_output")]
    pub shear: OutputNaming,

    /// Shields 应力输出
    #[serde(default = "default_shields_output")]
    pub shields: OutputNaming,

    /// 计算前检查输入栅格几何一致
    #[serde(default)]
    pub verify_geometry: bool,

    /// 栅格引擎
    #[serde(default)]
    pub engine: EngineKind,
}

/// 一类派生栅格的命名约定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputNaming {
    /// 工况输出目录下的子目录名
    pub folder_name: String,
    /// 输出文件名前缀
    pub file_prefix: String,
}

/// 栅格引擎选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// 纯 Rust GeoTIFF
    #[default]
    GeoTiff,
    /// GDAL（需 `gdal` feature）
    Gdal,
}

fn default_depth_prefix() -> String {
    "h".to_string()
}
fn default_velocity_prefix() -> String {
    "u".to_string()
}
fn default_output_suffix() -> String {
    "_outputs".to_string()
}
fn default_shear_output() -> OutputNaming {
    OutputNaming {
        folder_name: "shear rasters".to_string(),
        file_prefix: "tb".to_string(),
    }
}
fn default_shields_output() -> OutputNaming {
    OutputNaming {
        folder_name: "shield stress rasters".to_string(),
        file_prefix: "ts".to_string(),
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            pairing: PairingMode::default(),
            depth_prefix: default_depth_prefix(),
            velocity_prefix: default_velocity_prefix(),
            output_suffix: default_output_suffix(),
            shear: default_shear_output(),
            shields: default_shields_output(),
            verify_geometry: false,
            engine: EngineKind::default(),
        }
    }
}

impl DerivationConfig {
    /// 按类型取命名约定
    pub fn output(&self, kind: StressKind) -> &OutputNaming {
        match kind {
            StressKind::Shear => &self.shear,
            StressKind::Shields => &self.shields,
        }
    }

    /// 从 JSON 文件加载并校验
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存为 JSON 文件
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_prefix.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "depth_prefix",
                &self.depth_prefix,
                "不能包含路径分隔符",
            ));
        }
        for kind in StressKind::ALL {
            let naming = self.output(kind);
            let key = match kind {
                StressKind::Shear => "shear",
                StressKind::Shields => "shields",
            };
            check_component(&format!("{key}.folder_name"), &naming.folder_name)?;
            check_component(&format!("{key}.file_prefix"), &naming.file_prefix)?;
        }
        if self.shear.folder_name == self.shields.folder_name
            && self.shear.file_prefix == self.shields.file_prefix
        {
            return Err(ConfigError::invalid(
                "shields",
                &self.shields.file_prefix,
                "与剪切应力输出的目录和前缀完全相同，输出会互相覆盖",
            ));
        }
        Ok(())
    }
}

/// 文件名片段：非空且不含路径分隔符
fn check_component(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(key, value, "不能为空"));
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::invalid(key, value, "必须是单个文件名片段"));
    }
    Ok(())
}
