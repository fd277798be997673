// crates/ra_workflow/src/condition.rs

//! 工况定义
//!
//! `Condition` 是内存中的工况视图；`ConditionRecord` 是持久化时的扁平文本格式，
//! 路径序列以 `;` 连接。

use ra_hydraulics::{StressKind, UnitSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 路径序列分隔符
pub const PATH_SEPARATOR: char = ';';

/// 拆分 `;` 连接的路径，去掉首尾空白和空项
pub fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// 以 `;` 连接路径
pub fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join(";")
}

/// 派生计算不使用、但随工况保存的附加输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionExtras {
    /// 数字高程模型
    pub digital_elevation_model: Option<PathBuf>,
    /// 水面高程目录
    pub wse_folder: Option<PathBuf>,
    /// 流速方向目录
    pub velocity_angle_folder: Option<PathBuf>,
    /// 冲刷栅格
    pub scour_raster: Option<PathBuf>,
    /// 淤积栅格
    pub fill_raster: Option<PathBuf>,
    /// 背景栅格
    pub background_raster: Option<PathBuf>,
}

/// 工况
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// 工况名称（唯一）
    pub name: String,
    /// 单位标签
    pub unit: String,
    /// 水深栅格序列
    pub depth_rasters: Vec<PathBuf>,
    /// 流速栅格序列
    pub velocity_rasters: Vec<PathBuf>,
    /// 粒径栅格，可能为空路径
    pub grain_size_raster: PathBuf,
    /// 工况输出目录
    pub output_root: Option<PathBuf>,
    /// 剪切应力输出子目录
    pub shear_output_folder: Option<PathBuf>,
    /// Shields 应力输出子目录
    pub shield_output_folder: Option<PathBuf>,
    /// 最近一次生成的剪切应力栅格
    pub shear_output_paths: Vec<PathBuf>,
    /// 最近一次生成的 Shields 应力栅格
    pub shield_output_paths: Vec<PathBuf>,
    /// 附加输入
    pub extras: ConditionExtras,
}

/// 派生计算所需的工况输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionInputs {
    /// 水深栅格序列
    pub depth_paths: Vec<PathBuf>,
    /// 流速栅格序列
    pub velocity_paths: Vec<PathBuf>,
    /// 粒径栅格
    pub grain_path: PathBuf,
    /// 单位标签
    pub unit_label: String,
}

impl ConditionInputs {
    /// 解析单位系统
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem::from_label(&self.unit_label)
    }
}

impl Condition {
    /// 创建空工况
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            depth_rasters: Vec::new(),
            velocity_rasters: Vec::new(),
            grain_size_raster: PathBuf::new(),
            output_root: None,
            shear_output_folder: None,
            shield_output_folder: None,
            shear_output_paths: Vec::new(),
            shield_output_paths: Vec::new(),
            extras: ConditionExtras::default(),
        }
    }

    /// 设置水深栅格序列
    pub fn with_depth_rasters<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.depth_rasters = paths.into_iter().map(Into::into).collect();
        self
    }

    /// 设置流速栅格序列
    pub fn with_velocity_rasters<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.velocity_rasters = paths.into_iter().map(Into::into).collect();
        self
    }

    /// 设置粒径栅格
    pub fn with_grain_size_raster(mut self, path: impl Into<PathBuf>) -> Self {
        self.grain_size_raster = path.into();
        self
    }

    /// 设置输出目录
    pub fn with_output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = Some(path.into());
        self
    }

    /// 设置附加输入
    pub fn with_extras(mut self, extras: ConditionExtras) -> Self {
        self.extras = extras;
        self
    }

    /// 单位系统
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem::from_label(&self.unit)
    }

    /// 派生计算所需的输入
    pub fn inputs(&self) -> ConditionInputs {
        ConditionInputs {
            depth_paths: self.depth_rasters.clone(),
            velocity_paths: self.velocity_rasters.clone(),
            grain_path: self.grain_size_raster.clone(),
            unit_label: self.unit.clone(),
        }
    }

    /// 输出子目录
    pub fn output_folder(&self, kind: StressKind) -> Option<&Path> {
        match kind {
            StressKind::Shear => self.shear_output_folder.as_deref(),
            StressKind::Shields => self.shield_output_folder.as_deref(),
        }
    }

    /// 设置输出子目录
    pub fn set_output_folder(&mut self, kind: StressKind, folder: PathBuf) {
        match kind {
            StressKind::Shear => self.shear_output_folder = Some(folder),
            StressKind::Shields => self.shield_output_folder = Some(folder),
        }
    }

    /// 已生成的输出栅格
    pub fn output_paths(&self, kind: StressKind) -> &[PathBuf] {
        match kind {
            StressKind::Shear => &self.shear_output_paths,
            StressKind::Shields => &self.shield_output_paths,
        }
    }

    /// 覆盖已生成的输出栅格列表
    pub fn set_output_paths(&mut self, kind: StressKind, paths: Vec<PathBuf>) {
        match kind {
            StressKind::Shear => self.shear_output_paths = paths,
            StressKind::Shields => self.shield_output_paths = paths,
        }
    }

    /// 转换为持久化记录
    pub fn to_record(&self) -> ConditionRecord {
        let opt = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        ConditionRecord {
            name: self.name.clone(),
            unit: self.unit.clone(),
            depth_rasters: join_paths(&self.depth_rasters),
            velocity_rasters: join_paths(&self.velocity_rasters),
            grain_size_raster: self.grain_size_raster.to_string_lossy().into_owned(),
            output_root: opt(&self.output_root),
            shear_output_folder: opt(&self.shear_output_folder),
            shield_output_folder: opt(&self.shield_output_folder),
            shear_output_paths: join_paths(&self.shear_output_paths),
            shield_output_paths: join_paths(&self.shield_output_paths),
            digital_elevation_model: opt(&self.extras.digital_elevation_model),
            wse_folder: opt(&self.extras.wse_folder),
            velocity_angle_folder: opt(&self.extras.velocity_angle_folder),
            scour_raster: opt(&self.extras.scour_raster),
            fill_raster: opt(&self.extras.fill_raster),
            background_raster: opt(&self.extras.background_raster),
        }
    }

    /// 从持久化记录恢复
    pub fn from_record(record: &ConditionRecord) -> Self {
        let opt = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| PathBuf::from(s))
        };
        Self {
            name: record.name.clone(),
            unit: record.unit.clone(),
            depth_rasters: split_paths(&record.depth_rasters),
            velocity_rasters: split_paths(&record.velocity_rasters),
            grain_size_raster: PathBuf::from(record.grain_size_raster.trim()),
            output_root: opt(&record.output_root),
            shear_output_folder: opt(&record.shear_output_folder),
            shield_output_folder: opt(&record.shield_output_folder),
            shear_output_paths: split_paths(&record.shear_output_paths),
            shield_output_paths: split_paths(&record.shield_output_paths),
            extras: ConditionExtras {
                digital_elevation_model: opt(&record.digital_elevation_model),
                wse_folder: opt(&record.wse_folder),
                velocity_angle_folder: opt(&record.velocity_angle_folder),
                scour_raster: opt(&record.scour_raster),
                fill_raster: opt(&record.fill_raster),
                background_raster: opt(&record.background_raster),
            },
        }
    }
}

/// 持久化工况记录
///
/// 所有字段均为文本，缺省为空串。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionRecord {
    /// 工况名称，主键
    pub name: String,
    /// 单位标签
    pub unit: String,
    /// 水深栅格，`;` 连接
    pub depth_rasters: String,
    /// 流速栅格，`;` 连接
    pub velocity_rasters: String,
    /// 粒径栅格
    pub grain_size_raster: String,
    /// 工况输出目录
    pub output_root: String,
    /// 剪切应力输出子目录
    pub shear_output_folder: String,
    /// Shields 应力输出子目录
    pub shield_output_folder: String,
    /// 剪切应力输出栅格，`;` 连接
    pub shear_output_paths: String,
    /// Shields 应力输出栅格，`;` 连接
    pub shield_output_paths: String,
    /// 数字高程模型
    pub digital_elevation_model: String,
    /// 水面高程目录
    pub wse_folder: String,
    /// 流速方向目录
    pub velocity_angle_folder: String,
    /// 冲刷栅格
    pub scour_raster: String,
    /// 淤积栅格
    pub fill_raster: String,
    /// 背景栅格
    pub background_raster: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paths_drops_blanks() {
        let paths = split_paths(" in/h100.tif ;; ;in/h200.tif;");
        assert_eq!(paths, vec![PathBuf::from("in/h100.tif"), PathBuf::from("in/h200.tif")]);
        assert!(split_paths("").is_empty());
    }

    #[test]
    fn test_join_paths() {
        let joined = join_paths(&[PathBuf::from("a/tb1.tif"), PathBuf::from("a/tb2.tif")]);
        assert_eq!(joined, "a/tb1.tif;a/tb2.tif");
    }

    #[test]
    fn test_record_round_trip() {
        let mut condition = Condition::new("baseline", "US Customary")
            .with_depth_rasters(["in/h100.tif", "in/h200.tif"])
            .with_velocity_rasters(["in/u100.tif", "in/u200.tif"])
            .with_grain_size_raster("in/d50.tif")
            .with_output_root("out/baseline_outputs")
            .with_extras(ConditionExtras {
                digital_elevation_model: Some("in/dem.tif".into()),
                ..Default::default()
            });
        condition.set_output_folder(StressKind::Shear, "out/baseline_outputs/shear rasters".into());
        condition.set_output_paths(StressKind::Shear, vec!["out/tb100.tif".into()]);

        let record = condition.to_record();
        assert_eq!(record.depth_rasters, "in/h100.tif;in/h200.tif");
        assert_eq!(record.shield_output_folder, "");
        assert_eq!(Condition::from_record(&record), condition);
    }

    #[test]
    fn test_record_missing_fields_default() {
        let record: ConditionRecord =
            serde_json::from_str(r#"{"name": "legacy", "unit": "si"}"#).unwrap();
        let condition = Condition::from_record(&record);
        assert!(condition.depth_rasters.is_empty());
        assert_eq!(condition.output_root, None);
        assert_eq!(condition.grain_size_raster, PathBuf::new());
        assert_eq!(condition.unit_system(), UnitSystem::Si);
    }

    #[test]
    fn test_output_accessors() {
        let mut condition = Condition::new("c", "si");
        assert_eq!(condition.output_folder(StressKind::Shields), None);
        condition.set_output_folder(StressKind::Shields, "x".into());
        assert_eq!(condition.output_folder(StressKind::Shields), Some(Path::new("x")));
        assert!(condition.output_paths(StressKind::Shear).is_empty());
    }
}
