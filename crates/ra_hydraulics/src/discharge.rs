// crates/ra_hydraulics/src/discharge.rs

//! 流量序列
//!
//! 从栅格文件名提取流量标签（如 `h100.tif` → `"100"`），将标签渲染回输出文件名，
//! 并把水深序列与流速序列配对为流量步。

use ra_foundation::InputError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// 从文件名提取流量标签
///
/// 去掉目录和扩展名后，若文件名以 `prefix` 开头则去掉前缀；否则原样返回文件名。
///
/// ```
/// use ra_hydraulics::discharge::extract_discharge_tag;
///
/// assert_eq!(extract_discharge_tag("h100.tif", "h"), "100");
/// assert_eq!(extract_discharge_tag("h050.asc", "h"), "050");
/// assert_eq!(extract_discharge_tag("depth_20.tif", "h"), "depth_20");
/// ```
pub fn extract_discharge_tag(file_name: impl AsRef<Path>, prefix: &str) -> String {
    let stem = file_name
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_prefix(prefix) {
        Some(rest) => rest.to_string(),
        None => stem,
    }
}

/// 流量值，文本或数值
#[derive(Debug, Clone, PartialEq)]
pub enum DischargeValue {
    /// 文本标签，保留前导零
    Text(String),
    /// 数值
    Number(f64),
}

impl From<&str> for DischargeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DischargeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for DischargeValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<f64> for DischargeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for DischargeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// 将流量值渲染为输出文件名片段
///
/// 文本去掉首尾空白；整数值的数值不带小数点；其余数值使用自然字符串形式。
///
/// ```
/// use ra_hydraulics::discharge::render_discharge_tag;
///
/// assert_eq!(render_discharge_tag(100.0), "100");
/// assert_eq!(render_discharge_tag(2.5), "2.5");
/// assert_eq!(render_discharge_tag(" 050 "), "050");
/// ```
pub fn render_discharge_tag(value: impl Into<DischargeValue>) -> String {
    match value.into() {
        DischargeValue::Text(text) => text.trim().to_string(),
        // `+ 0.0` 把 -0.0 规整为 0.0
        DischargeValue::Number(n) if n.is_finite() && n.fract() == 0.0 => format!("{:.0}", n + 0.0),
        DischargeValue::Number(n) => n.to_string(),
    }
}

/// 水深/流速序列配对方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// 按列表位置配对，调用方需保证两组序列顺序一致
    #[default]
    Positional,
    /// 按提取出的流量标签配对，任一侧多出的标签都会报错
    ByTag,
}

/// 流量步：一对水深/流速栅格及其流量标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DischargeStep {
    /// 流量标签（来自水深文件名）
    pub tag: String,
    /// 水深栅格
    pub depth: PathBuf,
    /// 流速栅格
    pub velocity: PathBuf,
}

impl DischargeStep {
    /// 输出文件名，如 `tb100.tif`
    pub fn output_file_name(&self, prefix: &str) -> String {
        format!("{prefix}{}.tif", render_discharge_tag(&self.tag))
    }
}

/// 把水深序列与流速序列配对为流量步
///
/// 输出顺序与水深序列一致，标签始终取自水深文件名。
pub fn pair_steps(
    depth: &[PathBuf],
    velocity: &[PathBuf],
    mode: PairingMode,
    depth_prefix: &str,
    velocity_prefix: &str,
) -> Result<Vec<DischargeStep>, InputError> {
    match mode {
        PairingMode::Positional => {
            if depth.len() != velocity.len() {
                return Err(InputError::LengthMismatch {
                    depth: depth.len(),
                    velocity: velocity.len(),
                });
            }
            Ok(depth
                .iter()
                .zip(velocity)
                .map(|(d, v)| DischargeStep {
                    tag: extract_discharge_tag(d, depth_prefix),
                    depth: d.clone(),
                    velocity: v.clone(),
                })
                .collect())
        }
        PairingMode::ByTag => pair_by_tag(depth, velocity, depth_prefix, velocity_prefix),
    }
}

fn pair_by_tag(
    depth: &[PathBuf],
    velocity: &[PathBuf],
    depth_prefix: &str,
    velocity_prefix: &str,
) -> Result<Vec<DischargeStep>, InputError> {
    let mut duplicates = BTreeSet::new();

    let mut velocity_by_tag: HashMap<String, &PathBuf> = HashMap::with_capacity(velocity.len());
    for v in velocity {
        let tag = extract_discharge_tag(v, velocity_prefix);
        if velocity_by_tag.insert(tag.clone(), v).is_some() {
            duplicates.insert(tag);
        }
    }

    let mut seen = BTreeSet::new();
    let mut depth_only = Vec::new();
    let mut steps = Vec::with_capacity(depth.len());
    for d in depth {
        let tag = extract_discharge_tag(d, depth_prefix);
        if !seen.insert(tag.clone()) {
            duplicates.insert(tag);
            continue;
        }
        match velocity_by_tag.get(&tag) {
            Some(v) => steps.push(DischargeStep {
                tag,
                depth: d.clone(),
                velocity: (*v).clone(),
            }),
            None => depth_only.push(tag),
        }
    }

    let mut velocity_only: Vec<String> = velocity_by_tag
        .into_keys()
        .filter(|tag| !seen.contains(tag))
        .collect();
    velocity_only.sort();

    if !depth_only.is_empty() || !velocity_only.is_empty() || !duplicates.is_empty() {
        return Err(InputError::UnmatchedTags {
            depth_only,
            velocity_only,
            duplicates: duplicates.into_iter().collect(),
        });
    }
    Ok(steps)
}
