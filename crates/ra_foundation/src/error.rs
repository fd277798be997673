// crates/ra_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `RaError` 枚举和 `RaResult` 类型别名，用于整个项目的错误处理。
//!
//! # 错误分类
//!
//! 1. **NotFound**: 记录库中不存在该工况
//! 2. **Input**: 用户可修正的输入问题，消息列出所有出错项而非仅第一项
//! 3. **Io**: 创建目录或写出栅格时的文件系统错误
//! 4. **Engine**: 底层栅格引擎抛出的错误，原样传递
//!
//! # 示例
//!
//! ```
//! use ra_foundation::error::{RaError, RaResult};
//!
//! fn load(name: &str) -> RaResult<()> {
//!     Err(RaError::not_found(name))
//! }
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 统一结果类型
pub type RaResult<T> = Result<T, RaError>;

/// River Architect 错误类型
#[derive(Error, Debug)]
pub enum RaError {
    /// 工况不存在
    #[error("工况不存在: {name}")]
    NotFound {
        /// 工况名称
        name: String,
    },

    /// 工况已存在
    #[error("工况已存在: {name}")]
    Duplicate {
        /// 工况名称
        name: String,
    },

    /// 输入数据错误
    #[error(transparent)]
    Input(#[from] InputError),

    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 栅格引擎错误
    #[error("栅格引擎错误: {0}")]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },
}

/// 输入校验错误
///
/// 所有变体都可以由用户修正，计算开始前抛出。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// 水深或流速序列为空
    #[error("水深与流速栅格序列均不能为空 (水深 {depth} 个, 流速 {velocity} 个)")]
    EmptySeries {
        /// 水深栅格数量
        depth: usize,
        /// 流速栅格数量
        velocity: usize,
    },

    /// 序列长度不一致
    #[error("水深/流速栅格数量不一致 ({depth} vs {velocity})，两组序列必须一一对应")]
    LengthMismatch {
        /// 水深栅格数量
        depth: usize,
        /// 流速栅格数量
        velocity: usize,
    },

    /// 未指定粒径栅格
    #[error("缺少粒径栅格，该计算需要粒径栅格")]
    MissingGrainRaster,

    /// 粒径栅格文件不存在
    #[error("粒径栅格不存在: {}", .path.display())]
    GrainRasterNotFound {
        /// 粒径栅格路径
        path: PathBuf,
    },

    /// 水深或流速栅格文件缺失
    #[error("缺失栅格文件: {}", describe_missing(.depth, .velocity))]
    MissingRasters {
        /// 缺失的水深栅格
        depth: Vec<PathBuf>,
        /// 缺失的流速栅格
        velocity: Vec<PathBuf>,
    },

    /// 工况未设置输出目录
    #[error("工况 '{name}' 未设置输出目录，请先指定输出位置")]
    MissingOutputRoot {
        /// 工况名称
        name: String,
    },

    /// 按流量标签配对失败
    #[error("流量标签无法配对: {}", describe_tags(.depth_only, .velocity_only, .duplicates))]
    UnmatchedTags {
        /// 仅出现在水深序列中的标签
        depth_only: Vec<String>,
        /// 仅出现在流速序列中的标签
        velocity_only: Vec<String>,
        /// 同一序列中重复出现的标签
        duplicates: Vec<String>,
    },

    /// 多个流量步渲染出同一个输出文件名
    #[error("流量标签重复，输出文件会互相覆盖: {}", .tags.join(", "))]
    DuplicateTags {
        /// 重复的标签
        tags: Vec<String>,
    },

    /// 栅格几何不一致
    #[error("栅格几何不一致: {} 与 {}: {reason}", .reference.display(), .other.display())]
    GridMismatch {
        /// 参考栅格
        reference: PathBuf,
        /// 不一致的栅格
        other: PathBuf,
        /// 不一致原因
        reason: String,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_missing(depth: &[PathBuf], velocity: &[PathBuf]) -> String {
    let mut out = String::new();
    if !depth.is_empty() {
        let _ = write!(out, "水深栅格 [{}]", join_paths(depth));
    }
    if !velocity.is_empty() {
        if !out.is_empty() {
            out.push_str("; ");
        }
        let _ = write!(out, "流速栅格 [{}]", join_paths(velocity));
    }
    out
}

fn describe_tags(depth_only: &[String], velocity_only: &[String], duplicates: &[String]) -> String {
    let mut parts = Vec::new();
    if !depth_only.is_empty() {
        parts.push(format!("仅水深 [{}]", depth_only.join(", ")));
    }
    if !velocity_only.is_empty() {
        parts.push(format!("仅流速 [{}]", velocity_only.join(", ")));
    }
    if !duplicates.is_empty() {
        parts.push(format!("重复 [{}]", duplicates.join(", ")));
    }
    parts.join("; ")
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl RaError {
    /// 工况不存在
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// 工况已存在
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::Duplicate { name: name.into() }
    }

    /// IO 错误（带源），消息中附带出错路径
    pub fn io_at(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), source),
            source: Some(source),
        }
    }

    /// 包装栅格引擎错误
    pub fn engine<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Engine(Box::new(err))
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 返回内部的输入错误
    pub fn as_input(&self) -> Option<&InputError> {
        match self {
            Self::Input(err) => Some(err),
            _ => None,
        }
    }
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for RaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

// ========================================================================
// 测试
// ========================================================================
