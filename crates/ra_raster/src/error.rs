// crates/ra_raster/src/error.rs

//! 栅格错误类型
//!
//! 栅格引擎抛出的所有错误在跨层时统一包装为 `RaError::Engine`，保留原始错误链。

use ra_foundation::RaError;
use std::path::PathBuf;
use thiserror::Error;

/// 栅格模块结果类型别名
pub type RasterResult<T> = Result<T, RasterError>;

/// 栅格错误
#[derive(Debug, Error)]
pub enum RasterError {
    /// 文件不存在
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 解码失败
    #[error("Failed to decode raster {}: {message}", .path.display())]
    Decode {
        /// 栅格路径
        path: PathBuf,
        /// 解码器信息
        message: String,
    },

    /// 编码失败
    #[error("Failed to encode raster {}: {message}", .path.display())]
    Encode {
        /// 栅格路径
        path: PathBuf,
        /// 编码器信息
        message: String,
    },

    /// 不支持的像元类型
    #[error("Unsupported sample format in {}: {format}", .path.display())]
    UnsupportedSampleFormat {
        /// 栅格路径
        path: PathBuf,
        /// 像元类型描述
        format: String,
    },

    /// 网格形状不一致
    #[error("Grid shape mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    ShapeMismatch {
        /// 期望 (宽, 高)
        expected: (usize, usize),
        /// 实际 (宽, 高)
        actual: (usize, usize),
    },

    /// 数据长度与网格大小不符
    #[error("Raster data size mismatch: expected {expected} cells, got {actual}")]
    SizeMismatch {
        /// 期望像元数
        expected: usize,
        /// 实际像元数
        actual: usize,
    },

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// GDAL 不可用
    #[error("GDAL is not available (build with the `gdal` feature)")]
    NotAvailable,

    /// GDAL 错误
    #[error("GDAL error: {0}")]
    Gdal(String),
}

impl RasterError {
    /// 解码失败
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// 编码失败
    pub fn encode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for RasterError {
    fn from(e: gdal::errors::GdalError) -> Self {
        RasterError::Gdal(e.to_string())
    }
}

impl From<RasterError> for RaError {
    fn from(err: RasterError) -> Self {
        RaError::engine(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = RasterError::ShapeMismatch {
            expected: (4, 3),
            actual: (2, 2),
        };
        assert_eq!(err.to_string(), "Grid shape mismatch: expected 4x3, got 2x2");
    }

    #[test]
    fn test_into_engine_error() {
        let err: RaError = RasterError::NotAvailable.into();
        assert!(matches!(err, RaError::Engine(_)));
        assert!(err.to_string().contains("GDAL"));
    }
}
