// crates/ra_config/src/lib.rs

//! River Architect Config Layer
//!
//! 配置层，提供派生流程的命名约定、配对方式与引擎选择。
//!
//! # 模块概览
//!
//! - [`derivation`]: `DerivationConfig` 派生流程配置（JSON）
//! - [`error`]: 配置错误类型

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod derivation;
pub mod error;

// 重导出核心类型
pub use derivation::{DerivationConfig, EngineKind, OutputNaming};
pub use error::ConfigError;
