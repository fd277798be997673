// apps/ra_cli/src/commands/mod.rs

//! 命令实现模块

pub mod compute;
pub mod condition;

use anyhow::{Context as _, Result};
use ra_config::DerivationConfig;
use ra_workflow::FileStore;
use std::path::PathBuf;
use tracing::debug;

/// 命令共享的运行环境
pub struct Context {
    /// 工况记录表文件
    pub store_path: PathBuf,
    /// 派生配置
    pub config: DerivationConfig,
}

impl Context {
    /// 加载配置；未指定配置文件时使用默认值
    pub fn new(store_path: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => DerivationConfig::from_json_file(&path)
                .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
            None => DerivationConfig::default(),
        };
        debug!(store = %store_path.display(), ?config, "运行环境就绪");
        Ok(Self { store_path, config })
    }

    /// 打开工况记录表
    pub fn open_store(&self) -> Result<FileStore> {
        FileStore::open(&self.store_path)
            .with_context(|| format!("无法打开工况记录表: {}", self.store_path.display()))
    }
}
