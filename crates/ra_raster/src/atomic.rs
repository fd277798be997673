// crates/ra_raster/src/atomic.rs

//! 原子写出
//!
//! 先在目标目录写临时文件，成功后重命名到确定路径，目标路径上不会出现写了一半的文件。

use crate::error::{RasterError, RasterResult};
use std::path::Path;

/// 临时文件前缀
const TEMP_PREFIX: &str = ".ra-partial-";

/// 通过 `write` 写出临时文件后原子替换 `target`
///
/// `write` 接收临时文件路径，可以自行创建/覆盖该文件。失败时临时文件被删除，
/// `target` 保持原状。
pub fn persist_atomic<F>(target: &Path, write: F) -> RasterResult<()>
where
    F: FnOnce(&Path) -> RasterResult<()>,
{
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&suffix)
        .tempfile_in(dir)?
        .into_temp_path();

    write(&temp)?;

    temp.persist(target)
        .map_err(|e| RasterError::Io(e.error))?;
    tracing::trace!(target = %target.display(), "栅格已写出");
    Ok(())
}
