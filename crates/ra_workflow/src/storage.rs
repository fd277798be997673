// crates/ra_workflow/src/storage.rs

//! 存储后端模块
//!
//! 工况记录的持久化抽象与实现。实现者只需提供 `load`/`save`/`delete`/`list`，
//! 输出目录管理等契约操作由 trait 默认方法在其上构建。

use crate::condition::{Condition, ConditionInputs, ConditionRecord};
use parking_lot::RwLock;
use ra_foundation::{InputError, RaError, RaResult};
use ra_hydraulics::StressKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 工况存储 trait
pub trait ConditionStore: Send + Sync {
    /// 加载工况
    fn load(&self, name: &str) -> RaResult<Option<Condition>>;

    /// 保存工况（存在则覆盖）
    fn save(&self, condition: &Condition) -> RaResult<()>;

    /// 删除工况，返回是否存在
    fn delete(&self, name: &str) -> RaResult<bool>;

    /// 列出所有工况，按名称排序
    fn list(&self) -> RaResult<Vec<Condition>>;

    /// 检查工况是否存在
    fn contains(&self, name: &str) -> RaResult<bool> {
        Ok(self.load(name)?.is_some())
    }

    /// 工况数量
    fn count(&self) -> RaResult<usize> {
        Ok(self.list()?.len())
    }

    /// 新建工况，同名已存在时失败
    fn create(&self, condition: &Condition) -> RaResult<()> {
        if self.contains(&condition.name)? {
            return Err(RaError::duplicate(&condition.name));
        }
        self.save(condition)
    }

    /// 加载工况，不存在时返回 `NotFound`
    fn require(&self, name: &str) -> RaResult<Condition> {
        self.load(name)?.ok_or_else(|| RaError::not_found(name))
    }

    /// 派生计算所需的输入
    fn condition_inputs(&self, name: &str) -> RaResult<ConditionInputs> {
        Ok(self.require(name)?.inputs())
    }

    /// 工况输出目录，不存在时创建
    fn output_root(&self, name: &str) -> RaResult<PathBuf> {
        let condition = self.require(name)?;
        let root = condition
            .output_root
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| InputError::MissingOutputRoot {
                name: name.to_string(),
            })?;
        std::fs::create_dir_all(&root).map_err(|e| RaError::io_at(&root, e))?;
        Ok(root)
    }

    /// 输出子目录
    ///
    /// 已记录时直接复用（必要时重新创建目录）；否则在输出目录下创建
    /// `folder_name` 并写回工况。
    fn output_subfolder(&self, name: &str, kind: StressKind, folder_name: &str) -> RaResult<PathBuf> {
        let mut condition = self.require(name)?;
        if let Some(folder) = condition.output_folder(kind) {
            let folder = folder.to_path_buf();
            std::fs::create_dir_all(&folder).map_err(|e| RaError::io_at(&folder, e))?;
            return Ok(folder);
        }

        let folder = self.output_root(name)?.join(folder_name);
        std::fs::create_dir_all(&folder).map_err(|e| RaError::io_at(&folder, e))?;
        condition.set_output_folder(kind, folder.clone());
        self.save(&condition)?;
        debug!(condition = name, folder = %folder.display(), "创建{}输出目录", kind);
        Ok(folder)
    }

    /// 覆盖记录的输出栅格列表
    fn record_output_paths(&self, name: &str, kind: StressKind, paths: &[PathBuf]) -> RaResult<()> {
        let mut condition = self.require(name)?;
        condition.set_output_paths(kind, paths.to_vec());
        self.save(&condition)
    }

    /// 设置输出位置为 `<base>/<name><suffix>` 并创建目录
    fn set_output_location(&self, name: &str, base: &Path, suffix: &str) -> RaResult<PathBuf> {
        let mut condition = self.require(name)?;
        let root = base.join(format!("{name}{suffix}"));
        std::fs::create_dir_all(&root).map_err(|e| RaError::io_at(&root, e))?;
        condition.output_root = Some(root.clone());
        self.save(&condition)?;
        Ok(root)
    }
}

// ========================================================================
// 内存存储
// ========================================================================

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    conditions: RwLock<HashMap<String, Condition>>,
}

impl MemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前工况数量
    pub fn len(&self) -> usize {
        self.conditions.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.conditions.read().is_empty()
    }
}

impl ConditionStore for MemoryStore {
    fn load(&self, name: &str) -> RaResult<Option<Condition>> {
        Ok(self.conditions.read().get(name).cloned())
    }

    fn save(&self, condition: &Condition) -> RaResult<()> {
        self.conditions
            .write()
            .insert(condition.name.clone(), condition.clone());
        Ok(())
    }

    fn delete(&self, name: &str) -> RaResult<bool> {
        Ok(self.conditions.write().remove(name).is_some())
    }

    fn list(&self) -> RaResult<Vec<Condition>> {
        let mut all: Vec<_> = self.conditions.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    fn contains(&self, name: &str) -> RaResult<bool> {
        Ok(self.conditions.read().contains_key(name))
    }

    fn count(&self) -> RaResult<usize> {
        Ok(self.len())
    }
}

// ========================================================================
// 文件存储
// ========================================================================

/// 磁盘上的记录表
#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordTable {
    #[serde(default)]
    conditions: Vec<ConditionRecord>,
}

/// 文件存储
///
/// 所有工况保存在同一个 JSON 文件中，内存缓存一份；每次修改后整表原子重写。
#[derive(Debug)]
pub struct FileStore {
    /// 记录表文件
    path: PathBuf,
    /// 内存缓存
    cache: RwLock<BTreeMap<String, Condition>>,
}

impl FileStore {
    /// 打开记录表，文件不存在时从空表开始
    pub fn open(path: impl Into<PathBuf>) -> RaResult<Self> {
        let path = path.into();
        let mut cache = BTreeMap::new();

        if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|e| RaError::io_at(&path, e))?;
            if !text.trim().is_empty() {
                let table: RecordTable = serde_json::from_str(&text).map_err(|e| {
                    RaError::serialization(format!("{}: {}", path.display(), e))
                })?;
                for record in &table.conditions {
                    let condition = Condition::from_record(record);
                    cache.insert(condition.name.clone(), condition);
                }
            }
        }

        debug!(path = %path.display(), count = cache.len(), "打开工况记录表");
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// 记录表路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 整表写入临时文件后替换
    fn flush(&self, conditions: &BTreeMap<String, Condition>) -> RaResult<()> {
        let table = RecordTable {
            conditions: conditions.values().map(Condition::to_record).collect(),
        };
        let json = serde_json::to_string_pretty(&table)
            .map_err(|e| RaError::serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| RaError::io_at(&dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| RaError::io_at(&dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| RaError::io_at(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| RaError::io_at(&self.path, e.error))?;
        Ok(())
    }
}

impl ConditionStore for FileStore {
    fn load(&self, name: &str) -> RaResult<Option<Condition>> {
        Ok(self.cache.read().get(name).cloned())
    }

    fn save(&self, condition: &Condition) -> RaResult<()> {
        let mut cache = self.cache.write();
        let previous = cache.insert(condition.name.clone(), condition.clone());
        if let Err(err) = self.flush(&cache) {
            // 写盘失败时恢复缓存
            match previous {
                Some(prev) => cache.insert(condition.name.clone(), prev),
                None => cache.remove(&condition.name),
            };
            return Err(err);
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> RaResult<bool> {
        let mut cache = self.cache.write();
        let Some(previous) = cache.remove(name) else {
            return Ok(false);
        };
        if let Err(err) = self.flush(&cache) {
            cache.insert(name.to_string(), previous);
            return Err(err);
        }
        Ok(true)
    }

    fn list(&self) -> RaResult<Vec<Condition>> {
        Ok(self.cache.read().values().cloned().collect())
    }

    fn contains(&self, name: &str) -> RaResult<bool> {
        Ok(self.cache.read().contains_key(name))
    }

    fn count(&self) -> RaResult<usize> {
        Ok(self.cache.read().len())
    }
}
