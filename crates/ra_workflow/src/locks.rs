// crates/ra_workflow/src/locks.rs

//! 按工况名串行化的锁表
//!
//! 同一工况的两次派生会竞争输出目录的创建和最终的记录回写，
//! 因此每个工况名对应一把互斥锁。

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// 工况锁表
#[derive(Debug, Default)]
pub struct ConditionLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConditionLocks {
    /// 创建空锁表
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取工况对应的锁，同名总是返回同一把
    pub fn for_condition(&self, name: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 归还锁；没有其他持有者时从表中移除
    pub fn release(&self, name: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        drop(lock);
        if locks.get(name).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(name);
        }
    }

    /// 已登记的工况数量
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}
