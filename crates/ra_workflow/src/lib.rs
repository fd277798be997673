// crates/ra_workflow/src/lib.rs

//! River Architect 工作流模块
//!
//! 工况记录的持久化，以及从工况派生床面剪切应力 / Shields 应力栅格的完整流程。
//!
//! # 模块结构
//!
//! - [`condition`]: 工况定义与持久化记录格式
//! - [`storage`]: 工况记录存储 (内存 / JSON 文件)
//! - [`locks`]: 按工况名串行化的锁表
//! - [`pipeline`]: 应力派生流程
//!
//! # 示例
//!
//! ```rust,ignore
//! use ra_workflow::{Condition, ConditionStore, MemoryStore, StressPipeline};
//! use ra_raster::GeoTiffEngine;
//!
//! let store = MemoryStore::new();
//! store.create(
//!     &Condition::new("baseline", "SI")
//!         .with_depth_rasters(["in/h100.tif", "in/h200.tif"])
//!         .with_velocity_rasters(["in/u100.tif", "in/u200.tif"])
//!         .with_grain_size_raster("in/d50.tif")
//!         .with_output_root("out/baseline_outputs"),
//! )?;
//!
//! let pipeline = StressPipeline::new(store, GeoTiffEngine::new(), Default::default());
//! let shear = pipeline.compute_shear_stress("baseline")?;   // tb100.tif, tb200.tif
//! let shields = pipeline.compute_shields_stress("baseline")?; // ts100.tif, ts200.tif
//! ```

pub mod condition;
pub mod locks;
pub mod pipeline;
pub mod storage;

// 重导出核心类型
pub use condition::{join_paths, split_paths, Condition, ConditionExtras, ConditionInputs, ConditionRecord};
pub use locks::ConditionLocks;
pub use pipeline::{create_engine, StressPipeline};
pub use storage::{ConditionStore, FileStore, MemoryStore};
