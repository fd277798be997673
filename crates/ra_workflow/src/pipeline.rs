// crates/ra_workflow/src/pipeline.rs

//! 应力派生流程
//!
//! 对一个工况的每个流量步计算床面剪切应力或 Shields 应力并写出栅格。
//!
//! 执行顺序：
//! 1. 读取工况输入并解析单位常数
//! 2. 校验输入（任何写出之前完成）
//! 3. 配对流量步，检查输出文件名不重复，可选的几何一致性检查
//! 4. 创建或复用输出子目录
//! 5. 逐流量步计算并原子写出 `<prefix><tag>.tif`
//! 6. 回写输出栅格列表
//!
//! 中途失败时已写出的栅格保留在磁盘上，记录不更新。

use crate::locks::ConditionLocks;
use crate::storage::ConditionStore;
use ra_config::{DerivationConfig, EngineKind};
use ra_foundation::{InputError, RaResult};
use ra_hydraulics::{pair_steps, stress, validate_inputs, verify_geometry, DischargeStep, StressKind};
use ra_raster::{GdalEngine, GeoTiffEngine, RasterEngine};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// 输出栅格的无数据值
pub const OUTPUT_NODATA: f64 = -9999.0;

/// 按配置创建栅格引擎
pub fn create_engine(kind: EngineKind) -> RaResult<Box<dyn RasterEngine>> {
    let engine: Box<dyn RasterEngine> = match kind {
        EngineKind::GeoTiff => Box::new(GeoTiffEngine::new()),
        EngineKind::Gdal => Box::new(GdalEngine::new()?),
    };
    debug!(engine = engine.name(), "栅格引擎就绪");
    Ok(engine)
}

/// 应力派生流程
pub struct StressPipeline<S, E> {
    store: S,
    engine: E,
    config: DerivationConfig,
    locks: ConditionLocks,
}

impl<S, E> StressPipeline<S, E>
where
    S: ConditionStore,
    E: RasterEngine,
{
    /// 创建流程
    pub fn new(store: S, engine: E, config: DerivationConfig) -> Self {
        Self {
            store,
            engine,
            config,
            locks: ConditionLocks::new(),
        }
    }

    /// 工况存储
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 栅格引擎
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// 派生配置
    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    /// 计算床面剪切应力栅格，返回按流量步顺序的输出路径
    pub fn compute_shear_stress(&self, name: &str) -> RaResult<Vec<PathBuf>> {
        self.derive(name, StressKind::Shear)
    }

    /// 计算 Shields 应力栅格，返回按流量步顺序的输出路径
    pub fn compute_shields_stress(&self, name: &str) -> RaResult<Vec<PathBuf>> {
        self.derive(name, StressKind::Shields)
    }

    /// 按类型派生，同一工况的调用串行执行
    pub fn derive(&self, name: &str, kind: StressKind) -> RaResult<Vec<PathBuf>> {
        let lock = self.locks.for_condition(name);
        let result = {
            let _guard = lock.lock();
            self.derive_locked(name, kind)
        };
        self.locks.release(name, lock);
        result
    }

    fn derive_locked(&self, name: &str, kind: StressKind) -> RaResult<Vec<PathBuf>> {
        let start = Instant::now();

        let inputs = self.store.condition_inputs(name)?;
        let constants = inputs.unit_system().constants();
        let naming = self.config.output(kind);

        validate_inputs(&inputs.depth_paths, &inputs.velocity_paths, &inputs.grain_path)?;
        let steps = pair_steps(
            &inputs.depth_paths,
            &inputs.velocity_paths,
            self.config.pairing,
            &self.config.depth_prefix,
            &self.config.velocity_prefix,
        )?;
        check_unique_outputs(&steps, &naming.file_prefix)?;
        if self.config.verify_geometry {
            verify_geometry(&self.engine, &steps, &inputs.grain_path)?;
        }

        let folder = self
            .store
            .output_subfolder(name, kind, &naming.folder_name)?;
        info!(
            condition = name,
            kind = %kind,
            units = %constants.system,
            steps = steps.len(),
            folder = %folder.display(),
            "开始派生"
        );

        let grain = self.engine.load(&inputs.grain_path)?;
        let mut outputs = Vec::with_capacity(steps.len());
        for step in &steps {
            // 输出继承水深网格的元数据，先去掉其 nodata 定义
            let depth = self.engine.load(&step.depth)?.nodata_to_nan();
            let velocity = self.engine.load(&step.velocity)?;
            let grid = stress::stress_grid(kind, &depth, &velocity, &grain, &constants)?
                .fill_nonfinite(OUTPUT_NODATA);

            let target = folder.join(step.output_file_name(&naming.file_prefix));
            self.engine.save(&grid, &target)?;
            debug!(tag = %step.tag, path = %target.display(), range = ?grid.value_range(), "写出栅格");
            outputs.push(target);
        }

        self.store.record_output_paths(name, kind, &outputs)?;
        info!(
            condition = name,
            kind = %kind,
            count = outputs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "派生完成"
        );
        Ok(outputs)
    }
}

/// 多个流量步渲染出同一文件名时拒绝执行
fn check_unique_outputs(steps: &[DischargeStep], prefix: &str) -> Result<(), InputError> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for step in steps {
        *seen.entry(step.output_file_name(prefix)).or_default() += 1;
    }
    let mut tags: Vec<String> = steps
        .iter()
        .filter(|s| seen.get(&s.output_file_name(prefix)).copied().unwrap_or(0) > 1)
        .map(|s| s.tag.clone())
        .collect();
    tags.sort();
    tags.dedup();
    if tags.is_empty() {
        Ok(())
    } else {
        Err(InputError::DuplicateTags { tags })
    }
}
