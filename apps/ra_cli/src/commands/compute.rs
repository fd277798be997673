// apps/ra_cli/src/commands/compute.rs

//! 应力栅格派生命令

use super::Context;
use anyhow::Result;
use clap::Args;
use ra_foundation::RaError;
use ra_hydraulics::StressKind;
use ra_raster::RasterEngine;
use ra_workflow::{create_engine, StressPipeline};
use std::time::Instant;
use tracing::{error, info};

/// 派生参数
#[derive(Args)]
pub struct ComputeArgs {
    /// 工况名称
    pub name: String,

    /// 计算前检查输入栅格几何一致（覆盖配置文件）
    #[arg(long)]
    pub verify_geometry: bool,
}

/// 执行派生命令
pub fn execute(kind: StressKind, args: ComputeArgs, ctx: &Context) -> Result<()> {
    info!("=== {} 派生: {} ===", kind, args.name);
    let start = Instant::now();

    let mut config = ctx.config.clone();
    config.verify_geometry |= args.verify_geometry;

    let store = ctx.open_store()?;
    let engine = create_engine(config.engine)?;
    info!("栅格引擎: {}", engine.name());
    let pipeline = StressPipeline::new(store, engine, config);

    let paths = match pipeline.derive(&args.name, kind) {
        Ok(paths) => paths,
        Err(err) => {
            if let RaError::Input(input) = &err {
                error!("输入有误，未写出任何栅格: {}", input);
            }
            return Err(err.into());
        }
    };

    for path in &paths {
        println!("{}", path.display());
    }
    info!(
        "完成: {} 个栅格, 耗时 {:.2}s",
        paths.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
