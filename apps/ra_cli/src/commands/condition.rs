// apps/ra_cli/src/commands/condition.rs

//! 工况管理命令

use super::Context;
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use ra_hydraulics::StressKind;
use ra_workflow::{join_paths, Condition, ConditionExtras, ConditionStore};
use std::path::PathBuf;
use tracing::info;

/// 工况子命令
#[derive(Subcommand)]
pub enum ConditionCommand {
    /// 新建工况
    Create(CreateArgs),
    /// 显示工况详情
    Show {
        /// 工况名称
        name: String,
    },
    /// 列出所有工况
    List,
    /// 设置工况输出位置为 `<base>/<name>_outputs`
    SetOutput {
        /// 工况名称
        name: String,
        /// 输出基准目录
        base: PathBuf,
    },
    /// 删除工况
    Delete {
        /// 工况名称
        name: String,
    },
}

/// 新建工况参数
#[derive(Args)]
pub struct CreateArgs {
    /// 工况名称
    pub name: String,

    /// 单位标签（含 "us" 为美制，否则为国际单位）
    #[arg(short, long, default_value = "SI")]
    pub unit: String,

    /// 水深栅格，可重复或以 `;` 分隔
    #[arg(long = "depth", value_delimiter = ';', required = true)]
    pub depth: Vec<PathBuf>,

    /// 流速栅格，可重复或以 `;` 分隔
    #[arg(long = "velocity", value_delimiter = ';', required = true)]
    pub velocity: Vec<PathBuf>,

    /// 粒径栅格
    #[arg(long)]
    pub grain: Option<PathBuf>,

    /// 工况输出目录
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// 数字高程模型
    #[arg(long)]
    pub dem: Option<PathBuf>,

    /// 水面高程目录
    #[arg(long)]
    pub wse_folder: Option<PathBuf>,

    /// 流速方向目录
    #[arg(long)]
    pub velocity_angle_folder: Option<PathBuf>,

    /// 冲刷栅格
    #[arg(long)]
    pub scour: Option<PathBuf>,

    /// 淤积栅格
    #[arg(long)]
    pub fill: Option<PathBuf>,

    /// 背景栅格
    #[arg(long)]
    pub background: Option<PathBuf>,
}

/// 执行工况命令
pub fn execute(cmd: ConditionCommand, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    match cmd {
        ConditionCommand::Create(args) => create(&store, args),
        ConditionCommand::Show { name } => show(&store, &name),
        ConditionCommand::List => list(&store),
        ConditionCommand::SetOutput { name, base } => {
            let root = store.set_output_location(&name, &base, &ctx.config.output_suffix)?;
            info!("工况 '{}' 输出目录: {}", name, root.display());
            Ok(())
        }
        ConditionCommand::Delete { name } => {
            if !store.delete(&name)? {
                bail!("工况不存在: {}", name);
            }
            info!("已删除工况 '{}'", name);
            Ok(())
        }
    }
}

fn create(store: &impl ConditionStore, args: CreateArgs) -> Result<()> {
    let mut condition = Condition::new(&args.name, &args.unit)
        .with_depth_rasters(args.depth)
        .with_velocity_rasters(args.velocity)
        .with_extras(ConditionExtras {
            digital_elevation_model: args.dem,
            wse_folder: args.wse_folder,
            velocity_angle_folder: args.velocity_angle_folder,
            scour_raster: args.scour,
            fill_raster: args.fill,
            background_raster: args.background,
        });
    if let Some(grain) = args.grain {
        condition = condition.with_grain_size_raster(grain);
    }
    if let Some(root) = args.output_root {
        condition = condition.with_output_root(root);
    }

    store.create(&condition)?;
    info!(
        "已创建工况 '{}' ({}, {} 个流量步)",
        condition.name,
        condition.unit_system(),
        condition.depth_rasters.len()
    );
    Ok(())
}

fn show(store: &impl ConditionStore, name: &str) -> Result<()> {
    let c = store.require(name)?;
    let opt = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!("工况:       {}", c.name);
    println!("单位:       {} ({})", c.unit, c.unit_system());
    println!("水深栅格:   {}", join_paths(&c.depth_rasters));
    println!("流速栅格:   {}", join_paths(&c.velocity_rasters));
    println!("粒径栅格:   {}", c.grain_size_raster.display());
    println!("输出目录:   {}", opt(&c.output_root));
    for kind in StressKind::ALL {
        let folder = c
            .output_folder(kind)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}:", kind);
        println!("  目录:     {}", folder);
        for path in c.output_paths(kind) {
            println!("  - {}", path.display());
        }
    }
    if c.extras != ConditionExtras::default() {
        println!("附加输入:");
        println!("  DEM:      {}", opt(&c.extras.digital_elevation_model));
        println!("  WSE:      {}", opt(&c.extras.wse_folder));
        println!("  流向:     {}", opt(&c.extras.velocity_angle_folder));
        println!("  冲刷:     {}", opt(&c.extras.scour_raster));
        println!("  淤积:     {}", opt(&c.extras.fill_raster));
        println!("  背景:     {}", opt(&c.extras.background_raster));
    }
    Ok(())
}

fn list(store: &impl ConditionStore) -> Result<()> {
    let conditions = store.list()?;
    if conditions.is_empty() {
        println!("(无工况)");
        return Ok(());
    }
    println!("{:<24} {:<14} {:>6} {:>6} {:>6}", "名称", "单位", "流量步", "τb", "θ");
    for c in conditions {
        println!(
            "{:<24} {:<14} {:>6} {:>6} {:>6}",
            c.name,
            c.unit_system().label(),
            c.depth_rasters.len(),
            c.shear_output_paths.len(),
            c.shield_output_paths.len()
        );
    }
    Ok(())
}
