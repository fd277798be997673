// apps/ra_cli/src/main.rs

//! River Architect 命令行界面
//!
//! 管理工况记录，并从工况的水深/流速/粒径栅格派生床面剪切应力
//! (`tb<流量>.tif`) 与 Shields 应力 (`ts<流量>.tif`) 栅格。

mod commands;

use clap::{Parser, Subcommand};
use ra_hydraulics::StressKind;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// River Architect 栅格派生命令行工具
#[derive(Parser)]
#[command(name = "ra_cli")]
#[command(author = "River Architect Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "River Architect bed shear / Shields stress raster derivation", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 工况记录表文件
    #[arg(short, long, default_value = "conditions.json")]
    store: PathBuf,

    /// 派生配置文件 (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 工况管理
    #[command(subcommand)]
    Condition(commands::condition::ConditionCommand),
    /// 派生床面剪切应力栅格
    Shear(commands::compute::ComputeArgs),
    /// 派生 Shields 应力栅格
    Shields(commands::compute::ComputeArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let ctx = commands::Context::new(cli.store, cli.config)?;

    match cli.command {
        Commands::Condition(cmd) => commands::condition::execute(cmd, &ctx),
        Commands::Shear(args) => commands::compute::execute(StressKind::Shear, args, &ctx),
        Commands::Shields(args) => commands::compute::execute(StressKind::Shields, args, &ctx),
    }
}
