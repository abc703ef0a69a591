//! # Artie CLI
//!
//! Command-line interface for Artie Max robots.
//!
//! 每条命令都是一次性的：连接 -> 执行 -> 断开。
//!
//! ```bash
//! # 保存机器人地址
//! artie-cli config set --address 192.168.4.1
//!
//! # 以厘米为单位前进，然后右转
//! artie-cli --unit cm forward 20
//! artie-cli right 90
//!
//! # 打印碰撞/巡线通知，直到 Ctrl-C
//! artie-cli watch
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod session;

use commands::{ConfigCommand, MotionCommand, QueryCommand, WatchCommand};
use session::SessionArgs;

/// Artie CLI - Artie Max 机器人命令行工具
#[derive(Parser, Debug)]
#[command(name = "artie-cli")]
#[command(about = "Command-line interface for Artie Max robots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 查询机器人状态
    #[command(flatten)]
    Query(QueryCommand),

    /// 运动、声音和灯光
    #[command(flatten)]
    Motion(MotionCommand),

    /// 打印碰撞/巡线通知
    Watch {
        #[command(flatten)]
        args: WatchCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 配置文件中的 debug 与命令行 --debug 任一开启即输出调试日志
    let settings = cli.session.resolve()?;
    artie_sdk::logging::init_logger_debug(settings.debug);

    match cli.command {
        Commands::Config(cmd) => cmd.execute(),
        Commands::Query(cmd) => {
            let mut artie = session::connect(&settings)?;
            cmd.execute(&mut artie)
        },
        Commands::Motion(cmd) => {
            let mut artie = session::connect(&settings)?;
            cmd.execute(&mut artie)
        },
        Commands::Watch { args } => {
            let mut artie = session::connect(&settings)?;
            args.execute(&mut artie)
        },
    }
}
