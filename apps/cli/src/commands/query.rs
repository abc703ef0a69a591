//! 查询命令

use super::format_reply;
use anyhow::Result;
use artie_sdk::Artie;
use clap::Subcommand;
use std::time::Instant;

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// 测试连通性并打印往返时间
    Ping,

    /// 固件版本
    Version,

    /// 运行时间
    Uptime,

    /// 电池电压
    Voltage,

    /// 颜色传感器读数
    Color,

    /// 碰撞传感器状态
    Collide,

    /// 巡线传感器状态
    Follow,
}

impl QueryCommand {
    pub fn execute(self, artie: &mut Artie) -> Result<()> {
        match self {
            QueryCommand::Ping => {
                let start = Instant::now();
                artie.ping()?;
                println!("pong ({:.1} ms)", start.elapsed().as_secs_f64() * 1000.0);
            },
            QueryCommand::Version => println!("{}", format_reply(&artie.fetch_version()?)),
            QueryCommand::Uptime => println!("{}", format_reply(&artie.uptime()?)),
            QueryCommand::Voltage => println!("{}", format_reply(&artie.voltage()?)),
            QueryCommand::Color => println!("{}", format_reply(&artie.color_state()?)),
            QueryCommand::Collide => println!("{}", format_reply(&artie.collide_state()?)),
            QueryCommand::Follow => println!("{}", format_reply(&artie.follow_state()?)),
        }
        Ok(())
    }
}
