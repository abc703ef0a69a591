//! 通知监视命令
//!
//! 开启碰撞和巡线通知，定期 ping 以接收它们，直到 Ctrl-C 或超时。

use anyhow::Result;
use artie_sdk::{Artie, DriverError};
use clap::Args;
use std::time::{Duration, Instant};

#[derive(Args, Debug)]
pub struct WatchCommand {
    /// 监视时长（秒），省略时一直运行到 Ctrl-C
    #[arg(short, long)]
    pub seconds: Option<u64>,

    /// ping 间隔（毫秒）
    #[arg(long, default_value_t = 200)]
    pub interval_ms: u64,
}

impl WatchCommand {
    pub fn execute(self, artie: &mut Artie) -> Result<()> {
        artie.on_collide(|event, msg, _| {
            println!(
                "💥 collide [{}] left={} right={}",
                msg.id, event.left, event.right
            );
        })?;
        artie.on_follow(|state, msg, _| {
            println!("〰️  follow [{}] state={}", msg.id, state);
        })?;

        println!("👀 监视通知中（Ctrl-C 退出）");
        let interval = Duration::from_millis(self.interval_ms);
        let deadline = deadline_after(self.seconds);

        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
            match artie.ping() {
                Ok(_) => std::thread::sleep(interval),
                // Ctrl-C 会中断当前等待并断开连接
                Err(e) if e.is_interrupt() => {
                    println!("\n⏹  已中断");
                    return Ok(());
                },
                Err(DriverError::NotConnected) => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }

        artie.clear_collide()?;
        artie.clear_follow()?;
        Ok(())
    }
}

/// 监视结束时间；无法表示的时长视为一直运行
fn deadline_after(seconds: Option<u64>) -> Option<Instant> {
    seconds.and_then(|s| Instant::now().checked_add(Duration::from_secs(s)))
}
