//! 连接参数与会话建立
//!
//! 命令行参数覆盖配置文件中的同名字段。

use crate::commands::config;
use anyhow::{Context, Result};
use artie_sdk::{Artie, ArtieBuilder, ClientConfig, DistanceUnit};
use clap::Args;

/// 全局连接参数
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// 机器人地址（覆盖配置）
    #[arg(short, long, global = true)]
    pub address: Option<String>,

    /// WebSocket 端口（覆盖配置）
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// 命令超时（毫秒）
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// 距离单位（mm / cm / inch）
    #[arg(short, long, global = true)]
    pub unit: Option<DistanceUnit>,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub debug: bool,
}

impl SessionArgs {
    /// 合并配置文件与命令行参数
    pub fn resolve(&self) -> Result<ClientConfig> {
        let loaded = config::load()?;
        Ok(self.apply(loaded))
    }

    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(address) = &self.address {
            config.address = address.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(unit) = self.unit {
            config.unit = unit;
        }
        config.debug |= self.debug;
        config
    }
}

/// 连接机器人，并把 Ctrl-C 绑定到中断句柄
pub fn connect(config: &ClientConfig) -> Result<Artie> {
    let builder = ArtieBuilder::from_config(config);
    let url = builder.url();

    println!("🔌 连接到 {} ...", url);
    let artie = builder.build().with_context(|| format!("Failed to connect to {}", url))?;

    if let Some(interrupter) = artie.interrupter() {
        ctrlc::set_handler(move || interrupter.interrupt())
            .context("Failed to install Ctrl-C handler")?;
    }

    if let Some(version) = artie.version() {
        println!("✅ 已连接（固件 {}）", version);
    }
    Ok(artie)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = SessionArgs {
            address: Some("10.0.0.9".to_string()),
            port: None,
            timeout_ms: Some(900),
            unit: Some(DistanceUnit::Inch),
            debug: false,
        };
        let base = ClientConfig {
            port: 9000,
            debug: true,
            ..Default::default()
        };

        let config = args.apply(base);
        assert_eq!(config.address, "10.0.0.9");
        assert_eq!(config.port, 9000);
        assert_eq!(config.timeout_ms, 900);
        assert_eq!(config.unit, DistanceUnit::Inch);
        assert!(config.debug);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let base = ClientConfig {
            address: "artie.local".to_string(),
            ..Default::default()
        };
        assert_eq!(SessionArgs::default().apply(base.clone()), base);
    }
}
