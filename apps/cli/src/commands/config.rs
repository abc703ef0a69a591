//! 配置管理命令
//!
//! 配置保存在 `<config_dir>/artie/config.toml`。

use anyhow::{Context, Result};
use artie_sdk::{ClientConfig, DistanceUnit};
use clap::Subcommand;
use std::path::PathBuf;

/// 配置目录
fn config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("artie");
    Ok(path)
}

pub fn config_file() -> Result<PathBuf> {
    let mut path = config_dir()?;
    path.push("config.toml");
    Ok(path)
}

/// 加载配置（文件不存在时使用默认值）
pub fn load() -> Result<ClientConfig> {
    let path = config_file()?;
    ClientConfig::load(&path).with_context(|| format!("读取配置文件失败: {}", path.display()))
}

fn save(config: &ClientConfig) -> Result<()> {
    let path = config_file()?;
    config
        .save(&path)
        .with_context(|| format!("写入配置文件失败: {}", path.display()))
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 配置项名称（address / port / path / timeout_ms / unit / debug）
        key: String,

        /// 新值
        value: String,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Set { key, value } => {
                let mut config = load()?;
                set_value(&mut config, &key, &value)?;
                save(&config)?;
                println!("✅ {} = {}", key, get_value(&config, &key)?);
                Ok(())
            },

            ConfigCommand::Get { key } => {
                let config = load()?;
                println!("{}", get_value(&config, &key)?);
                Ok(())
            },

            ConfigCommand::Check => {
                let path = config_file()?;
                println!("配置文件: {}", path.display());
                if !path.exists() {
                    println!("  (不存在，使用默认配置)");
                }
                let config = load()?;
                print!("{}", config.to_toml()?);
                Ok(())
            },
        }
    }
}

fn set_value(config: &mut ClientConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "address" => config.address = value.to_string(),
        "port" => config.port = value.parse().with_context(|| format!("无效端口: {}", value))?,
        "path" => config.path = value.to_string(),
        "timeout_ms" => {
            config.timeout_ms = value.parse().with_context(|| format!("无效超时: {}", value))?
        },
        "unit" => config.unit = value.parse::<DistanceUnit>().map_err(anyhow::Error::msg)?,
        "debug" => config.debug = value.parse().with_context(|| format!("无效布尔值: {}", value))?,
        other => anyhow::bail!("未知配置项: {}", other),
    }
    Ok(())
}

fn get_value(config: &ClientConfig, key: &str) -> Result<String> {
    Ok(match key {
        "address" => config.address.clone(),
        "port" => config.port.to_string(),
        "path" => config.path.clone(),
        "timeout_ms" => config.timeout_ms.to_string(),
        "unit" => config.unit.to_string(),
        "debug" => config.debug.to_string(),
        "all" => config.to_toml()?.trim_end().to_string(),
        other => anyhow::bail!("未知配置项: {}", other),
    })
}
