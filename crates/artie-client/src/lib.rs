//! 客户端接口模块
//!
//! 本模块提供 Artie Max 机器人的用户友好接口，包括：
//! - 可链式调用的命令（`artie.inches()?.forward(4.0)?.left(45.0)?`）
//! - 距离单位换算（毫米、厘米、英寸）
//! - 碰撞/巡线通知与错误回调注册
//! - 持久化的客户端配置
//! - 日志初始化
//!
//! # 使用场景
//!
//! 这是大多数用户应该使用的模块。
//! 如果需要直接发送原始命令，可以使用 `artie-driver` 的 `Connection`。

mod artie;
pub mod builder;
mod commands;
pub mod config;
pub mod logging;
pub mod units;

pub use artie::{Artie, ErrorHandler};
pub use builder::ArtieBuilder;
pub use config::{ClientConfig, ConfigError};
pub use units::DistanceUnit;
