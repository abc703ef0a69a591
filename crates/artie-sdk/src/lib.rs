//! Artie SDK - Artie Max 教育机器人 Rust SDK
//!
//! 通过 WebSocket 向机器人发送 JSON 命令，并把每条命令与它的
//! `accepted` / `complete` 回复关联起来。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 消息结构、关联 ID、通知解码
//! - **传输层** (`transport`): `Transport` trait 与 WebSocket 实现
//! - **驱动层** (`driver`): 队列、IO 线程、请求跟踪、通知分发
//! - **客户端层** (`client`): 可链式调用的命令接口
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use artie_sdk::prelude::*;
//!
//! # fn main() -> Result<(), DriverError> {
//! artie_sdk::logging::init_logger();
//!
//! let mut artie = ArtieBuilder::new().build()?;
//! artie.on_collide(|event, _msg, _artie| {
//!     println!("bump! left={} right={}", event.left, event.right);
//! })?;
//! artie.cm().forward(20.0)?.right(90.0)?.beep(1)?;
//! # Ok(())
//! # }
//! ```
//!
//! 需要发送原始命令的用户可以直接使用驱动层：
//!
//! ```rust,no_run
//! use artie_sdk::driver::{ConnectionBuilder, DEFAULT_TIMEOUT};
//!
//! let mut conn = ConnectionBuilder::new().build().unwrap();
//! let reply = conn.send("getVoltage", None, DEFAULT_TIMEOUT).unwrap();
//! ```

pub use artie_client as client;
pub use artie_driver as driver;
pub use artie_protocol as protocol;
pub use artie_transport as transport;

pub mod prelude;

pub use client::logging;

// 客户端层（推荐入口）
pub use client::{Artie, ArtieBuilder, ClientConfig, DistanceUnit};

// 错误类型
pub use driver::{DriverError, WaitPhase};
pub use protocol::ProtocolError;
pub use transport::TransportError;

// 驱动层别名
pub type Driver = driver::Connection;
