//! # Artie Protocol
//!
//! Artie Max 机器人 JSON 消息协议定义（无 IO 依赖）
//!
//! ## 模块
//!
//! - `ids`: 关联 ID（Correlation ID）生成
//! - `message`: 出站/入站消息结构与状态
//! - `notification`: 异步通知（碰撞、巡线）解码
//!
//! ## 消息格式
//!
//! ```text
//! 出站: { "id": "aB3x0001", "cmd": "forward", "arg": 100 }
//! 入站: { "id": "aB3x0001", "status": "accepted" }
//!       { "id": "aB3x0001", "status": "complete", "msg": ... }
//!       { "id": "collide",  "status": "notify",   "msg": "left" }
//! ```
//!
//! 协议层只定义数据模型，不关心字节如何在网络上传输（见 `artie-transport`）。

pub mod ids;
pub mod message;
pub mod notification;

// 重新导出常用类型
pub use ids::*;
pub use message::*;
pub use notification::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid follow state payload: {payload}")]
    InvalidFollowState { payload: String },

    #[error("Invalid nonce {nonce:?}: expected {expected} ASCII alphanumeric characters")]
    InvalidNonce { nonce: String, expected: usize },
}
