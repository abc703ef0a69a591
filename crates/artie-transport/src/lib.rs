//! # Artie Transport Layer
//!
//! 传输层抽象：负责物理连接、消息编解码。上层（`artie-driver`）只通过
//! [`Transport`] trait 与之交互，不接触原始字节。

use artie_protocol::{InboundMessage, OutboundMessage};
use std::time::Duration;
use thiserror::Error;

pub mod websocket;

#[cfg(feature = "mock")]
pub mod mock;

pub use websocket::{DEFAULT_PATH, DEFAULT_PORT, WebSocketTransport};

#[cfg(feature = "mock")]
pub use mock::{MockRobot, MockTransport};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("WebSocket error: {0}")]
    WebSocket(String),
    #[error("Connection lost")]
    ConnectionLost,
    #[error("Read timeout")]
    Timeout,
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Malformed message: {0}")]
    Decode(String),
}

impl TransportError {
    /// 连接已不可用（IO 线程应退出）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TransportError::Io(_)
                | TransportError::Connect(_)
                | TransportError::WebSocket(_)
                | TransportError::ConnectionLost
        )
    }
}

/// 消息传输接口
///
/// 实现者负责序列化出站消息、反序列化入站消息。
/// `receive()` 在超时窗口内没有消息时返回 `TransportError::Timeout`。
pub trait Transport {
    fn send(&mut self, msg: &OutboundMessage) -> Result<(), TransportError>;
    fn receive(&mut self) -> Result<InboundMessage, TransportError>;
    fn set_receive_timeout(&mut self, _timeout: Duration) {}
    /// 释放连接（收到关闭信号后由 IO 线程调用）
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
