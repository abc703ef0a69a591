//! 驱动层错误类型定义

use artie_protocol::{InboundMessage, OutboundMessage, ProtocolError, Status};
use artie_transport::TransportError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 超时发生在哪个阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    /// 机器人从未确认收到命令（链路问题）
    Acceptance,
    /// 机器人已确认但未完成（机构卡住或动作过长）
    Completion,
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitPhase::Acceptance => f.write_str("acceptance"),
            WaitPhase::Completion => f.write_str("completion"),
        }
    }
}

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 等待超时（区分未确认 / 未完成）
    #[error("Artie timed out after {timeout:?} awaiting {phase} of {request}")]
    Timeout {
        phase: WaitPhase,
        request: OutboundMessage,
        timeout: Duration,
    },

    /// 收到的消息 ID 既不是当前请求也不是通知（协议失步）
    #[error("Received message ID ({}) does not match expected ({expected})", .received.id)]
    UnexpectedId {
        expected: String,
        received: InboundMessage,
    },

    /// 当前请求收到了未识别的状态
    #[error("Received message status ({status}) unexpected")]
    UnexpectedStatus {
        status: Status,
        received: InboundMessage,
    },

    /// 等待被中断（已触发断开）
    #[error("Wait interrupted, connection closed")]
    InterruptedWait,

    /// 命令通道已关闭（已断开或 IO 线程退出）
    #[error("Command channel closed")]
    ChannelClosed,

    /// 尚未连接（或已断开且未重连）
    #[error("Not connected")]
    NotConnected,

    /// 数值参数不是有限数（命令未发送）
    #[error("Invalid argument for {cmd}: {value} is not a finite number")]
    InvalidArgument { cmd: &'static str, value: f64 },

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl DriverError {
    /// 超时阶段（非超时错误返回 None）
    pub fn timeout_phase(&self) -> Option<WaitPhase> {
        match self {
            DriverError::Timeout { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    pub fn is_acceptance_timeout(&self) -> bool {
        self.timeout_phase() == Some(WaitPhase::Acceptance)
    }

    pub fn is_completion_timeout(&self) -> bool {
        self.timeout_phase() == Some(WaitPhase::Completion)
    }

    /// 错误回调不得拦截中断
    pub fn is_interrupt(&self) -> bool {
        matches!(self, DriverError::InterruptedWait)
    }
}
