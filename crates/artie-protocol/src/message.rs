//! 消息类型定义模块
//!
//! 出站消息（客户端 → 机器人）与入站消息（机器人 → 客户端）。

use crate::ids::{COLLIDE_TOKEN, CorrelationId, FOLLOW_TOKEN};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 命令的返回载荷
///
/// `complete` 消息中的 `msg` 字段；缺省或 `null` 均为 `None`。
pub type Reply = Option<Value>;

/// 出站消息
///
/// 入队后不可变。`arg` 为 `None` 时序列化结果中不出现该字段（而不是 `null`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub id: CorrelationId,
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<Value>,
}

impl OutboundMessage {
    pub fn new(id: CorrelationId, cmd: impl Into<String>, arg: Option<Value>) -> Self {
        Self {
            id,
            cmd: cmd.into(),
            arg,
        }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}({}) [{}]", self.cmd, arg, self.id),
            None => write!(f, "{}() [{}]", self.cmd, self.id),
        }
    }
}

/// 入站消息状态
///
/// 未知的状态字符串保留在 `Other` 中，用于错误诊断。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// 命令已被机器人接收
    Accepted,
    /// 命令执行完成（携带返回载荷）
    Complete,
    /// 进度通知 / 异步通知
    Notify,
    /// 未识别的状态
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Accepted => "accepted",
            Status::Complete => "complete",
            Status::Notify => "notify",
            Status::Other(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "accepted" => Status::Accepted,
            "complete" => Status::Complete,
            "notify" => Status::Notify,
            _ => Status::Other(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Status::from(s.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other(String::new())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 入站消息
///
/// 缺少 `id` / `status` 字段时解码为空字符串，永远不会与任何请求匹配。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<Value>,
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, status: impl Into<Status>, msg: Option<Value>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            msg,
        }
    }

    /// 构造 `accepted` 回复
    pub fn accepted(id: impl AsRef<str>) -> Self {
        Self::new(id.as_ref(), Status::Accepted, None)
    }

    /// 构造 `complete` 回复
    pub fn complete(id: impl AsRef<str>, msg: Option<Value>) -> Self {
        Self::new(id.as_ref(), Status::Complete, msg)
    }

    /// 构造碰撞通知
    pub fn collide(msg: Value) -> Self {
        Self::new(COLLIDE_TOKEN, Status::Notify, Some(msg))
    }

    /// 构造巡线通知
    pub fn follow(msg: Value) -> Self {
        Self::new(FOLLOW_TOKEN, Status::Notify, Some(msg))
    }
}

impl fmt::Display for InboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.msg {
            Some(msg) => write!(f, "[{}] {} {}", self.id, self.status, msg),
            None => write!(f, "[{}] {}", self.id, self.status),
        }
    }
}
