//! 命令定义和实现

pub mod config;
pub mod motion;
pub mod query;
pub mod watch;

pub use config::ConfigCommand;
pub use motion::MotionCommand;
pub use query::QueryCommand;
pub use watch::WatchCommand;

use artie_sdk::protocol::Reply;

/// 人类可读的返回载荷
pub fn format_reply(reply: &Reply) -> String {
    match reply {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "(no data)".to_string(),
    }
}
