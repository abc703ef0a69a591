//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use artie_sdk::prelude::*;
//! ```

// 客户端层
pub use crate::client::{Artie, ArtieBuilder, ClientConfig, DistanceUnit};

// 消息与通知
pub use crate::protocol::{CollisionEvent, InboundMessage, NotificationKind, OutboundMessage, Reply};

// 驱动层（高级用户使用）
pub use crate::driver::{Connection as Driver, Interrupter, MetricsSnapshot};

// 错误类型
pub use crate::driver::{DriverError, WaitPhase};
pub use crate::protocol::ProtocolError;
pub use crate::transport::TransportError;
