//! 驱动层模块
//!
//! 本模块提供 Artie Max 机器人的命令-响应关联引擎，包括：
//! - 出站/入站队列（IO 线程与调用线程之间唯一的共享状态）
//! - IO 线程管理（WebSocket 收发）
//! - 请求跟踪：两阶段确认（accepted → complete）与截止时间
//! - 异步通知分发（碰撞、巡线）
//! - 中断处理（Ctrl-C 触发断开）
//!
//! # 使用场景
//!
//! 适用于需要直接发送原始命令的场景。
//! 大多数用户应该使用 `artie-client` 提供的 `Artie` 接口。

mod builder;
mod connection;
pub mod dispatcher;
mod error;
pub mod interrupt;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod tracker;

pub use builder::{ConnectionBuilder, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST};
pub use connection::{Connection, DEFAULT_TIMEOUT};
pub use dispatcher::{CollideHandler, FollowHandler, NotificationDispatcher};
pub use error::{DriverError, WaitPhase};
pub use interrupt::{InterruptSignal, Interrupter, interrupt_channel};
pub use metrics::{ConnectionMetrics, MetricsSnapshot};
pub use pipeline::{PipelineConfig, io_loop};
pub use queue::{InboundQueue, InboundSender, OutboundQueue, OutboundReceiver};
pub use tracker::{PendingRequest, Step};
