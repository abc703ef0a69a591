//! 连接指标模块
//!
//! 原子计数器，用于观察 IO 链路与通知分发的健康状态。
//! 可以在任何线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 连接实时指标
///
/// IO 线程更新收发计数，调用线程更新通知计数。
///
/// # 使用示例
///
/// ```rust
/// use artie_driver::ConnectionMetrics;
/// use std::sync::Arc;
/// use std::sync::atomic::Ordering;
///
/// let metrics = Arc::new(ConnectionMetrics::default());
/// metrics.rx_messages.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.rx_messages, 1);
/// ```
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    /// 已发送的消息数
    pub tx_messages: AtomicU64,

    /// 发送失败次数
    pub tx_errors: AtomicU64,

    /// 已接收并成功解码的消息数
    pub rx_messages: AtomicU64,

    /// 无法解码而被丢弃的帧数
    pub rx_decode_errors: AtomicU64,

    /// 已交给处理函数的通知数
    pub notifications_dispatched: AtomicU64,

    /// 因未注册处理函数而丢弃的通知数
    pub notifications_dropped: AtomicU64,
}

impl ConnectionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tx_messages: self.tx_messages.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
            rx_messages: self.rx_messages.load(Ordering::Relaxed),
            rx_decode_errors: self.rx_decode_errors.load(Ordering::Relaxed),
            notifications_dispatched: self.notifications_dispatched.load(Ordering::Relaxed),
            notifications_dropped: self.notifications_dropped.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.tx_messages.store(0, Ordering::Relaxed);
        self.tx_errors.store(0, Ordering::Relaxed);
        self.rx_messages.store(0, Ordering::Relaxed);
        self.rx_decode_errors.store(0, Ordering::Relaxed);
        self.notifications_dispatched.store(0, Ordering::Relaxed);
        self.notifications_dropped.store(0, Ordering::Relaxed);
    }

    pub(crate) fn record_notification(&self, dispatched: bool) {
        if dispatched {
            self.notifications_dispatched.fetch_add(1, Ordering::Relaxed);
        } else {
            self.notifications_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub tx_messages: u64,
    pub tx_errors: u64,
    pub rx_messages: u64,
    pub rx_decode_errors: u64,
    pub notifications_dispatched: u64,
    pub notifications_dropped: u64,
}
