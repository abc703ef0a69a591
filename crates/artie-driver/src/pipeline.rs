//! Pipeline IO 循环模块
//!
//! 后台 IO 线程：把出站队列中的消息写到传输层，把收到的消息按顺序放入入站队列。
//! IO 线程不解释消息内容，关联与分发都在调用线程的等待循环中完成。

use crate::metrics::ConnectionMetrics;
use crate::queue::{InboundSender, OutboundReceiver};
use artie_transport::{Transport, TransportError};
use crossbeam_channel::TryRecvError;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// Pipeline 配置
///
/// # Example
///
/// ```
/// use artie_driver::PipelineConfig;
///
/// // 默认配置（20ms 接收超时，2s 线程回收超时）
/// let config = PipelineConfig::default();
///
/// let config = PipelineConfig {
///     receive_timeout_ms: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// 传输层接收超时（毫秒）
    ///
    /// 决定出站消息的最大发送延迟：IO 线程每次接收超时后都会检查出站队列。
    pub receive_timeout_ms: u64,
    /// 断开时等待 IO 线程退出的最长时间（毫秒）
    pub join_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            receive_timeout_ms: 20,
            join_timeout_ms: 2000,
        }
    }
}

/// 发送出站队列中的所有消息
///
/// # 返回值
/// 返回 IO 循环是否应该退出（出站队列已关闭，或传输层致命错误）。
fn drain_outbound(
    transport: &mut impl Transport,
    outbound: &OutboundReceiver,
    metrics: &ConnectionMetrics,
) -> bool {
    loop {
        match outbound.try_recv() {
            Ok(msg) => match transport.send(&msg) {
                Ok(()) => {
                    metrics.tx_messages.fetch_add(1, Ordering::Relaxed);
                    trace!("-> {}", msg);
                },
                Err(e) => {
                    metrics.tx_errors.fetch_add(1, Ordering::Relaxed);
                    error!("Failed to send {}: {}", msg, e);
                    if e.is_fatal() {
                        return true;
                    }
                },
            },
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

/// IO 线程主循环
///
/// # 参数
/// - `transport`: 传输层（所有权转移到 IO 线程）
/// - `outbound`: 出站队列接收端
/// - `inbound`: 入站队列发送端
/// - `config`: Pipeline 配置
/// - `metrics`: 连接指标
///
/// 退出条件：出站队列关闭、入站队列接收端被丢弃、或传输层致命错误。
/// 退出前关闭传输层；入站发送端随之丢弃，等待中的调用方会看到 `ChannelClosed`。
pub fn io_loop(
    mut transport: impl Transport,
    outbound: OutboundReceiver,
    inbound: InboundSender,
    config: PipelineConfig,
    metrics: Arc<ConnectionMetrics>,
) {
    transport.set_receive_timeout(Duration::from_millis(config.receive_timeout_ms));

    loop {
        if drain_outbound(&mut transport, &outbound, &metrics) {
            debug!("Outbound queue closed, stopping IO loop");
            break;
        }

        match transport.receive() {
            Ok(msg) => {
                metrics.rx_messages.fetch_add(1, Ordering::Relaxed);
                trace!("<- {}", msg);
                if inbound.send(msg).is_err() {
                    debug!("Inbound queue dropped, stopping IO loop");
                    break;
                }
            },
            Err(TransportError::Timeout) => continue,
            Err(TransportError::Decode(e)) => {
                metrics.rx_decode_errors.fetch_add(1, Ordering::Relaxed);
                warn!("Dropping undecodable message: {}", e);
            },
            Err(e) if e.is_fatal() => {
                error!("Transport failed, stopping IO loop: {}", e);
                break;
            },
            Err(e) => warn!("Receive error: {}", e),
        }
    }

    if let Err(e) = transport.close() {
        warn!("Failed to close transport: {}", e);
    }
}
