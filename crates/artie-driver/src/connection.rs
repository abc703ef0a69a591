//! 连接模块
//!
//! [`Connection`] 拥有一条到机器人的连接：ID 生成器、两个队列、IO 线程和中断信号。
//! 同一连接上的 `issue` / `wait` 必须由调用方串行化（`issue` 需要 `&mut self`）。

use crate::error::DriverError;
use crate::interrupt::{InterruptSignal, Interrupter, interrupt_channel};
use crate::metrics::ConnectionMetrics;
use crate::pipeline::{PipelineConfig, io_loop};
use crate::queue::{InboundQueue, OutboundQueue};
use crate::tracker::PendingRequest;
use artie_protocol::{IdGenerator, InboundMessage, NotificationKind, OutboundMessage, Reply};
use artie_transport::Transport;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use std::thread::{JoinHandle, spawn};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 默认命令超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 带超时的 thread join
trait JoinTimeout {
    fn join_timeout(self, timeout: Duration) -> std::thread::Result<()>;
}

impl<T: Send + 'static> JoinTimeout for JoinHandle<T> {
    fn join_timeout(self, timeout: Duration) -> std::thread::Result<()> {
        use std::sync::mpsc;

        let (tx, rx) = mpsc::channel();

        // 看门狗线程负责 join，超时后它继续在后台运行
        spawn(move || {
            let result = self.join();
            let _ = tx.send(result);
        });

        match rx.recv_timeout(timeout) {
            Ok(join_result) => join_result.map(|_| ()),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Thread join timeout",
            ))),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "Thread panicked during join",
            ))),
        }
    }
}

/// 到机器人的连接
pub struct Connection {
    /// 关联 ID 生成器（每个连接独立的随机前缀）
    ids: IdGenerator,
    /// 出站队列（关闭即断开）
    outbound: OutboundQueue,
    /// 入站队列
    inbound: InboundQueue,
    /// 保留一个句柄，保证中断通道在连接存活期间不会断开
    interrupter: Interrupter,
    signal: InterruptSignal,
    /// IO 线程句柄（Drop 时 join）
    io_thread: Option<JoinHandle<()>>,
    metrics: Arc<ConnectionMetrics>,
    config: PipelineConfig,
}

impl Connection {
    /// 启动 IO 线程并返回连接
    ///
    /// # 参数
    /// - `transport`: 已建立的传输层（移动到 IO 线程）
    /// - `rng`: 用于生成 ID 前缀
    /// - `config`: Pipeline 配置
    pub fn open<T, R>(transport: T, rng: &mut R, config: PipelineConfig) -> Self
    where
        T: Transport + Send + 'static,
        R: Rng + ?Sized,
    {
        let ids = IdGenerator::new(rng);
        let (outbound, outbound_rx) = OutboundQueue::new();
        let (inbound_tx, inbound) = InboundQueue::new();
        let metrics = Arc::new(ConnectionMetrics::new());

        let thread_metrics = metrics.clone();
        let thread_config = config.clone();
        let io_thread = spawn(move || {
            io_loop(transport, outbound_rx, inbound_tx, thread_config, thread_metrics);
        });

        debug!("Connection opened with nonce {}", ids.nonce());

        let mut conn = Self::from_parts(ids, outbound, inbound, config);
        conn.metrics = metrics;
        conn.io_thread = Some(io_thread);
        conn
    }

    /// 用现成的队列构造连接（不启动 IO 线程）
    ///
    /// 调用方持有 `OutboundReceiver` / `InboundSender`，自行扮演 IO 线程。
    pub fn from_parts(
        ids: IdGenerator,
        outbound: OutboundQueue,
        inbound: InboundQueue,
        config: PipelineConfig,
    ) -> Self {
        let (interrupter, signal) = interrupt_channel();
        Self {
            ids,
            outbound,
            inbound,
            interrupter,
            signal,
            io_thread: None,
            metrics: Arc::new(ConnectionMetrics::new()),
            config,
        }
    }

    /// 生成新 ID、构造出站消息并入队
    ///
    /// # 错误
    /// - `DriverError::ChannelClosed`: 连接已断开
    pub fn issue(
        &mut self,
        cmd: impl Into<String>,
        arg: Option<Value>,
    ) -> Result<OutboundMessage, DriverError> {
        let request = self.next_request(cmd, arg);
        self.enqueue(&request)?;
        Ok(request)
    }

    /// 生成新 ID 并构造出站消息（不入队）
    pub fn next_request(&mut self, cmd: impl Into<String>, arg: Option<Value>) -> OutboundMessage {
        OutboundMessage::new(self.ids.next_id(), cmd, arg)
    }

    /// 将出站消息入队
    pub fn enqueue(&self, request: &OutboundMessage) -> Result<(), DriverError> {
        self.outbound.push(request.clone())?;
        debug!("Issued {}", request);
        Ok(())
    }

    /// 等待已发出的请求完成
    ///
    /// `on_notification` 处理等待期间到达的通知，返回是否已交给处理函数（用于指标统计）。
    /// 收到中断时先断开连接，再返回 `InterruptedWait`。
    pub fn wait<F>(
        &self,
        request: &OutboundMessage,
        timeout: Duration,
        mut on_notification: F,
    ) -> Result<Reply, DriverError>
    where
        F: FnMut(NotificationKind, &InboundMessage) -> Result<bool, DriverError>,
    {
        let result = PendingRequest::new(request, timeout).wait(&self.inbound, &self.signal, |kind, msg| {
            let dispatched = on_notification(kind, msg)?;
            self.metrics.record_notification(dispatched);
            Ok(())
        });

        match result {
            Err(e) if e.is_interrupt() => {
                warn!("Interrupted while awaiting {}, disconnecting", request);
                self.disconnect();
                Err(e)
            },
            other => other,
        }
    }

    /// 发送命令并等待完成（等待期间的通知被丢弃）
    pub fn send(
        &mut self,
        cmd: impl Into<String>,
        arg: Option<Value>,
        timeout: Duration,
    ) -> Result<Reply, DriverError> {
        let request = self.issue(cmd, arg)?;
        self.wait(&request, timeout, |kind, msg| {
            debug!("Ignoring {:?} notification {}", kind, msg);
            Ok(false)
        })
    }

    /// 断开连接（幂等，尽力而为）
    ///
    /// 关闭出站队列；IO 线程发送完已排队的消息后关闭传输层并退出。
    pub fn disconnect(&self) {
        if !self.outbound.is_closed() {
            self.outbound.close();
            info!("Disconnecting");
        }
    }

    /// 连接是否仍然可用
    pub fn is_connected(&self) -> bool {
        !self.outbound.is_closed() && self.io_thread.as_ref().is_none_or(|h| !h.is_finished())
    }

    /// 获取中断句柄（可交给 Ctrl-C 处理函数）
    pub fn interrupter(&self) -> Interrupter {
        self.interrupter.clone()
    }

    pub fn metrics(&self) -> &ConnectionMetrics {
        &self.metrics
    }

    /// 本连接的 ID 前缀
    pub fn nonce(&self) -> &str {
        self.ids.nonce()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();

        let join_timeout = Duration::from_millis(self.config.join_timeout_ms);
        if let Some(handle) = self.io_thread.take()
            && let Err(_e) = handle.join_timeout(join_timeout)
        {
            error!(
                "IO thread panicked or failed to shut down within {:?}",
                join_timeout
            );
        }
    }
}
