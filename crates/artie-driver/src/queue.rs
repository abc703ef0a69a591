//! 出站/入站消息队列
//!
//! 调用线程与 IO 线程之间只通过这两个队列通信：
//! - 出站队列：调用线程写入，IO 线程读取并发送
//! - 入站队列：IO 线程写入（按接收顺序），调用线程的等待循环读取
//!
//! 两个队列都是无界、线程安全的 FIFO。

use crate::DriverError;
use artie_protocol::{InboundMessage, OutboundMessage};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use parking_lot::Mutex;
use std::time::Duration;

/// 出站队列的 IO 线程一侧
pub type OutboundReceiver = Receiver<OutboundMessage>;

/// 入站队列的 IO 线程一侧
pub type InboundSender = Sender<InboundMessage>;

/// 出站队列（调用线程一侧）
///
/// 可关闭：关闭后 IO 线程在发送完已排队的消息后看到通道断开并退出。
pub struct OutboundQueue {
    tx: Mutex<Option<Sender<OutboundMessage>>>,
}

impl OutboundQueue {
    /// 创建出站队列
    pub fn new() -> (Self, OutboundReceiver) {
        let (tx, rx) = unbounded();
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// 入队一条消息
    ///
    /// # 错误
    /// - `DriverError::ChannelClosed`: 队列已关闭或 IO 线程已退出
    pub fn push(&self, msg: OutboundMessage) -> Result<(), DriverError> {
        let guard = self.tx.lock();
        let tx = guard.as_ref().ok_or(DriverError::ChannelClosed)?;
        tx.send(msg).map_err(|_| DriverError::ChannelClosed)
    }

    /// 关闭队列（幂等）
    pub fn close(&self) {
        self.tx.lock().take();
    }

    pub fn is_closed(&self) -> bool {
        self.tx.lock().is_none()
    }
}

/// 入站队列（调用线程一侧）
pub struct InboundQueue {
    rx: Receiver<InboundMessage>,
}

impl InboundQueue {
    /// 创建入站队列
    pub fn new() -> (InboundSender, Self) {
        let (tx, rx) = unbounded();
        (tx, Self { rx })
    }

    /// 底层接收端（用于 `select!`）
    pub fn receiver(&self) -> &Receiver<InboundMessage> {
        &self.rx
    }

    /// 带超时读取一条消息
    ///
    /// 超时返回 `Ok(None)`；IO 线程已退出且队列为空时返回 `ChannelClosed`。
    pub fn pop_timeout(&self, timeout: Duration) -> Result<Option<InboundMessage>, DriverError> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => Ok(Some(msg)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(DriverError::ChannelClosed),
        }
    }
}
