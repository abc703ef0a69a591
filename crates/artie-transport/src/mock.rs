//! 进程内模拟传输（`mock` feature）
//!
//! [`MockTransport`] 交给 IO 线程使用，[`MockRobot`] 留在测试线程中扮演机器人：
//! 读取出站命令、按脚本回复入站消息。

use crate::{Transport, TransportError};
use artie_protocol::{InboundMessage, OutboundMessage};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// 模拟传输（IO 线程一侧）
pub struct MockTransport {
    to_robot: Sender<OutboundMessage>,
    from_robot: Receiver<InboundMessage>,
    receive_timeout: Duration,
    closed: Arc<AtomicBool>,
}

/// 模拟机器人（测试一侧）
#[derive(Clone)]
pub struct MockRobot {
    commands: Receiver<OutboundMessage>,
    replies: Sender<InboundMessage>,
    closed: Arc<AtomicBool>,
}

impl MockTransport {
    /// 创建一对相连的模拟传输与模拟机器人
    pub fn pair() -> (MockTransport, MockRobot) {
        let (to_robot, commands) = unbounded();
        let (replies, from_robot) = unbounded();
        let closed = Arc::new(AtomicBool::new(false));

        (
            MockTransport {
                to_robot,
                from_robot,
                receive_timeout: Duration::from_millis(10),
                closed: closed.clone(),
            },
            MockRobot {
                commands,
                replies,
                closed,
            },
        )
    }
}

impl Transport for MockTransport {
    fn send(&mut self, msg: &OutboundMessage) -> Result<(), TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::ConnectionLost);
        }
        self.to_robot.send(msg.clone()).map_err(|_| TransportError::ConnectionLost)
    }

    fn receive(&mut self) -> Result<InboundMessage, TransportError> {
        match self.from_robot.recv_timeout(self.receive_timeout) {
            Ok(msg) => Ok(msg),
            Err(RecvTimeoutError::Timeout) => Err(TransportError::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(TransportError::ConnectionLost),
        }
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        self.receive_timeout = timeout;
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

impl MockRobot {
    /// 等待下一条出站命令
    pub fn next_command(&self, timeout: Duration) -> Option<OutboundMessage> {
        self.commands.recv_timeout(timeout).ok()
    }

    /// 推送一条入站消息
    pub fn push(&self, msg: InboundMessage) {
        let _ = self.replies.send(msg);
    }

    /// 对命令回复 `accepted`
    pub fn accept(&self, cmd: &OutboundMessage) {
        self.push(InboundMessage::accepted(&cmd.id));
    }

    /// 对命令回复 `complete`
    pub fn complete(&self, cmd: &OutboundMessage, msg: Option<Value>) {
        self.push(InboundMessage::complete(&cmd.id, msg));
    }

    /// 等待下一条命令并完成完整的 accepted → complete 流程
    pub fn serve_one(&self, timeout: Duration, reply: Option<Value>) -> Option<OutboundMessage> {
        let cmd = self.next_command(timeout)?;
        self.accept(&cmd);
        self.complete(&cmd, reply);
        Some(cmd)
    }

    /// 传输是否已被 IO 线程关闭
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
