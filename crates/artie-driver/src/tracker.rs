//! 请求跟踪模块
//!
//! 一次 `send` 调用对应一个 [`PendingRequest`]：它只存在于调用线程的栈上，
//! 记录关联 ID、截止时间和是否已收到 `accepted`。
//!
//! 等待循环的每一轮都按截止时间重新计算剩余时长，
//! 所以处理通知不会重置或延长整体超时。

use crate::error::{DriverError, WaitPhase};
use crate::interrupt::InterruptSignal;
use crate::queue::InboundQueue;
use artie_protocol::{InboundMessage, NotificationKind, OutboundMessage, Reply, Status};
use crossbeam_channel::select;
use std::time::{Duration, Instant};
use tracing::trace;

/// 阻塞等待的最小时长
const MIN_WAIT: Duration = Duration::from_millis(1);

/// 没有截止时间时每一轮的阻塞时长
const UNBOUNDED_SLICE: Duration = Duration::from_secs(60);

/// 处理一条入站消息后的状态
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// 继续等待
    Pending,
    /// 收到 `complete`，携带返回载荷
    Done(Reply),
}

/// 未完成的请求
#[derive(Debug)]
pub struct PendingRequest<'a> {
    request: &'a OutboundMessage,
    timeout: Duration,
    /// `None`：超时大到无法表示为时间点，永不超时
    deadline: Option<Instant>,
    accepted: bool,
}

impl<'a> PendingRequest<'a> {
    /// 从现在开始计时
    pub fn new(request: &'a OutboundMessage, timeout: Duration) -> Self {
        Self {
            request,
            timeout,
            deadline: Instant::now().checked_add(timeout),
            accepted: false,
        }
    }

    pub fn request(&self) -> &OutboundMessage {
        self.request
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// 当前所处阶段（用于超时报告）
    pub fn phase(&self) -> WaitPhase {
        if self.accepted {
            WaitPhase::Completion
        } else {
            WaitPhase::Acceptance
        }
    }

    /// 本轮最多阻塞的时长（至少 1ms）
    pub fn remaining(&self) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()).max(MIN_WAIT),
            None => UNBOUNDED_SLICE,
        }
    }

    fn timed_out(&self) -> DriverError {
        DriverError::Timeout {
            phase: self.phase(),
            request: self.request.clone(),
            timeout: self.timeout,
        }
    }

    /// 处理一条入站消息
    ///
    /// ID 不匹配时：保留 ID 的通知交给 `on_notification`，其它一律视为协议失步。
    pub fn on_message<F>(&mut self, msg: InboundMessage, on_notification: &mut F) -> Result<Step, DriverError>
    where
        F: FnMut(NotificationKind, &InboundMessage) -> Result<(), DriverError>,
    {
        if !self.request.id.matches(&msg.id) {
            return match NotificationKind::from_id(&msg.id) {
                Some(kind) => {
                    on_notification(kind, &msg)?;
                    Ok(Step::Pending)
                },
                None => Err(DriverError::UnexpectedId {
                    expected: self.request.id.to_string(),
                    received: msg,
                }),
            };
        }

        match msg.status {
            Status::Accepted => {
                trace!("{} accepted", self.request.id);
                self.accepted = true;
                Ok(Step::Pending)
            },
            // `"msg": null` 与缺省等价
            Status::Complete => Ok(Step::Done(msg.msg.filter(|v| !v.is_null()))),
            Status::Notify => Ok(Step::Pending),
            Status::Other(_) => Err(DriverError::UnexpectedStatus {
                status: msg.status.clone(),
                received: msg,
            }),
        }
    }

    /// 等待请求完成
    ///
    /// # 错误
    /// - `Timeout`: 截止时间内没有收到任何消息（阶段取决于是否已 `accepted`）
    /// - `UnexpectedId` / `UnexpectedStatus`: 协议失步
    /// - `InterruptedWait`: 收到中断（调用方负责断开连接）
    /// - `ChannelClosed`: IO 线程已退出
    /// - `on_notification` 返回的错误
    pub fn wait<F>(
        mut self,
        inbound: &InboundQueue,
        interrupt: &InterruptSignal,
        mut on_notification: F,
    ) -> Result<Reply, DriverError>
    where
        F: FnMut(NotificationKind, &InboundMessage) -> Result<(), DriverError>,
    {
        // 等待开始前已触发的中断同样生效
        if interrupt.take() {
            return Err(DriverError::InterruptedWait);
        }

        let mut interrupt_live = true;
        loop {
            let remaining = self.remaining();
            let received = if interrupt_live {
                select! {
                    recv(inbound.receiver()) -> msg => Some(msg.map_err(|_| DriverError::ChannelClosed)?),
                    recv(interrupt.receiver()) -> signal => match signal {
                        Ok(()) => return Err(DriverError::InterruptedWait),
                        // 所有中断句柄都已丢弃，之后只等待入站消息
                        Err(_) => {
                            interrupt_live = false;
                            continue;
                        },
                    },
                    default(remaining) => None,
                }
            } else {
                inbound.pop_timeout(remaining)?
            };

            match received {
                Some(msg) => {
                    if let Step::Done(reply) = self.on_message(msg, &mut on_notification)? {
                        return Ok(reply);
                    }
                },
                None if self.deadline.is_some() => return Err(self.timed_out()),
                None => {},
            }
        }
    }
}
