//! 中断处理
//!
//! [`Interrupter`] 可以跨线程克隆（例如交给 Ctrl-C 处理函数）。
//! 触发后，正在进行的等待立即返回 `InterruptedWait` 并断开连接；
//! 若当前没有等待，中断保留到下一次等待。

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// 中断触发句柄
#[derive(Clone)]
pub struct Interrupter {
    tx: Sender<()>,
}

/// 中断信号（等待循环一侧）
pub struct InterruptSignal {
    rx: Receiver<()>,
}

/// 创建一对中断句柄与信号
pub fn interrupt_channel() -> (Interrupter, InterruptSignal) {
    // 容量 1：重复触发合并为一次
    let (tx, rx) = bounded(1);
    (Interrupter { tx }, InterruptSignal { rx })
}

impl Interrupter {
    /// 触发中断
    pub fn interrupt(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {},
            Err(TrySendError::Disconnected(())) => {
                tracing::debug!("Interrupt raised after connection was dropped");
            },
        }
    }
}

impl InterruptSignal {
    /// 底层接收端（用于 `select!`）
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }

    /// 消费一个待处理的中断
    pub fn take(&self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_coalesces() {
        let (interrupter, signal) = interrupt_channel();
        interrupter.interrupt();
        interrupter.interrupt();
        interrupter.clone().interrupt();

        assert!(signal.take());
        assert!(!signal.take());
    }

    #[test]
    fn test_interrupt_from_other_thread() {
        let (interrupter, signal) = interrupt_channel();
        std::thread::spawn(move || interrupter.interrupt()).join().unwrap();
        assert!(signal.take());
    }

    #[test]
    fn test_interrupt_after_signal_dropped() {
        let (interrupter, signal) = interrupt_channel();
        drop(signal);
        interrupter.interrupt();
    }
}
