//! Artie 客户端句柄

use crate::builder::ArtieBuilder;
use crate::units::DistanceUnit;
use artie_driver::{
    Connection, DEFAULT_TIMEOUT, DriverError, Interrupter, MetricsSnapshot, NotificationDispatcher,
};
use artie_protocol::{
    CollisionEvent, InboundMessage, NotificationKind, OutboundMessage, Reply,
};
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// 错误回调：`(error, request, timeout, client)`
///
/// 返回值替代本次调用的结果，可以返回 `Err` 重新抛出。
pub type ErrorHandler = Box<
    dyn Fn(&DriverError, &OutboundMessage, Duration, &Artie) -> Result<Reply, DriverError> + Send + Sync,
>;

/// Artie Max 机器人客户端
///
/// 动作命令返回 `Result<&mut Self, _>` 以便链式调用，查询命令返回 `Result<Reply, _>`。
///
/// # 示例
///
/// ```rust,no_run
/// use artie_client::Artie;
///
/// # fn main() -> Result<(), artie_driver::DriverError> {
/// let mut artie = Artie::builder().build()?;
/// artie.inches().forward(4.0)?.left(45.0)?.beep(3)?;
/// println!("battery: {:?}", artie.voltage()?);
/// # Ok(())
/// # }
/// ```
pub struct Artie {
    connection: Option<Connection>,
    dispatcher: NotificationDispatcher<Artie>,
    on_error: Option<ErrorHandler>,
    unit: DistanceUnit,
    timeout: Duration,
    /// 连接时查询到的固件版本
    version: Reply,
}

impl Artie {
    pub fn builder() -> ArtieBuilder {
        ArtieBuilder::new()
    }

    /// 创建未连接的客户端
    pub fn new(unit: DistanceUnit, timeout: Duration) -> Self {
        Self {
            connection: None,
            dispatcher: NotificationDispatcher::new(),
            on_error: None,
            unit,
            timeout,
            version: None,
        }
    }

    /// 使用新连接替换当前连接，并查询固件版本
    pub fn connect(&mut self, connection: Connection) -> Result<&mut Self, DriverError> {
        if let Some(old) = self.connection.replace(connection) {
            debug!("Replacing connection {}", old.nonce());
        }
        let version = self.fetch_version()?;
        info!("Connected to Artie (firmware {})", display_reply(&version));
        Ok(self)
    }

    /// 断开连接（幂等）
    ///
    /// 之后的命令返回 `NotConnected`，直到再次 `connect`。
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.disconnect();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(Connection::is_connected)
    }

    /// 中断句柄（未连接时为 None）
    pub fn interrupter(&self) -> Option<Interrupter> {
        self.connection.as_ref().map(Connection::interrupter)
    }

    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.connection.as_ref().map(|conn| conn.metrics().snapshot())
    }

    /// 连接时查询到的固件版本
    pub fn version(&self) -> Option<&Value> {
        self.version.as_ref()
    }

    pub(crate) fn set_version(&mut self, version: Reply) {
        self.version = version;
    }

    // ==================== 单位与超时 ====================

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: DistanceUnit) -> &mut Self {
        self.unit = unit;
        self
    }

    /// 之后的距离参数以毫米为单位
    pub fn mm(&mut self) -> &mut Self {
        self.set_unit(DistanceUnit::Mm)
    }

    /// 之后的距离参数以厘米为单位
    pub fn cm(&mut self) -> &mut Self {
        self.set_unit(DistanceUnit::Cm)
    }

    /// 之后的距离参数以英寸为单位
    pub fn inches(&mut self) -> &mut Self {
        self.set_unit(DistanceUnit::Inch)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 设置默认命令超时
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    // ==================== 回调注册 ====================

    /// 注册错误回调（替换已有的）
    pub fn on_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&DriverError, &OutboundMessage, Duration, &Artie) -> Result<Reply, DriverError>
            + Send
            + Sync
            + 'static,
    {
        self.on_error = Some(Box::new(handler));
        self
    }

    pub fn clear_error(&mut self) -> &mut Self {
        self.on_error = None;
        self
    }

    /// 注册碰撞回调，并开启机器人的碰撞通知
    pub fn on_collide<F>(&mut self, handler: F) -> Result<&mut Self, DriverError>
    where
        F: Fn(CollisionEvent, &InboundMessage, &Artie) + Send + Sync + 'static,
    {
        self.dispatcher.set_collide(handler);
        self.toggle_notifications(NotificationKind::Collide, true)
    }

    /// 移除碰撞回调，并关闭机器人的碰撞通知
    pub fn clear_collide(&mut self) -> Result<&mut Self, DriverError> {
        self.dispatcher.clear(NotificationKind::Collide);
        self.toggle_notifications(NotificationKind::Collide, false)
    }

    /// 注册巡线回调，并开启机器人的巡线通知
    pub fn on_follow<F>(&mut self, handler: F) -> Result<&mut Self, DriverError>
    where
        F: Fn(i64, &InboundMessage, &Artie) + Send + Sync + 'static,
    {
        self.dispatcher.set_follow(handler);
        self.toggle_notifications(NotificationKind::Follow, true)
    }

    /// 移除巡线回调，并关闭机器人的巡线通知
    pub fn clear_follow(&mut self) -> Result<&mut Self, DriverError> {
        self.dispatcher.clear(NotificationKind::Follow);
        self.toggle_notifications(NotificationKind::Follow, false)
    }

    fn toggle_notifications(
        &mut self,
        kind: NotificationKind,
        enabled: bool,
    ) -> Result<&mut Self, DriverError> {
        // 固件期望字符串 "true" / "false"
        let arg = if enabled { "true" } else { "false" };
        self.act(kind.toggle_command(), Some(json!(arg)))
    }

    // ==================== 发送 ====================

    /// 使用默认超时发送命令
    pub fn send(&mut self, cmd: impl Into<String>, arg: Option<Value>) -> Result<Reply, DriverError> {
        self.send_with_timeout(cmd, arg, self.timeout)
    }

    /// 发送命令并等待完成
    ///
    /// 失败时若注册了错误回调，回调的返回值作为本次调用的结果；
    /// `InterruptedWait` 和 `NotConnected` 不经过回调。
    pub fn send_with_timeout(
        &mut self,
        cmd: impl Into<String>,
        arg: Option<Value>,
        timeout: Duration,
    ) -> Result<Reply, DriverError> {
        let request = match self.connection.as_mut() {
            Some(conn) => conn.next_request(cmd, arg),
            None => return Err(DriverError::NotConnected),
        };

        let this: &Artie = self;
        match this.send_or_raise(&request, timeout) {
            Err(e) if !e.is_interrupt() => match &this.on_error {
                Some(handler) => {
                    debug!("Routing failure of {} to error handler: {}", request, e);
                    handler(&e, &request, timeout, this)
                },
                None => Err(e),
            },
            other => other,
        }
    }

    fn send_or_raise(&self, request: &OutboundMessage, timeout: Duration) -> Result<Reply, DriverError> {
        let conn = self.connection.as_ref().ok_or(DriverError::NotConnected)?;
        conn.enqueue(request)?;
        conn.wait(request, timeout, |kind, msg| {
            Ok(self.dispatcher.dispatch(kind, msg, self)?)
        })
    }

    /// 发送动作命令，返回自身以便链式调用
    pub(crate) fn act(
        &mut self,
        cmd: impl Into<String>,
        arg: Option<Value>,
    ) -> Result<&mut Self, DriverError> {
        self.send(cmd, arg)?;
        Ok(self)
    }
}

impl Default for Artie {
    fn default() -> Self {
        Self::new(DistanceUnit::Mm, DEFAULT_TIMEOUT)
    }
}

impl fmt::Debug for Artie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artie")
            .field("connected", &self.is_connected())
            .field("nonce", &self.connection.as_ref().map(Connection::nonce))
            .field("unit", &self.unit)
            .field("timeout", &self.timeout)
            .field("version", &self.version)
            .field("dispatcher", &self.dispatcher)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

fn display_reply(reply: &Reply) -> String {
    match reply {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}
