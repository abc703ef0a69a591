//! Builder 模式实现
//!
//! 提供链式构造 [`Connection`] 的便捷方式。

use crate::connection::Connection;
use crate::error::DriverError;
use crate::pipeline::PipelineConfig;
use artie_transport::{DEFAULT_PATH, DEFAULT_PORT, Transport, WebSocketTransport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// 机器人默认地址（机器人自带热点）
pub const DEFAULT_HOST: &str = "192.168.4.1";

/// 默认 TCP 连接超时
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use artie_driver::{ConnectionBuilder, PipelineConfig};
///
/// // 默认地址 ws://192.168.4.1:8899/websocket
/// let conn = ConnectionBuilder::new().build().unwrap();
///
/// let conn = ConnectionBuilder::new()
///     .host("10.0.0.42")
///     .pipeline_config(PipelineConfig {
///         receive_timeout_ms: 5,
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ConnectionBuilder {
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    connect_timeout: Option<Duration>,
    pipeline_config: Option<PipelineConfig>,
    /// 固定 ID 前缀的随机种子（用于可复现的测试）
    nonce_seed: Option<u64>,
}

impl ConnectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置机器人地址（可选，默认 [`DEFAULT_HOST`]）
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// 设置端口（可选，默认 8899）
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// 设置 WebSocket 路径（可选，默认 "/websocket"）
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.pipeline_config = Some(config);
        self
    }

    pub fn nonce_seed(mut self, seed: u64) -> Self {
        self.nonce_seed = Some(seed);
        self
    }

    /// 连接 URL（用于日志与诊断）
    pub fn url(&self) -> String {
        format!(
            "ws://{}:{}{}",
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
            self.path.as_deref().unwrap_or(DEFAULT_PATH)
        )
    }

    /// 建立 WebSocket 连接并启动 IO 线程
    ///
    /// # 错误
    /// - `DriverError::Transport`: 连接或握手失败
    pub fn build(self) -> Result<Connection, DriverError> {
        let transport = WebSocketTransport::connect(
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
            self.path.as_deref().unwrap_or(DEFAULT_PATH),
            self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        )?;
        Ok(self.build_with_transport(transport))
    }

    /// 使用自定义传输层启动连接
    pub fn build_with_transport<T>(self, transport: T) -> Connection
    where
        T: Transport + Send + 'static,
    {
        let config = self.pipeline_config.unwrap_or_default();
        match self.nonce_seed {
            Some(seed) => Connection::open(transport, &mut StdRng::seed_from_u64(seed), config),
            None => Connection::open(transport, &mut rand::thread_rng(), config),
        }
    }
}
