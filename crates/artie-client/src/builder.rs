//! Client 层 Artie Builder
//!
//! 提供链式 API 创建已连接的 [`Artie`] 实例。

use crate::artie::Artie;
use crate::config::ClientConfig;
use crate::units::DistanceUnit;
use artie_driver::{ConnectionBuilder, DEFAULT_TIMEOUT, DriverError, PipelineConfig};
use artie_transport::Transport;
use std::time::Duration;

/// Client 层 Artie Builder
///
/// # 示例
///
/// ```rust,no_run
/// use artie_client::{ArtieBuilder, DistanceUnit};
/// use std::time::Duration;
///
/// # fn main() -> Result<(), artie_driver::DriverError> {
/// // 默认地址 192.168.4.1
/// let artie = ArtieBuilder::new().build()?;
///
/// let artie = ArtieBuilder::new()
///     .address("10.0.0.42")
///     .unit(DistanceUnit::Cm)
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ArtieBuilder {
    connection: ConnectionBuilder,
    unit: Option<DistanceUnit>,
    timeout: Option<Duration>,
    debug: bool,
}

impl ArtieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化配置创建 Builder
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new()
            .address(config.address.as_str())
            .port(config.port)
            .path(config.path.as_str())
            .unit(config.unit)
            .timeout(config.timeout())
            .debug(config.debug)
    }

    /// 机器人地址（默认 "192.168.4.1"）
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.connection = self.connection.host(address);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.connection = self.connection.port(port);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.connection = self.connection.path(path);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connection = self.connection.connect_timeout(timeout);
        self
    }

    pub fn pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.connection = self.connection.pipeline_config(config);
        self
    }

    /// 固定 ID 前缀的随机种子
    pub fn nonce_seed(mut self, seed: u64) -> Self {
        self.connection = self.connection.nonce_seed(seed);
        self
    }

    /// 初始距离单位（默认毫米）
    pub fn unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// 默认命令超时（默认 5 秒）
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// 调试日志
    ///
    /// 开启后，连接前以 `artie=debug` 安装全局日志订阅者（`RUST_LOG` 优先）。
    /// 应用程序已经安装了订阅者时不做任何事。
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 连接 URL
    pub fn url(&self) -> String {
        self.connection.url()
    }

    fn client(&self) -> Artie {
        if self.debug && crate::logging::init_logger_debug(true) {
            tracing::debug!("Debug logging enabled for {}", self.url());
        }
        Artie::new(
            self.unit.unwrap_or_default(),
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )
    }

    /// 连接机器人并查询固件版本
    ///
    /// # 错误
    /// - `DriverError::Transport`: 连接失败
    /// - 版本查询的任何失败（例如 `Timeout`）
    pub fn build(self) -> Result<Artie, DriverError> {
        let mut artie = self.client();
        let connection = self.connection.build()?;
        artie.connect(connection)?;
        Ok(artie)
    }

    /// 使用自定义传输层连接
    pub fn build_with_transport<T>(self, transport: T) -> Result<Artie, DriverError>
    where
        T: Transport + Send + 'static,
    {
        let mut artie = self.client();
        let connection = self.connection.build_with_transport(transport);
        artie.connect(connection)?;
        Ok(artie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artie_transport::MockTransport;
    use serde_json::json;
    use serial_test::serial;

    #[test]
    fn test_artie_builder_default() {
        let builder = ArtieBuilder::default();
        assert_eq!(builder.unit, None);
        assert_eq!(builder.timeout, None);
        assert!(!builder.debug);
        assert_eq!(builder.url(), "ws://192.168.4.1:8899/websocket");
    }

    #[test]
    fn test_artie_builder_chain() {
        let builder = ArtieBuilder::new()
            .address("artie.local")
            .port(80)
            .unit(DistanceUnit::Inch)
            .timeout(Duration::from_secs(9));

        assert_eq!(builder.url(), "ws://artie.local:80/websocket");
        assert_eq!(builder.unit, Some(DistanceUnit::Inch));
        assert_eq!(builder.timeout, Some(Duration::from_secs(9)));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            address: "10.1.1.1".to_string(),
            path: "/ws".to_string(),
            timeout_ms: 1500,
            unit: DistanceUnit::Cm,
            debug: true,
            ..Default::default()
        };
        let builder = ArtieBuilder::from_config(&config);
        assert_eq!(builder.url(), "ws://10.1.1.1:8899/ws");
        assert_eq!(builder.unit, Some(DistanceUnit::Cm));
        assert_eq!(builder.timeout, Some(Duration::from_millis(1500)));
        assert!(builder.debug);

        let quiet = ArtieBuilder::from_config(&ClientConfig::default());
        assert!(!quiet.debug);
    }

    #[test]
    #[serial]
    fn test_debug_build_installs_logger() {
        let (transport, robot) = MockTransport::pair();
        let server = std::thread::spawn(move || {
            robot.serve_one(Duration::from_secs(2), Some(json!("2.0.0")));
        });
        let artie = ArtieBuilder::new()
            .debug(true)
            .build_with_transport(transport)
            .unwrap();
        server.join().unwrap();

        assert!(artie.is_connected());
        // 全局订阅者已存在
        assert!(!crate::logging::init_logger());
    }

    #[test]
    fn test_handshake_timeout_fails_build() {
        let (transport, _robot) = MockTransport::pair();
        let result = ArtieBuilder::new()
            .timeout(Duration::from_millis(30))
            .build_with_transport(transport);
        assert!(matches!(result, Err(ref e) if e.is_acceptance_timeout()));
    }

    #[test]
    fn test_build_with_transport_applies_settings() {
        let (transport, robot) = MockTransport::pair();
        let server = std::thread::spawn(move || {
            robot.serve_one(Duration::from_secs(2), Some(json!("2.0.0")));
        });
        let artie = ArtieBuilder::new()
            .unit(DistanceUnit::Cm)
            .timeout(Duration::from_secs(3))
            .build_with_transport(transport)
            .unwrap();
        server.join().unwrap();

        assert_eq!(artie.unit(), DistanceUnit::Cm);
        assert_eq!(artie.timeout(), Duration::from_secs(3));
        assert_eq!(artie.version(), Some(&json!("2.0.0")));
    }
}
