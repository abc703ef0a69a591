//! 日志初始化
//!
//! SDK 内部统一使用 `tracing` 记录日志。应用程序可以调用 [`init_logger`]
//! 安装一个输出到 stderr 的 `tracing-subscriber`，并把 `log` crate 的记录桥接过来。
//! [`ArtieBuilder::debug`](crate::ArtieBuilder::debug) 在连接前以 [`DEBUG_FILTER`] 安装。
//!
//! 过滤规则优先取 `RUST_LOG` 环境变量，否则使用默认值（`artie=info`）。
//!
//! ```rust,no_run
//! artie_client::logging::init_logger();
//! tracing::info!("ready");
//! ```

use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_FILTER: &str = "artie=info";

/// 调试模式过滤规则
pub const DEBUG_FILTER: &str = "artie=debug";

/// 按 `RUST_LOG` 或给定默认值构造过滤器
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// 以默认过滤规则初始化日志
///
/// 返回本次调用是否安装了全局订阅者（重复调用返回 `false`）。
pub fn init_logger() -> bool {
    init_logger_with(DEFAULT_FILTER)
}

/// 以调试或默认过滤规则初始化日志
pub fn init_logger_debug(debug: bool) -> bool {
    init_logger_with(if debug { DEBUG_FILTER } else { DEFAULT_FILTER })
}

/// 以指定的默认过滤规则初始化日志
pub fn init_logger_with(default_filter: &str) -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    // 其他库可能已经安装了 log 记录器
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("log bridge not installed: {}", e);
    }
    true
}
