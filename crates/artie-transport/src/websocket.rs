//! WebSocket 传输
//!
//! 使用同步 `tungstenite` 连接机器人内置的 WebSocket 服务（默认 `ws://192.168.4.1:8899/websocket`）。
//! 每条出站消息编码为一个 JSON 文本帧；入站文本帧/二进制帧按 JSON 解码。

use crate::{Transport, TransportError};
use artie_protocol::{InboundMessage, OutboundMessage};
use std::io::ErrorKind;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info, warn};
use tungstenite::{Message, WebSocket};

/// 机器人 WebSocket 服务默认端口
pub const DEFAULT_PORT: u16 = 8899;

/// 机器人 WebSocket 服务默认路径
pub const DEFAULT_PATH: &str = "/websocket";

/// WebSocket 传输
pub struct WebSocketTransport {
    /// 连接（断开后为 None）
    socket: Option<WebSocket<TcpStream>>,
    url: String,
}

impl WebSocketTransport {
    /// 建立 TCP 连接并完成 WebSocket 握手
    ///
    /// # 参数
    /// - `host`: 机器人地址（如 "192.168.4.1"）
    /// - `port`: 端口（通常为 [`DEFAULT_PORT`]）
    /// - `path`: 路径（通常为 [`DEFAULT_PATH`]）
    /// - `connect_timeout`: TCP 连接超时
    ///
    /// # 错误
    /// - `TransportError::Connect`: 地址解析失败、TCP 连接失败或握手失败
    pub fn connect(
        host: &str,
        port: u16,
        path: &str,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let url = format!("ws://{}:{}{}", host, port, path);

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| TransportError::Connect(format!("Failed to resolve {}: {}", host, e)))?
            .next()
            .ok_or_else(|| TransportError::Connect(format!("No address found for {}", host)))?;

        let stream = TcpStream::connect_timeout(&addr, connect_timeout)
            .map_err(|e| TransportError::Connect(format!("TCP connect to {} failed: {}", addr, e)))?;
        stream.set_nodelay(true)?;

        // 握手期间保持阻塞模式，读超时在握手完成后再设置
        let (socket, _response) = tungstenite::client(url.as_str(), stream).map_err(|e| {
            TransportError::Connect(format!("WebSocket handshake with {} failed: {}", url, e))
        })?;

        info!("Connected to {}", url);

        Ok(Self {
            socket: Some(socket),
            url,
        })
    }

    /// 连接 URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn socket_mut(&mut self) -> Result<&mut WebSocket<TcpStream>, TransportError> {
        self.socket.as_mut().ok_or(TransportError::ConnectionLost)
    }
}

fn decode(bytes: &[u8]) -> Result<InboundMessage, TransportError> {
    serde_json::from_slice(bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

fn map_ws_error(err: tungstenite::Error) -> TransportError {
    match err {
        tungstenite::Error::Io(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            TransportError::Timeout
        },
        tungstenite::Error::Io(e) => TransportError::Io(e),
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::ConnectionLost
        },
        other => TransportError::WebSocket(other.to_string()),
    }
}

impl Transport for WebSocketTransport {
    fn send(&mut self, msg: &OutboundMessage) -> Result<(), TransportError> {
        let text = serde_json::to_string(msg).map_err(|e| TransportError::Encode(e.to_string()))?;
        let result = self.socket_mut()?.send(Message::Text(text));
        result.map_err(|e| {
            let err = map_ws_error(e);
            if err.is_fatal() {
                self.socket = None;
            }
            err
        })
    }

    fn receive(&mut self) -> Result<InboundMessage, TransportError> {
        loop {
            let result = self.socket_mut()?.read();
            match result {
                Ok(Message::Text(text)) => return decode(text.as_bytes()),
                Ok(Message::Binary(data)) => return decode(&data),
                Ok(Message::Close(frame)) => {
                    debug!("Peer closed WebSocket: {:?}", frame);
                    self.socket = None;
                    return Err(TransportError::ConnectionLost);
                },
                // tungstenite 在 read 时自动排队 pong
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => continue,
                Err(e) => {
                    let err = map_ws_error(e);
                    if err.is_fatal() {
                        self.socket = None;
                    }
                    return Err(err);
                },
            }
        }
    }

    fn set_receive_timeout(&mut self, timeout: Duration) {
        // set_read_timeout 不接受零时长
        let timeout = timeout.max(Duration::from_millis(1));
        if let Some(socket) = self.socket.as_ref()
            && let Err(e) = socket.get_ref().set_read_timeout(Some(timeout))
        {
            warn!("Failed to set read timeout on {}: {}", self.url, e);
        }
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut socket) = self.socket.take() {
            // 尽力而为：对端可能已经断开
            let _ = socket.close(None);
            let _ = socket.flush();
            info!("Disconnected from {}", self.url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artie_protocol::Status;

    #[test]
    fn test_decode_inbound() {
        let msg = decode(br#"{"id":"abcd0001","status":"accepted"}"#).unwrap();
        assert_eq!(msg.id, "abcd0001");
        assert_eq!(msg.status, Status::Accepted);
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode(b"not json"), Err(TransportError::Decode(_))));
    }

    #[test]
    fn test_map_ws_error() {
        let timeout = tungstenite::Error::Io(std::io::Error::from(ErrorKind::WouldBlock));
        assert!(matches!(map_ws_error(timeout), TransportError::Timeout));

        let closed = tungstenite::Error::ConnectionClosed;
        assert!(matches!(map_ws_error(closed), TransportError::ConnectionLost));

        let reset = tungstenite::Error::Io(std::io::Error::from(ErrorKind::ConnectionReset));
        assert!(map_ws_error(reset).is_fatal());
    }

    #[test]
    fn test_connect_refused() {
        // 绑定后立即释放端口，保证没有服务监听
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let result =
            WebSocketTransport::connect("127.0.0.1", port, DEFAULT_PATH, Duration::from_millis(200));
        assert!(matches!(result, Err(TransportError::Connect(_))));
    }
}
