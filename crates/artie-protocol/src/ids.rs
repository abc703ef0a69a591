//! 关联 ID 定义模块
//!
//! 每个出站命令都带有一个关联 ID，机器人在回复（`accepted` / `complete`）时原样带回。
//!
//! # 格式
//!
//! ```text
//! <nonce: 4 位字母数字><seq: 4 位小写十六进制>
//!   "aB3x"             "0001"
//! ```
//!
//! - nonce 在每次连接时随机生成一次，用于区分不同连接
//! - seq 每次递增，模 65536 回绕（`0xffff` 之后是 `0000`）

use crate::ProtocolError;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 碰撞通知的保留 ID
pub const COLLIDE_TOKEN: &str = "collide";

/// 巡线通知的保留 ID
pub const FOLLOW_TOKEN: &str = "follow";

/// nonce 长度（字符数）
pub const NONCE_LEN: usize = 4;

/// 关联 ID
///
/// 在单个连接的生命周期内唯一（回绕前）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// 获取字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 检查入站消息的 `id` 字段是否属于本请求
    pub fn matches(&self, id: &str) -> bool {
        self.0 == id
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 关联 ID 生成器
///
/// 每个连接一个实例。`next_id()` 需要 `&mut self`，
/// 因此同一连接上的命令发出天然是串行的。
#[derive(Debug, Clone)]
pub struct IdGenerator {
    nonce: String,
    seq: u16,
}

impl IdGenerator {
    /// 使用注入的随机源生成 nonce
    ///
    /// # Example
    ///
    /// ```
    /// use artie_protocol::IdGenerator;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut ids = IdGenerator::new(&mut rng);
    /// let id = ids.next_id();
    /// assert_eq!(id.as_str().len(), 8);
    /// assert!(id.as_str().ends_with("0001"));
    /// ```
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let nonce: String = (0..NONCE_LEN).map(|_| char::from(rng.sample(Alphanumeric))).collect();
        Self { nonce, seq: 0 }
    }

    /// 使用固定 nonce 创建（测试或回放场景）
    ///
    /// # 错误
    /// - `ProtocolError::InvalidNonce`: nonce 不是 4 个 ASCII 字母数字字符
    pub fn with_nonce(nonce: impl Into<String>) -> Result<Self, ProtocolError> {
        let nonce = nonce.into();
        if nonce.len() != NONCE_LEN || !nonce.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(ProtocolError::InvalidNonce {
                nonce,
                expected: NONCE_LEN,
            });
        }
        Ok(Self { nonce, seq: 0 })
    }

    /// 本连接的 nonce
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// 生成下一个关联 ID
    ///
    /// 先递增再格式化，所以第一个 ID 的序号是 `0001`。永不阻塞，永不失败。
    pub fn next_id(&mut self) -> CorrelationId {
        self.seq = self.seq.wrapping_add(1);
        CorrelationId(format!("{}{:04x}", self.nonce, self.seq))
    }
}
