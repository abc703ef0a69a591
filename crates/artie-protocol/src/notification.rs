//! 异步通知解码
//!
//! 机器人在同一条连接上主动推送两类通知，用保留的伪 ID 标识：
//!
//! | id        | msg                                  |
//! |-----------|--------------------------------------|
//! | `collide` | `"left"` / `"right"` / `"both"` / …  |
//! | `follow`  | 整数状态（数字或十进制字符串）       |

use crate::ProtocolError;
use crate::ids::{COLLIDE_TOKEN, FOLLOW_TOKEN};
use serde_json::Value;

/// 通知类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// 碰撞传感器
    Collide,
    /// 巡线传感器
    Follow,
}

impl NotificationKind {
    /// 根据入站消息的 `id` 识别通知类别
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            COLLIDE_TOKEN => Some(NotificationKind::Collide),
            FOLLOW_TOKEN => Some(NotificationKind::Follow),
            _ => None,
        }
    }

    /// 开启/关闭该类通知的服务端命令名
    pub fn toggle_command(&self) -> &'static str {
        match self {
            NotificationKind::Collide => "collideNotify",
            NotificationKind::Follow => "followNotify",
        }
    }
}

/// 碰撞事件（左右两侧相互独立）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionEvent {
    pub left: bool,
    pub right: bool,
}

impl CollisionEvent {
    /// 解码碰撞载荷
    ///
    /// `"both"` 两侧都触发，`"left"` / `"right"` 触发一侧，其他任何值（包括非字符串）都不触发。
    pub fn from_payload(payload: Option<&Value>) -> Self {
        match payload.and_then(Value::as_str) {
            Some("both") => Self {
                left: true,
                right: true,
            },
            Some("left") => Self {
                left: true,
                right: false,
            },
            Some("right") => Self {
                left: false,
                right: true,
            },
            _ => Self::default(),
        }
    }
}

/// 解码巡线状态
///
/// # 错误
/// - `ProtocolError::InvalidFollowState`: 载荷既不是整数（含 `2.0` 这类整值浮点数）也不是十进制整数字符串
pub fn decode_follow_state(payload: Option<&Value>) -> Result<i64, ProtocolError> {
    let state = match payload {
        Some(Value::Number(n)) => n.as_i64().or_else(|| integral(n.as_f64()?)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    state.ok_or_else(|| ProtocolError::InvalidFollowState {
        payload: payload.map(Value::to_string).unwrap_or_else(|| "null".to_string()),
    })
}

/// 没有小数部分且在 i64 精确范围内的浮点数（例如 `2.0`）
fn integral(f: f64) -> Option<i64> {
    // 2^53 以内的整数可被 f64 精确表示
    const EXACT: f64 = 9_007_199_254_740_992.0;
    (f.fract() == 0.0 && f.abs() <= EXACT).then_some(f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_id() {
        assert_eq!(
            NotificationKind::from_id("collide"),
            Some(NotificationKind::Collide)
        );
        assert_eq!(
            NotificationKind::from_id("follow"),
            Some(NotificationKind::Follow)
        );
        assert_eq!(NotificationKind::from_id("abcd0001"), None);
        assert_eq!(NotificationKind::from_id("Collide"), None);
    }

    #[test]
    fn test_toggle_commands() {
        assert_eq!(NotificationKind::Collide.toggle_command(), "collideNotify");
        assert_eq!(NotificationKind::Follow.toggle_command(), "followNotify");
    }

    #[test]
    fn test_collision_decoding_table() {
        let both = CollisionEvent::from_payload(Some(&json!("both")));
        assert_eq!((both.left, both.right), (true, true));

        let left = CollisionEvent::from_payload(Some(&json!("left")));
        assert_eq!((left.left, left.right), (true, false));

        let right = CollisionEvent::from_payload(Some(&json!("right")));
        assert_eq!((right.left, right.right), (false, true));

        let none = CollisionEvent::from_payload(Some(&json!("front")));
        assert_eq!((none.left, none.right), (false, false));

        assert_eq!(CollisionEvent::from_payload(None), CollisionEvent::default());
        assert_eq!(
            CollisionEvent::from_payload(Some(&json!(1))),
            CollisionEvent::default()
        );
    }

    #[test]
    fn test_follow_state_decoding() {
        assert_eq!(decode_follow_state(Some(&json!(3))), Ok(3));
        assert_eq!(decode_follow_state(Some(&json!("-1"))), Ok(-1));
        assert_eq!(decode_follow_state(Some(&json!(" 12 "))), Ok(12));
        assert!(matches!(
            decode_follow_state(Some(&json!("left"))),
            Err(ProtocolError::InvalidFollowState { .. })
        ));
        assert_eq!(decode_follow_state(Some(&json!(2.0))), Ok(2));
        assert_eq!(decode_follow_state(Some(&json!(-0.0))), Ok(0));
        assert!(decode_follow_state(Some(&json!(1.5))).is_err());
        assert!(decode_follow_state(Some(&json!(1e300))).is_err());
        assert!(decode_follow_state(None).is_err());
    }

    proptest! {
        #[test]
        fn prop_unknown_collision_payload_sets_neither(s in "[a-z]{0,8}") {
            prop_assume!(s != "left" && s != "right" && s != "both");
            let event = CollisionEvent::from_payload(Some(&Value::String(s)));
            prop_assert!(!event.left && !event.right);
        }
    }
}
