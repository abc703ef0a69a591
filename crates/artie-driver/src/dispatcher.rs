//! 通知分发模块
//!
//! 每类通知最多注册一个处理函数；未注册时通知被静默丢弃（不是错误）。
//! 处理函数在调用线程的等待循环中同步执行，第三个参数是客户端句柄。
//!
//! # 使用示例
//!
//! ```rust
//! use artie_driver::NotificationDispatcher;
//! use artie_protocol::{InboundMessage, NotificationKind};
//! use serde_json::json;
//!
//! struct Robot;
//!
//! let mut dispatcher = NotificationDispatcher::<Robot>::new();
//! dispatcher.set_collide(|event, _msg, _robot| {
//!     println!("bump: left={} right={}", event.left, event.right);
//! });
//!
//! let msg = InboundMessage::collide(json!("both"));
//! let dispatched = dispatcher.dispatch(NotificationKind::Collide, &msg, &Robot).unwrap();
//! assert!(dispatched);
//! ```

use artie_protocol::{
    CollisionEvent, InboundMessage, NotificationKind, ProtocolError, decode_follow_state,
};
use tracing::debug;

/// 碰撞通知处理函数：`(event, raw_message, handle)`
pub type CollideHandler<H> = Box<dyn Fn(CollisionEvent, &InboundMessage, &H) + Send + Sync>;

/// 巡线通知处理函数：`(state, raw_message, handle)`
pub type FollowHandler<H> = Box<dyn Fn(i64, &InboundMessage, &H) + Send + Sync>;

/// 通知分发器
pub struct NotificationDispatcher<H: ?Sized> {
    collide: Option<CollideHandler<H>>,
    follow: Option<FollowHandler<H>>,
}

impl<H: ?Sized> Default for NotificationDispatcher<H> {
    fn default() -> Self {
        Self {
            collide: None,
            follow: None,
        }
    }
}

impl<H: ?Sized> NotificationDispatcher<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册碰撞处理函数（替换已有的）
    pub fn set_collide<F>(&mut self, handler: F)
    where
        F: Fn(CollisionEvent, &InboundMessage, &H) + Send + Sync + 'static,
    {
        self.collide = Some(Box::new(handler));
    }

    /// 注册巡线处理函数（替换已有的）
    pub fn set_follow<F>(&mut self, handler: F)
    where
        F: Fn(i64, &InboundMessage, &H) + Send + Sync + 'static,
    {
        self.follow = Some(Box::new(handler));
    }

    /// 移除某类处理函数，返回之前是否已注册
    pub fn clear(&mut self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Collide => self.collide.take().is_some(),
            NotificationKind::Follow => self.follow.take().is_some(),
        }
    }

    pub fn is_registered(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Collide => self.collide.is_some(),
            NotificationKind::Follow => self.follow.is_some(),
        }
    }

    /// 分发一条通知
    ///
    /// # 返回值
    /// 已交给处理函数返回 `true`；未注册而丢弃返回 `false`。
    ///
    /// # 错误
    /// - `ProtocolError::InvalidFollowState`: 已注册巡线处理函数，但载荷无法解码
    pub fn dispatch(
        &self,
        kind: NotificationKind,
        msg: &InboundMessage,
        handle: &H,
    ) -> Result<bool, ProtocolError> {
        match kind {
            NotificationKind::Collide => match &self.collide {
                Some(handler) => {
                    handler(CollisionEvent::from_payload(msg.msg.as_ref()), msg, handle);
                    Ok(true)
                },
                None => {
                    debug!("Dropping unobserved notification {}", msg);
                    Ok(false)
                },
            },
            NotificationKind::Follow => match &self.follow {
                Some(handler) => {
                    let state = decode_follow_state(msg.msg.as_ref())?;
                    handler(state, msg, handle);
                    Ok(true)
                },
                None => {
                    debug!("Dropping unobserved notification {}", msg);
                    Ok(false)
                },
            },
        }
    }
}

impl<H: ?Sized> std::fmt::Debug for NotificationDispatcher<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("collide", &self.collide.is_some())
            .field("follow", &self.follow.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct Handle {
        name: &'static str,
    }

    #[test]
    fn test_collide_dispatch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = NotificationDispatcher::<Handle>::new();
        let sink = seen.clone();
        dispatcher.set_collide(move |event, msg, handle| {
            sink.lock().unwrap().push((event.left, event.right, msg.id.clone(), handle.name));
        });

        let handle = Handle { name: "artie" };
        for payload in ["left", "right", "both", "front"] {
            let msg = InboundMessage::collide(json!(payload));
            assert!(dispatcher.dispatch(NotificationKind::Collide, &msg, &handle).unwrap());
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], (true, false, "collide".to_string(), "artie"));
        assert_eq!(seen[1].0, false);
        assert_eq!(seen[1].1, true);
        assert_eq!((seen[2].0, seen[2].1), (true, true));
        assert_eq!((seen[3].0, seen[3].1), (false, false));
    }

    #[test]
    fn test_follow_dispatch() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = NotificationDispatcher::<Handle>::new();
        let sink = seen.clone();
        dispatcher.set_follow(move |state, _, _| sink.lock().unwrap().push(state));

        let handle = Handle { name: "artie" };
        dispatcher
            .dispatch(NotificationKind::Follow, &InboundMessage::follow(json!(3)), &handle)
            .unwrap();
        dispatcher
            .dispatch(NotificationKind::Follow, &InboundMessage::follow(json!("-1")), &handle)
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![3, -1]);
    }

    #[test]
    fn test_follow_invalid_payload() {
        let mut dispatcher = NotificationDispatcher::<Handle>::new();
        dispatcher.set_follow(|_, _, _| panic!("must not be called"));

        let handle = Handle { name: "artie" };
        let result =
            dispatcher.dispatch(NotificationKind::Follow, &InboundMessage::follow(json!("abc")), &handle);
        assert!(matches!(result, Err(ProtocolError::InvalidFollowState { .. })));
    }

    #[test]
    fn test_unregistered_is_dropped() {
        let dispatcher = NotificationDispatcher::<Handle>::new();
        let handle = Handle { name: "artie" };

        let collide = InboundMessage::collide(json!("left"));
        assert!(!dispatcher.dispatch(NotificationKind::Collide, &collide, &handle).unwrap());

        // 未注册时不解码，非法载荷也不报错
        let follow = InboundMessage::follow(json!("abc"));
        assert!(!dispatcher.dispatch(NotificationKind::Follow, &follow, &handle).unwrap());
    }

    #[test]
    fn test_clear() {
        let mut dispatcher = NotificationDispatcher::<Handle>::new();
        dispatcher.set_collide(|_, _, _| {});
        assert!(dispatcher.is_registered(NotificationKind::Collide));
        assert!(!dispatcher.is_registered(NotificationKind::Follow));

        assert!(dispatcher.clear(NotificationKind::Collide));
        assert!(!dispatcher.clear(NotificationKind::Collide));
        assert!(!dispatcher.is_registered(NotificationKind::Collide));
        assert_eq!(
            format!("{:?}", dispatcher),
            "NotificationDispatcher { collide: false, follow: false }"
        );
    }
}
