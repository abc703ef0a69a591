//! 通知交织的属性测试

mod common;

use artie_sdk::prelude::*;
use common::{connect, respond};
use proptest::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn collide_payload() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("left"), Just("right"), Just("both"), Just("front"), Just("")]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_reply_survives_interleaved_collisions(
        payloads in prop::collection::vec(collide_payload(), 0..12),
        before_accept in any::<bool>(),
        reply in any::<i32>(),
    ) {
        let (mut artie, robot) = connect(42);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let server = common::serve(&robot, None);
        let sink = seen.clone();
        artie.on_collide(move |event, _, _| sink.lock().unwrap().push(event)).unwrap();
        server.join().unwrap();

        let script_payloads = payloads.clone();
        let server = respond(&robot, move |cmd| {
            let mut script = Vec::new();
            if !before_accept {
                script.push(InboundMessage::accepted(&cmd.id));
            }
            for payload in &script_payloads {
                script.push(InboundMessage::collide(json!(payload)));
            }
            if before_accept {
                script.push(InboundMessage::accepted(&cmd.id));
            }
            script.push(InboundMessage::complete(&cmd.id, Some(json!(reply))));
            script
        });

        let result = artie.collide_state().unwrap();
        server.join().unwrap();

        prop_assert_eq!(result, Some(json!(reply)));
        let seen = seen.lock().unwrap();
        prop_assert_eq!(seen.len(), payloads.len());
        for (event, payload) in seen.iter().zip(&payloads) {
            prop_assert_eq!(*event, CollisionEvent::from_payload(Some(&json!(payload))));
        }
    }
}
