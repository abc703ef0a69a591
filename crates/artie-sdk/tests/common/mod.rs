//! 集成测试共用的模拟机器人

#![allow(dead_code)]

use artie_sdk::driver::PipelineConfig;
use artie_sdk::prelude::*;
use artie_sdk::transport::{MockRobot, MockTransport};
use serde_json::{Value, json};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const WAIT: Duration = Duration::from_secs(2);

pub fn fast_pipeline() -> PipelineConfig {
    PipelineConfig {
        receive_timeout_ms: 2,
        join_timeout_ms: 500,
    }
}

/// 连接到模拟机器人（完成版本握手）
pub fn connect(seed: u64) -> (Artie, MockRobot) {
    let (transport, robot) = MockTransport::pair();
    let server = robot.clone();
    let handshake = thread::spawn(move || server.serve_one(WAIT, Some(json!("1.0.3"))));

    let artie = ArtieBuilder::new()
        .nonce_seed(seed)
        .pipeline_config(fast_pipeline())
        .build_with_transport(transport)
        .expect("handshake failed");
    handshake.join().unwrap().expect("no version request");
    (artie, robot)
}

/// 脚本化回复：收到下一条命令后依次推送 `script(cmd)` 返回的消息
pub fn respond<F>(robot: &MockRobot, script: F) -> JoinHandle<OutboundMessage>
where
    F: FnOnce(&OutboundMessage) -> Vec<InboundMessage> + Send + 'static,
{
    let robot = robot.clone();
    thread::spawn(move || {
        let cmd = robot.next_command(WAIT).expect("no command received");
        for msg in script(&cmd) {
            robot.push(msg);
        }
        cmd
    })
}

/// 标准的 accepted → complete 回复
pub fn serve(robot: &MockRobot, reply: Option<Value>) -> JoinHandle<OutboundMessage> {
    respond(robot, move |cmd| {
        vec![
            InboundMessage::accepted(&cmd.id),
            InboundMessage::complete(&cmd.id, reply),
        ]
    })
}
