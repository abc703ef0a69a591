//! 机器人命令
//!
//! 每个命令对应固件的一条 `cmd`。距离参数（`forward` / `back` / `arc`）在这里按当前单位
//! 换算为毫米，且只换算一次；角度参数以度为单位原样发送。

use crate::artie::Artie;
use artie_driver::DriverError;
use artie_protocol::Reply;
use serde_json::{Value, json};

/// `leds` 命令中代表全部 LED 的编号
pub const ALL_LEDS: u8 = 6;

/// 整数值按整数发送，其余按浮点数发送
///
/// NaN 和无穷大无法表示为 JSON 数字，直接拒绝。
fn number(cmd: &'static str, value: f64) -> Result<Value, DriverError> {
    if !value.is_finite() {
        return Err(DriverError::InvalidArgument { cmd, value });
    }
    Ok(if value.fract() == 0.0 && value.abs() < 1e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    })
}

impl Artie {
    fn distance(&self, cmd: &'static str, distance: f64) -> Result<Value, DriverError> {
        number(cmd, self.unit().to_mm(distance))
    }

    /// 连通性检查
    pub fn ping(&mut self) -> Result<&mut Self, DriverError> {
        self.act("ping", None)
    }

    /// 机器人运行时长
    pub fn uptime(&mut self) -> Result<Reply, DriverError> {
        self.send("uptime", None)
    }

    /// 查询固件版本（同时更新 [`Artie::version`]）
    pub fn fetch_version(&mut self) -> Result<Reply, DriverError> {
        let version = self.send("version", None)?;
        self.set_version(version.clone());
        Ok(version)
    }

    /// 前进
    pub fn forward(&mut self, distance: f64) -> Result<&mut Self, DriverError> {
        let arg = self.distance("forward", distance)?;
        self.act("forward", Some(arg))
    }

    /// 后退
    pub fn back(&mut self, distance: f64) -> Result<&mut Self, DriverError> {
        let arg = self.distance("back", distance)?;
        self.act("back", Some(arg))
    }

    /// 原地左转（度）
    pub fn left(&mut self, degrees: f64) -> Result<&mut Self, DriverError> {
        let arg = number("left", degrees)?;
        self.act("left", Some(arg))
    }

    /// 原地右转（度）
    pub fn right(&mut self, degrees: f64) -> Result<&mut Self, DriverError> {
        let arg = number("right", degrees)?;
        self.act("right", Some(arg))
    }

    /// 沿圆弧行进
    ///
    /// `distance` 按当前单位换算；`wheel_angle` 为转向角（度）。
    pub fn arc(&mut self, distance: f64, wheel_angle: f64) -> Result<&mut Self, DriverError> {
        let arg = json!([self.distance("arc", distance)?, number("arc", wheel_angle)?]);
        self.act("arc", Some(arg))
    }

    pub fn pen_up(&mut self) -> Result<&mut Self, DriverError> {
        self.act("penup", None)
    }

    /// 放下指定编号的笔
    pub fn pen_down(&mut self, pen: u8) -> Result<&mut Self, DriverError> {
        self.act("pendown", Some(json!(pen)))
    }

    /// 播放内置音效
    pub fn beep(&mut self, sound: u8) -> Result<&mut Self, DriverError> {
        self.act("beep", Some(json!(sound)))
    }

    /// 设置单个 LED 颜色（`rgb` 为十六进制颜色，如 "ff8800"）
    pub fn set_led(&mut self, led: u8, rgb: &str) -> Result<&mut Self, DriverError> {
        self.act("leds", Some(json!([led, rgb])))
    }

    pub fn set_all_leds(&mut self, rgb: &str) -> Result<&mut Self, DriverError> {
        self.set_led(ALL_LEDS, rgb)
    }

    /// 颜色传感器当前读数
    pub fn color_state(&mut self) -> Result<Reply, DriverError> {
        self.send("colorState", None)
    }

    /// 沿直线寻找指定颜色
    pub fn find_colour(&mut self, rgb: &str) -> Result<Reply, DriverError> {
        self.send("findColour", Some(json!(rgb)))
    }

    /// 开启/关闭巡线模式
    pub fn follow(&mut self, enabled: bool) -> Result<&mut Self, DriverError> {
        self.act("follow", Some(json!(enabled)))
    }

    pub fn collide_state(&mut self) -> Result<Reply, DriverError> {
        self.send("collideState", None)
    }

    pub fn follow_state(&mut self) -> Result<Reply, DriverError> {
        self.send("followState", None)
    }

    /// 电池电压
    pub fn voltage(&mut self) -> Result<Reply, DriverError> {
        self.send("getVoltage", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArtieBuilder;
    use artie_driver::PipelineConfig;
    use artie_protocol::OutboundMessage;
    use artie_transport::{MockRobot, MockTransport};
    use std::thread;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(2);

    fn connect_mock() -> (Artie, MockRobot) {
        let (transport, robot) = MockTransport::pair();
        let server = robot.clone();
        let handshake = thread::spawn(move || server.serve_one(WAIT, Some(json!("1.0.3"))));
        let artie = ArtieBuilder::new()
            .pipeline_config(PipelineConfig {
                receive_timeout_ms: 2,
                join_timeout_ms: 500,
            })
            .build_with_transport(transport)
            .unwrap();
        handshake.join().unwrap();
        (artie, robot)
    }

    /// 执行一条命令并返回机器人看到的出站消息
    fn exchange<F>(artie: &mut Artie, robot: &MockRobot, reply: Option<Value>, f: F) -> OutboundMessage
    where
        F: FnOnce(&mut Artie),
    {
        let robot = robot.clone();
        let server = thread::spawn(move || robot.serve_one(WAIT, reply).unwrap());
        f(artie);
        server.join().unwrap()
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number("forward", 100.0).unwrap(), json!(100));
        assert_eq!(number("left", -45.0).unwrap(), json!(-45));
        assert_eq!(number("forward", 101.6).unwrap(), json!(101.6));
        assert!(matches!(
            number("right", f64::INFINITY),
            Err(DriverError::InvalidArgument { cmd: "right", .. })
        ));
    }

    #[test]
    fn test_non_finite_argument_not_sent() {
        let (mut artie, robot) = connect_mock();

        let err = artie.forward(f64::NAN).unwrap_err();
        assert!(matches!(err, DriverError::InvalidArgument { cmd: "forward", .. }));
        assert!(artie.arc(10.0, f64::NEG_INFINITY).is_err());
        assert!(robot.next_command(Duration::from_millis(50)).is_none());

        // 连接不受影响
        let sent = exchange(&mut artie, &robot, None, |a| {
            a.forward(10.0).unwrap();
        });
        assert_eq!(sent.arg, Some(json!(10)));
    }

    #[test]
    fn test_distance_scaling() {
        let (mut artie, robot) = connect_mock();

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.forward(100.0).unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("forward", Some(json!(100))));

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.cm().back(12.5).unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("back", Some(json!(125))));

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.inches().forward(4.0).unwrap();
        });
        assert_eq!(sent.arg, Some(json!(101.6)));

        // 角度不受单位影响
        let sent = exchange(&mut artie, &robot, None, |a| {
            a.left(45.0).unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("left", Some(json!(45))));
    }

    #[test]
    fn test_arc_arguments() {
        let (mut artie, robot) = connect_mock();
        let sent = exchange(&mut artie, &robot, None, |a| {
            a.cm().arc(10.0, 90.0).unwrap();
        });
        assert_eq!(sent.cmd, "arc");
        assert_eq!(sent.arg, Some(json!([100, 90])));
    }

    #[test]
    fn test_pen_and_sound_commands() {
        let (mut artie, robot) = connect_mock();

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.pen_up().unwrap();
        });
        assert_eq!(sent.cmd, "penup");
        assert_eq!(sent.arg, None);

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.pen_down(2).unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("pendown", Some(json!(2))));

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.beep(3).unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("beep", Some(json!(3))));
    }

    #[test]
    fn test_led_commands() {
        let (mut artie, robot) = connect_mock();

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.set_led(2, "ff0000").unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("leds", Some(json!([2, "ff0000"]))));

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.set_all_leds("00ff00").unwrap();
        });
        assert_eq!(sent.arg, Some(json!([6, "00ff00"])));
    }

    #[test]
    fn test_queries() {
        let (mut artie, robot) = connect_mock();

        let mut reply = None;
        let sent = exchange(&mut artie, &robot, Some(json!(7.4)), |a| {
            reply = a.voltage().unwrap();
        });
        assert_eq!(sent.cmd, "getVoltage");
        assert_eq!(reply, Some(json!(7.4)));

        let sent = exchange(&mut artie, &robot, Some(json!("ff0000")), |a| {
            reply = a.find_colour("ff0000").unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("findColour", Some(json!("ff0000"))));

        for (cmd, call) in [
            ("colorState", Artie::color_state as fn(&mut Artie) -> Result<Reply, DriverError>),
            ("collideState", Artie::collide_state),
            ("followState", Artie::follow_state),
            ("uptime", Artie::uptime),
        ] {
            let sent = exchange(&mut artie, &robot, Some(json!(0)), |a| {
                reply = call(a).unwrap();
            });
            assert_eq!(sent.cmd, cmd);
            assert_eq!(reply, Some(json!(0)));
        }
    }

    #[test]
    fn test_follow_and_version() {
        let (mut artie, robot) = connect_mock();

        let sent = exchange(&mut artie, &robot, None, |a| {
            a.follow(true).unwrap();
        });
        assert_eq!((sent.cmd.as_str(), sent.arg), ("follow", Some(json!(true))));

        let sent = exchange(&mut artie, &robot, Some(json!("1.1.0")), |a| {
            a.fetch_version().unwrap();
        });
        assert_eq!(sent.cmd, "version");
        assert_eq!(artie.version(), Some(&json!("1.1.0")));
    }

    #[test]
    fn test_chaining() {
        let (mut artie, robot) = connect_mock();
        let server = {
            let robot = robot.clone();
            thread::spawn(move || {
                (0..3)
                    .map(|_| robot.serve_one(WAIT, None).unwrap().cmd)
                    .collect::<Vec<_>>()
            })
        };

        artie.ping().unwrap().forward(10.0).unwrap().beep(1).unwrap();
        assert_eq!(server.join().unwrap(), vec!["ping", "forward", "beep"]);
    }
}
