//! 运动、声音和灯光命令
//!
//! 距离按当前单位换算（见全局 `--unit`）。

use anyhow::Result;
use artie_sdk::Artie;
use clap::{Subcommand, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PenState {
    Up,
    Down,
}

#[derive(Subcommand, Debug)]
pub enum MotionCommand {
    /// 前进
    Forward {
        #[arg(allow_negative_numbers = true)]
        distance: f64,
    },

    /// 后退
    Back {
        #[arg(allow_negative_numbers = true)]
        distance: f64,
    },

    /// 左转（角度）
    Left {
        #[arg(allow_negative_numbers = true)]
        degrees: f64,
    },

    /// 右转（角度）
    Right {
        #[arg(allow_negative_numbers = true)]
        degrees: f64,
    },

    /// 沿圆弧行驶
    Arc {
        #[arg(allow_negative_numbers = true)]
        distance: f64,

        /// 轮子角度
        #[arg(allow_negative_numbers = true)]
        wheel_angle: f64,
    },

    /// 蜂鸣
    Beep {
        #[arg(default_value_t = 1)]
        sound: u8,
    },

    /// 设置 LED 颜色（如 `ff0000`）
    Led {
        rgb: String,

        /// LED 编号，省略时设置全部
        #[arg(long)]
        led: Option<u8>,
    },

    /// 抬笔 / 落笔
    Pen {
        #[arg(value_enum)]
        state: PenState,

        /// 落笔时使用的笔
        #[arg(long, default_value_t = 0)]
        pen: u8,
    },

    /// 开启 / 关闭巡线
    Line {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

impl MotionCommand {
    pub fn execute(self, artie: &mut Artie) -> Result<()> {
        match self {
            MotionCommand::Forward { distance } => {
                artie.forward(distance)?;
            },
            MotionCommand::Back { distance } => {
                artie.back(distance)?;
            },
            MotionCommand::Left { degrees } => {
                artie.left(degrees)?;
            },
            MotionCommand::Right { degrees } => {
                artie.right(degrees)?;
            },
            MotionCommand::Arc {
                distance,
                wheel_angle,
            } => {
                artie.arc(distance, wheel_angle)?;
            },
            MotionCommand::Beep { sound } => {
                artie.beep(sound)?;
            },
            MotionCommand::Led { rgb, led: Some(led) } => {
                artie.set_led(led, &rgb)?;
            },
            MotionCommand::Led { rgb, led: None } => {
                artie.set_all_leds(&rgb)?;
            },
            MotionCommand::Pen {
                state: PenState::Up, ..
            } => {
                artie.pen_up()?;
            },
            MotionCommand::Pen {
                state: PenState::Down,
                pen,
            } => {
                artie.pen_down(pen)?;
            },
            MotionCommand::Line { enabled } => {
                artie.follow(enabled)?;
            },
        }
        println!("✅ 完成");
        Ok(())
    }
}
