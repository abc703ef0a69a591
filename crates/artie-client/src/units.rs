//! 距离单位
//!
//! 机器人固件以毫米为单位；客户端在发送前把距离参数乘以单位系数。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 距离单位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    /// 毫米（机器人原生单位）
    #[default]
    Mm,
    /// 厘米
    Cm,
    /// 英寸
    #[serde(alias = "in")]
    Inch,
}

impl DistanceUnit {
    /// 换算到毫米的系数
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            DistanceUnit::Mm => 1.0,
            DistanceUnit::Cm => 10.0,
            DistanceUnit::Inch => 25.4,
        }
    }

    /// 换算为毫米
    #[inline]
    pub fn to_mm(self, distance: f64) -> f64 {
        distance * self.factor()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Mm => "mm",
            DistanceUnit::Cm => "cm",
            DistanceUnit::Inch => "inch",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(DistanceUnit::Mm),
            "cm" => Ok(DistanceUnit::Cm),
            "inch" | "inches" | "in" => Ok(DistanceUnit::Inch),
            other => Err(format!("Unknown distance unit: {}", other)),
        }
    }
}
