// ==========================================
// 门店库存调拨系统 - 领域类型定义
// ==========================================
// 职责: 封闭枚举类型，拒绝魔法字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// RoundingMode - 整箱取整模式
// ==========================================

/// 整箱取整模式
///
/// 调拨数量必须按商品外箱规格取整时使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// 就近取整（平局向上）
    Nearest,
    /// 向上取整
    Up,
    /// 向下取整（可能得到 0）
    Down,
    /// 智能取整：就近，但超发过半箱且下调后仍满足起送量时向下
    Smart,
}

impl RoundingMode {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Nearest => "nearest",
            RoundingMode::Up => "up",
            RoundingMode::Down => "down",
            RoundingMode::Smart => "smart",
        }
    }
}

impl Default for RoundingMode {
    fn default() -> Self {
        RoundingMode::Nearest
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(RoundingMode::Nearest),
            "up" => Ok(RoundingMode::Up),
            "down" => Ok(RoundingMode::Down),
            "smart" => Ok(RoundingMode::Smart),
            other => Err(format!("未知的取整模式: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_mode_roundtrip() {
        // as_str 与 FromStr 必须互逆
        for mode in [
            RoundingMode::Nearest,
            RoundingMode::Up,
            RoundingMode::Down,
            RoundingMode::Smart,
        ] {
            assert_eq!(mode.as_str().parse::<RoundingMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_rounding_mode_rejects_unknown() {
        assert!("banker".parse::<RoundingMode>().is_err());
    }
}
