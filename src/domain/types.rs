// ==========================================
// 电机来料检验数据服务 - 通用类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PlanHorizon - 计划时间窗口
// ==========================================
// 生产计划跟踪的四个日期桶: T / T+1 / T+2 / T+3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanHorizon {
    T,
    T1,
    T2,
    T3,
}

impl fmt::Display for PlanHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanHorizon::T => write!(f, "T"),
            PlanHorizon::T1 => write!(f, "T+1"),
            PlanHorizon::T2 => write!(f, "T+2"),
            PlanHorizon::T3 => write!(f, "T+3"),
        }
    }
}

/// 百分比计算（分母为 0 时返回 0，不产生 NaN）
///
/// # 示例
/// ```
/// use vmi_analytics::domain::types::percentage;
///
/// assert_eq!(percentage(1, 4), 25.0);
/// assert_eq!(percentage(3, 0), 0.0);
/// ```
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(10, 0), 0.0);
        assert!(!percentage(10, 0).is_nan());
    }

    #[test]
    fn test_percentage_basic() {
        assert_eq!(percentage(13, 13), 100.0);
        assert!((percentage(13, 19) - 68.421).abs() < 0.001);
    }

    #[test]
    fn test_horizon_display() {
        let labels: Vec<String> = [PlanHorizon::T, PlanHorizon::T1, PlanHorizon::T2, PlanHorizon::T3]
            .iter()
            .map(|h| h.to_string())
            .collect();
        assert_eq!(labels, vec!["T", "T+1", "T+2", "T+3"]);
    }
}
