// ==========================================
// 电机来料检验数据服务 - 生产计划领域模型
// ==========================================
// 职责: 生产计划行（T ~ T+3 四个时间窗口 + 汇总）
// 红线: 计划行由对账流程整体创建/替换，落库后不做局部修改
// ==========================================

use crate::domain::types::{percentage, PlanHorizon};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// HorizonCounts - 单个时间窗口的计划/完成
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonCounts {
    pub planned: i64,
    pub actual: i64,
    pub unfinished: i64, // planned - actual，可能为负；溢出时饱和
}

impl HorizonCounts {
    pub fn new(planned: i64, actual: i64) -> Self {
        Self {
            planned,
            actual,
            unfinished: planned.saturating_sub(actual),
        }
    }
}

// ==========================================
// ProductionPlanRow - 生产计划行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlanRow {
    pub id: Option<i64>,            // 落库后回填
    pub material_code: String,      // 物料编码
    pub part_number: String,        // 部品号
    pub plan_type: String,          // 直流/交流
    pub manufacturer: String,       // 厂家
    pub plan_date: NaiveDate,       // 计划日期
    pub production_line: String,    // 生产线体

    pub t: HorizonCounts,
    pub t1: HorizonCounts,
    pub t2: HorizonCounts,
    pub t3: HorizonCounts,

    // ===== 汇总 =====
    pub total_planned: i64,
    pub total_inspected: i64,
    pub total_unfinished: i64,
    pub achievement_rate: f64, // 达成率（%）
    pub special_note: String,  // 特殊物料备注
}

/// 计划行的基础字段（汇总由 `ProductionPlanRow::new` 统一派生）
#[derive(Debug, Clone, Default)]
pub struct PlanRowBase {
    pub material_code: String,
    pub part_number: String,
    pub plan_type: String,
    pub manufacturer: String,
    pub production_line: String,
    pub special_note: String,
}

impl ProductionPlanRow {
    /// 由基础字段和四个窗口构造，派生汇总字段
    pub fn new(base: PlanRowBase, plan_date: NaiveDate, horizons: [HorizonCounts; 4]) -> Self {
        let [t, t1, t2, t3] = horizons;
        let sum = |f: fn(&HorizonCounts) -> i64| horizons.iter().map(f).fold(0i64, i64::saturating_add);
        let total_planned = sum(|h| h.planned);
        let total_inspected = sum(|h| h.actual);
        let total_unfinished = sum(|h| h.unfinished);

        Self {
            id: None,
            material_code: base.material_code,
            part_number: base.part_number,
            plan_type: base.plan_type,
            manufacturer: base.manufacturer,
            plan_date,
            production_line: base.production_line,
            t,
            t1,
            t2,
            t3,
            total_planned,
            total_inspected,
            total_unfinished,
            achievement_rate: percentage(total_inspected, total_planned),
            special_note: base.special_note,
        }
    }

    /// 按窗口取计数
    pub fn horizon(&self, horizon: PlanHorizon) -> &HorizonCounts {
        match horizon {
            PlanHorizon::T => &self.t,
            PlanHorizon::T1 => &self.t1,
            PlanHorizon::T2 => &self.t2,
            PlanHorizon::T3 => &self.t3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 21).unwrap()
    }

    #[test]
    fn test_new_derives_summary() {
        let row = ProductionPlanRow::new(
            PlanRowBase {
                material_code: "M001".to_string(),
                ..Default::default()
            },
            date(),
            [
                HorizonCounts::new(100, 80),
                HorizonCounts::new(50, 50),
                HorizonCounts::new(0, 0),
                HorizonCounts::new(10, 0),
            ],
        );

        assert_eq!(row.total_planned, 160);
        assert_eq!(row.total_inspected, 130);
        assert_eq!(row.total_unfinished, 30);
        assert!((row.achievement_rate - 81.25).abs() < 1e-9);
        assert_eq!(row.horizon(PlanHorizon::T3).unfinished, 10);
    }

    #[test]
    fn test_unfinished_not_clamped() {
        let counts = HorizonCounts::new(5, 8);
        assert_eq!(counts.unfinished, -3);
    }

    #[test]
    fn test_extreme_counts_saturate() {
        let counts = HorizonCounts::new(5, i64::MIN);
        assert_eq!(counts.unfinished, i64::MAX);

        let row = ProductionPlanRow::new(
            PlanRowBase::default(),
            date(),
            [
                HorizonCounts::new(i64::MAX, 0),
                HorizonCounts::new(10, i64::MIN),
                HorizonCounts::new(1, 0),
                HorizonCounts::default(),
            ],
        );
        assert_eq!(row.total_planned, i64::MAX);
        assert_eq!(row.total_inspected, i64::MIN);
        assert_eq!(row.total_unfinished, i64::MAX);
        assert!(row.achievement_rate.is_finite());
    }

    #[test]
    fn test_zero_planned_rate_is_zero() {
        let row = ProductionPlanRow::new(
            PlanRowBase::default(),
            date(),
            [HorizonCounts::new(0, 4), HorizonCounts::default(), HorizonCounts::default(), HorizonCounts::default()],
        );
        assert_eq!(row.total_planned, 0);
        assert_eq!(row.achievement_rate, 0.0);
    }
}
