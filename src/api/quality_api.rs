// ==========================================
// 电机来料检验数据服务 - 质量统计 API
// ==========================================
// 职责: computeQualityStats 调用契约
// 说明: 区间按时间点闭区间；按日期查询时用 day_interval 把结束日扩展到当日最后时刻
// ==========================================

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::quality_stats::QualityStatsView;
use crate::engine::quality_stats::QualityStatsEngine;
use crate::perf::OpTimer;
use crate::repository::inspection_repo::GroupedAggregateSource;

/// 日期区间 -> 时间点闭区间 [start 00:00:00, end 23:59:59.999999999]
///
/// # 示例
/// ```
/// use chrono::NaiveDate;
/// use vmi_analytics::api::day_interval;
///
/// let d = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// let (start, end) = day_interval(d, d);
/// assert_eq!(start.to_string(), "2025-01-31 00:00:00");
/// assert_eq!(end.date(), d);
/// assert!(end > d.and_hms_opt(23, 59, 59).unwrap());
/// ```
pub fn day_interval(start: NaiveDate, end: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let last_instant = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    (start.and_time(NaiveTime::MIN), end.and_time(last_instant))
}

/// 质量统计API
pub struct QualityStatsApi {
    source: Arc<dyn GroupedAggregateSource>,
    engine: Arc<QualityStatsEngine>,
}

impl QualityStatsApi {
    /// 创建新的QualityStatsApi实例
    ///
    /// # 参数
    /// - source: 分组聚合数据来源（通常为 InspectionRepository）
    /// - engine: 质量统计引擎（已注入分类词表）
    pub fn new(source: Arc<dyn GroupedAggregateSource>, engine: Arc<QualityStatsEngine>) -> Self {
        Self { source, engine }
    }

    /// 计算 [start, end] 内的质量统计
    ///
    /// # 返回
    /// - Ok(QualityStatsView)
    /// - Err(DataAccessError): 区间非法或查询失败（不返回部分视图）
    pub fn compute_quality_stats(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ApiResult<QualityStatsView> {
        let _perf = OpTimer::start("compute_quality_stats");
        self.engine
            .compute(self.source.as_ref(), start, end)
            .map_err(ApiError::from)
    }

    /// 按日期计算（结束日包含整天）
    pub fn compute_quality_stats_for_days(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ApiResult<QualityStatsView> {
        let (start, end) = day_interval(start_date, end_date);
        self.compute_quality_stats(start, end)
    }
}
