// ==========================================
// 电机来料检验数据服务 - 质量统计引擎
// ==========================================
// 职责: 由一次分组查询结果派生四个统计视图
// 输入: GroupedAggregate 列表（日期, 厂家, 不良原因 -> 总数/不良数）
// 输出: QualityStatsView
// 红线: Engine 不拼 SQL；派生过程只遍历一次，不回查数据库
// ==========================================

use crate::domain::inspection::GroupedAggregate;
use crate::domain::quality_stats::{
    DailyDefectCount, DailyDefectRate, DefectCategorySet, DefectCategoryTrend, DefectTypeItem,
    QualityRateStats, QualityStatsView, SupplierDefectTrend,
};
use crate::domain::types::percentage;
use crate::repository::error::RepositoryResult;
use crate::repository::inspection_repo::GroupedAggregateSource;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

/// 单日累计（厂家维度）
#[derive(Debug, Default, Clone, Copy)]
struct DailyTally {
    total: i64,
    defect: i64,
}

/// 单次遍历的累加器
#[derive(Debug)]
struct Accumulator {
    total: i64,
    defect: i64,
    // 不良原因 -> 不良数（保持首次出现顺序）
    reason_order: Vec<String>,
    reason_counts: HashMap<String, i64>,
    // 厂家名 -> 日期 -> 累计
    suppliers: BTreeMap<String, BTreeMap<NaiveDate, DailyTally>>,
    // 分类下标 -> 日期 -> 不良数
    categories: Vec<BTreeMap<NaiveDate, i64>>,
}

impl Accumulator {
    fn new(category_count: usize) -> Self {
        Self {
            total: 0,
            defect: 0,
            reason_order: Vec::new(),
            reason_counts: HashMap::new(),
            suppliers: BTreeMap::new(),
            categories: vec![BTreeMap::new(); category_count],
        }
    }

    fn push(&mut self, agg: &GroupedAggregate, categories: &DefectCategorySet) {
        // 1. 合格率
        self.total += agg.total_count;
        self.defect += agg.defect_count;

        // 2. 厂家趋势: 同一 (厂家, 日期) 的多条原因元组在此合并
        let tally = self
            .suppliers
            .entry(agg.supplier_name.clone())
            .or_default()
            .entry(agg.date)
            .or_default();
        tally.total += agg.total_count;
        tally.defect += agg.defect_count;

        if !agg.has_reason() || agg.defect_count == 0 {
            return;
        }

        // 3. 不良分布
        match self.reason_counts.get_mut(&agg.defect_reason) {
            Some(count) => *count += agg.defect_count,
            None => {
                self.reason_order.push(agg.defect_reason.clone());
                self.reason_counts
                    .insert(agg.defect_reason.clone(), agg.defect_count);
            }
        }

        // 4. 标准分类趋势（精确匹配）
        if let Some(idx) = categories.position_of(&agg.defect_reason) {
            *self.categories[idx].entry(agg.date).or_insert(0) += agg.defect_count;
        }
    }

    fn finish(self, categories: &DefectCategorySet) -> QualityStatsView {
        let qualified = self.total - self.defect;
        let quality_rate = QualityRateStats {
            qualified_count: qualified,
            defect_count: self.defect,
            total_count: self.total,
            quality_rate: percentage(qualified, self.total),
        };

        // 占比分母为全部不良数（含无原因的不良），各项占比之和可能小于 100
        let defect_type_distribution = if self.defect == 0 {
            Vec::new()
        } else {
            self.reason_order
                .iter()
                .map(|reason| {
                    let count = self.reason_counts.get(reason).copied().unwrap_or(0);
                    DefectTypeItem {
                        defect_type: reason.clone(),
                        count,
                        rate: percentage(count, self.defect),
                    }
                })
                .collect()
        };

        let supplier_defect_trend = self
            .suppliers
            .into_iter()
            .map(|(supplier_name, days)| SupplierDefectTrend {
                supplier_name,
                daily_data: days
                    .into_iter()
                    .map(|(date, t)| DailyDefectRate {
                        date,
                        defect_rate: percentage(t.defect, t.total),
                        total_count: t.total,
                        defect_count: t.defect,
                    })
                    .collect(),
            })
            .collect();

        let defect_trend_by_category = categories
            .categories()
            .iter()
            .zip(self.categories)
            .map(|(category, days)| DefectCategoryTrend {
                key: category.key.clone(),
                label: category.label.clone(),
                daily_data: days
                    .into_iter()
                    .map(|(date, count)| DailyDefectCount { date, count })
                    .collect(),
            })
            .collect();

        QualityStatsView {
            quality_rate,
            defect_type_distribution,
            supplier_defect_trend,
            defect_trend_by_category,
        }
    }
}

// ==========================================
// QualityStatsEngine - 质量统计引擎
// ==========================================
pub struct QualityStatsEngine {
    categories: DefectCategorySet,
}

impl QualityStatsEngine {
    /// 创建引擎（分类词表由调用方注入）
    pub fn new(categories: DefectCategorySet) -> Self {
        Self { categories }
    }

    /// 查询分组聚合并派生统计视图
    ///
    /// # 参数
    /// - source: 分组聚合数据来源
    /// - start / end: 闭区间 [start, end]（按时间点，调用方负责把 end 扩展到当日最后时刻）
    ///
    /// # 返回
    /// - Ok(QualityStatsView)
    /// - Err: 查询失败时整体失败，不返回部分视图
    #[instrument(skip(self, source), fields(start = %start, end = %end))]
    pub fn compute(
        &self,
        source: &dyn GroupedAggregateSource,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<QualityStatsView> {
        let aggregates = source.fetch_grouped_aggregates(start, end)?;
        let view = self.derive_views(&aggregates);

        tracing::info!(
            tuples = aggregates.len(),
            total = view.quality_rate.total_count,
            defect = view.quality_rate.defect_count,
            suppliers = view.supplier_defect_trend.len(),
            "质量统计完成"
        );

        Ok(view)
    }

    /// 由分组聚合派生四个视图（纯函数）
    ///
    /// 输出顺序:
    /// - 不良分布: 不良原因首次出现的顺序
    /// - 厂家趋势: 厂家名升序，日期升序
    /// - 分类趋势: 词表顺序，日期升序
    pub fn derive_views(&self, aggregates: &[GroupedAggregate]) -> QualityStatsView {
        let mut acc = Accumulator::new(self.categories.len());
        for agg in aggregates {
            acc.push(agg, &self.categories);
        }
        acc.finish(&self.categories)
    }
}

impl Default for QualityStatsEngine {
    fn default() -> Self {
        Self::new(DefectCategorySet::default())
    }
}

// ==========================================
// 单元测试
// ==========================================
