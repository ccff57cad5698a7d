// ==========================================
// 电机来料检验数据服务 - 质量统计视图模型
// ==========================================
// 职责: 定义质量统计的四个子视图（合格率 / 不良分布 / 厂家趋势 / 分类趋势）
// 说明: 四个子视图由同一组 GroupedAggregate 一次派生，互相一致
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// QualityStatsView - 质量统计总视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityStatsView {
    pub quality_rate: QualityRateStats,
    pub defect_type_distribution: Vec<DefectTypeItem>,
    pub supplier_defect_trend: Vec<SupplierDefectTrend>,
    pub defect_trend_by_category: Vec<DefectCategoryTrend>,
}

/// 合格率统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityRateStats {
    pub qualified_count: i64,
    pub defect_count: i64,
    pub total_count: i64,
    pub quality_rate: f64, // 合格率（%）
}

/// 不良类型分布项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectTypeItem {
    pub defect_type: String,
    pub count: i64,
    pub rate: f64, // 占全部不良的比例（%）
}

/// 单个厂家的每日不良趋势
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDefectTrend {
    pub supplier_name: String,
    pub daily_data: Vec<DailyDefectRate>,
}

/// 某日不良率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDefectRate {
    pub date: NaiveDate,
    pub defect_rate: f64,
    pub total_count: i64,
    pub defect_count: i64,
}

/// 单个标准不良分类的每日计数序列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectCategoryTrend {
    pub key: String,   // 分类键（如 terminal）
    pub label: String, // 匹配用的不良原因文本（如 端子变形）
    pub daily_data: Vec<DailyDefectCount>,
}

/// 某日不良计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDefectCount {
    pub date: NaiveDate,
    pub count: i64,
}

// ==========================================
// DefectCategorySet - 标准不良分类词表
// ==========================================
// 匹配规则: 不良原因与 label 完全相等（非包含匹配）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectCategory {
    pub key: String,
    pub label: String,
}

impl DefectCategory {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectCategorySet {
    categories: Vec<DefectCategory>,
}

impl DefectCategorySet {
    pub fn new(categories: Vec<DefectCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[DefectCategory] {
        &self.categories
    }

    /// 按不良原因精确查找分类下标
    pub fn position_of(&self, defect_reason: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.label == defect_reason)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for DefectCategorySet {
    /// 产线现行的四类标准不良
    fn default() -> Self {
        Self::new(vec![
            DefectCategory::new("terminal", "端子变形"),
            DefectCategory::new("tag", "铭牌不良"),
            DefectCategory::new("appearance", "外观不良"),
            DefectCategory::new("noise", "轴承噪音"),
        ])
    }
}
