// ==========================================
// 电机来料检验数据服务 - 领域模型层
// ==========================================
// 职责: 定义领域实体、视图模型、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod inspection;
pub mod pagination;
pub mod production_plan;
pub mod quality_stats;
pub mod report;
pub mod types;

// 重导出核心类型
pub use inspection::{GroupedAggregate, InspectionRecord};
pub use pagination::{PageRequest, PagedResponse, PaginationResult, DEFAULT_PAGE_SIZE, EXPORT_ALL_PAGE_SIZE};
pub use production_plan::{HorizonCounts, PlanRowBase, ProductionPlanRow};
pub use quality_stats::{
    DailyDefectCount, DailyDefectRate, DefectCategory, DefectCategorySet, DefectCategoryTrend,
    DefectTypeItem, QualityRateStats, QualityStatsView, SupplierDefectTrend,
};
pub use report::{
    CostReportItem, CostReportQuery, DefectReportItem, DefectReportQuery, InspectionReportItem,
    InspectionReportQuery,
};
pub use types::{percentage, PlanHorizon};
