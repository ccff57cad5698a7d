// ==========================================
// 电机来料检验数据服务 - 引擎层
// ==========================================
// 职责: 实现统计派生规则,不拼 SQL
// 红线: Engine 不拼 SQL
// ==========================================

pub mod quality_stats;

// 重导出核心引擎
pub use quality_stats::QualityStatsEngine;
