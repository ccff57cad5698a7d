// ==========================================
// 电机来料检验数据服务 - API 层
// ==========================================
// 职责: 提供面向调用方的函数契约（传输格式由调用方负责）
// ==========================================

pub mod error;
pub mod plan_api;
pub mod quality_api;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use plan_api::PlanApi;
pub use quality_api::{day_interval, QualityStatsApi};
pub use report_api::ReportApi;
