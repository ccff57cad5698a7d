// ==========================================
// 电机来料检验数据服务 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod inspection_repo;
pub mod production_plan_repo;
pub mod report_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use inspection_repo::{GroupedAggregateSource, InspectionRepository};
pub use production_plan_repo::{PlanReplaceUnit, ProductionPlanRepository, ReplaceOutcome};
pub use report_repo::ReportRepository;
