// ==========================================
// 电机来料检验数据服务 - 查询构建层
// ==========================================
// 职责: 谓词组合 + 分页（所有报表查询共用）
// 约束: 纯查询构建，除 COUNT 外无副作用
// ==========================================

pub mod pagination;
pub mod predicates;
pub mod sql_builder;

// 重导出
pub use pagination::{build_paged_query, resolve_pagination};
pub use sql_builder::{EqFilters, PagedQuery, Predicate, QueryPlan, SqlParam};
