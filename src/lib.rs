// ==========================================
// 电机来料检验数据服务 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 来料检验质量统计 + 生产计划对账
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与视图模型
pub mod domain;

// 查询构建层 - 谓词组合与分页
pub mod query;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 统计派生
pub mod engine;

// 导入层 - 表格载荷对账
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// SQL 耗时统计
pub mod perf;

// API 层 - 调用契约
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    GroupedAggregate, PageRequest, PaginationResult, ProductionPlanRow, QualityStatsView,
};

pub use engine::QualityStatsEngine;

pub use api::{ApiError, ApiResult, PlanApi, QualityStatsApi, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "电机来料检验数据服务";
