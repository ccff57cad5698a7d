// ==========================================
// 电机来料检验数据服务 - 导入层
// ==========================================
// 职责: 外部表格载荷导入（生产计划对账）
// 支持: Excel (.xlsx)
// ==========================================

// 模块声明
pub mod error;
pub mod plan_reconciler;
pub mod plan_row_parser;
pub mod sheet_reader;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use plan_reconciler::{PlanReconciler, ReconcileReport};
pub use plan_row_parser::{
    parse_plan_date, parse_plan_row, parse_plan_rows, ParsedPlan, RowOutcome, SkipReason,
    SkippedRow,
};
pub use sheet_reader::read_sheet_rows;
