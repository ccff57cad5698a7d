// ==========================================
// 电机来料检验数据服务 - 应用层
// ==========================================
// 职责: 组装连接、仓储、引擎与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
