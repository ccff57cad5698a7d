// ==========================================
// 电机来料检验数据服务 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::sync::{Arc, Mutex};
use rusqlite::Connection;

use crate::api::{PlanApi, QualityStatsApi, ReportApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::quality_stats::QualityStatsEngine;
use crate::perf::install_sqlite_tracing;
use crate::repository::{InspectionRepository, ProductionPlanRepository, ReportRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "VMI_ANALYTICS_DB_PATH";

/// 应用状态
///
/// 所有API共享同一个连接（Arc<Mutex<Connection>>）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 质量统计API
    pub quality_api: Arc<QualityStatsApi>,

    /// 生产计划API
    pub plan_api: Arc<PlanApi>,

    /// 报表API
    pub report_api: Arc<ReportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 初始化成功
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        Self::from_connection(conn, db_path)
    }

    /// 从已打开的连接创建（测试可传入内存库）
    ///
    /// 说明: 会幂等建表，并安装 SQL 耗时统计回调
    pub fn from_connection(mut conn: Connection, db_path: String) -> Result<Self, String> {
        install_sqlite_tracing(&mut conn);
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置 & Repository 层
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let inspection_repo = Arc::new(InspectionRepository::new(conn.clone()));
        let plan_repo = Arc::new(ProductionPlanRepository::new(conn.clone()));
        let report_repo = Arc::new(ReportRepository::new(conn));

        // ==========================================
        // Engine 层（分类词表来自配置）
        // ==========================================
        let categories = config_manager
            .get_defect_categories()
            .map_err(|e| format!("读取不良分类配置失败: {}", e))?;
        tracing::debug!(categories = categories.len(), "不良分类词表已加载");
        let engine = Arc::new(QualityStatsEngine::new(categories));

        // ==========================================
        // API 层
        // ==========================================
        let quality_api = Arc::new(QualityStatsApi::new(inspection_repo, engine));
        let plan_api = Arc::new(PlanApi::new(plan_repo));
        let report_api = Arc::new(ReportApi::new(report_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            quality_api,
            plan_api,
            report_api,
            config_manager,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 VMI_ANALYTICS_DB_PATH（非空时）
/// - 开发环境: 用户数据目录/vmi-analytics-dev/vmi_analytics.db
/// - 生产环境: 用户数据目录/vmi-analytics/vmi_analytics.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./vmi_analytics.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("vmi-analytics-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("vmi-analytics");
        }

        // 目录创建失败时由后续打开数据库报错
        std::fs::create_dir_all(&path).ok();
        path = path.join("vmi_analytics.db");
    }

    path.to_string_lossy().to_string()
}
