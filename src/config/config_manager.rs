// ==========================================
// 电机来料检验数据服务 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value)
// 规则: 配置缺失或格式错误时回退默认值，并输出 warn
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::quality_stats::{DefectCategory, DefectCategorySet};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 配置键
pub mod config_keys {
    /// 标准不良分类词表，JSON 数组: [{"key": "terminal", "label": "端子变形"}, ...]
    pub const DEFECT_CATEGORIES: &str = "quality.defect_categories";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    // ===== 质量统计配置 =====

    /// 获取标准不良分类词表
    ///
    /// # 说明
    /// - 未配置: 使用默认四类
    /// - JSON 格式错误或为空数组: 使用默认四类并告警
    pub fn get_defect_categories(&self) -> RepositoryResult<DefectCategorySet> {
        let raw = match self.get_config_value(config_keys::DEFECT_CATEGORIES)? {
            Some(raw) => raw,
            None => return Ok(DefectCategorySet::default()),
        };

        match serde_json::from_str::<Vec<DefectCategory>>(&raw) {
            Ok(categories) if !categories.is_empty() => Ok(DefectCategorySet::new(categories)),
            Ok(_) => {
                tracing::warn!(
                    config_key = config_keys::DEFECT_CATEGORIES,
                    "不良分类词表为空，使用默认词表"
                );
                Ok(DefectCategorySet::default())
            }
            Err(e) => {
                tracing::warn!(
                    config_key = config_keys::DEFECT_CATEGORIES,
                    raw_value = %raw,
                    error = %e,
                    "不良分类词表格式错误，使用默认词表"
                );
                Ok(DefectCategorySet::default())
            }
        }
    }
}
