// ==========================================
// 电机来料检验数据服务 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供幂等建表（核心读写涉及的表）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 幂等建表
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS suppliers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product_models (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sn TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            supplier_id INTEGER NOT NULL REFERENCES suppliers(id)
        );

        CREATE TABLE IF NOT EXISTS product_lines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sn TEXT NOT NULL,
            created_at TEXT NOT NULL,
            has_defect INTEGER NOT NULL DEFAULT 0,
            defect_reason TEXT,
            batch_number TEXT NOT NULL DEFAULT '',
            product_model_id INTEGER NOT NULL REFERENCES product_models(id),
            product_line_id INTEGER REFERENCES product_lines(id),
            pallet_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_products_created_at ON products(created_at);

        CREATE TABLE IF NOT EXISTS production_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_code TEXT NOT NULL DEFAULT '',
            part_number TEXT NOT NULL DEFAULT '',
            plan_type TEXT NOT NULL DEFAULT '',
            manufacturer TEXT NOT NULL DEFAULT '',
            plan_date TEXT NOT NULL,
            production_line TEXT NOT NULL DEFAULT '',
            t_planned INTEGER NOT NULL DEFAULT 0,
            t_actual INTEGER NOT NULL DEFAULT 0,
            t_unfinished INTEGER NOT NULL DEFAULT 0,
            t1_planned INTEGER NOT NULL DEFAULT 0,
            t1_actual INTEGER NOT NULL DEFAULT 0,
            t1_unfinished INTEGER NOT NULL DEFAULT 0,
            t2_planned INTEGER NOT NULL DEFAULT 0,
            t2_actual INTEGER NOT NULL DEFAULT 0,
            t2_unfinished INTEGER NOT NULL DEFAULT 0,
            t3_planned INTEGER NOT NULL DEFAULT 0,
            t3_actual INTEGER NOT NULL DEFAULT 0,
            t3_unfinished INTEGER NOT NULL DEFAULT 0,
            total_planned INTEGER NOT NULL DEFAULT 0,
            total_inspected INTEGER NOT NULL DEFAULT 0,
            total_unfinished INTEGER NOT NULL DEFAULT 0,
            achievement_rate REAL NOT NULL DEFAULT 0,
            special_note TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_production_plans_plan_date ON production_plans(plan_date);

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
