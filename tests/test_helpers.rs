// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use vmi_analytics::db::{ensure_schema, open_sqlite_connection};
use vmi_analytics::domain::InspectionRecord;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn open_shared(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    Ok(Arc::new(Mutex::new(open_sqlite_connection(db_path)?)))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, mi, s).unwrap()
}

// ==========================================
// 主数据
// ==========================================

pub fn insert_supplier(conn: &Connection, name: &str) -> i64 {
    conn.execute("INSERT INTO suppliers (name) VALUES (?1)", params![name])
        .unwrap();
    conn.last_insert_rowid()
}

pub fn insert_model(conn: &Connection, sn: &str, description: &str, supplier_id: i64) -> i64 {
    conn.execute(
        "INSERT INTO product_models (sn, description, supplier_id) VALUES (?1, ?2, ?3)",
        params![sn, description, supplier_id],
    )
    .unwrap();
    conn.last_insert_rowid()
}

pub fn insert_line(conn: &Connection, name: &str) -> i64 {
    conn.execute("INSERT INTO product_lines (name) VALUES (?1)", params![name])
        .unwrap();
    conn.last_insert_rowid()
}

// ==========================================
// 检验记录
// ==========================================

/// 检验记录构造（合格、无产线）
pub fn record(model_id: i64, created_at: NaiveDateTime) -> InspectionRecord {
    InspectionRecord {
        id: 0,
        sn: format!("SN-{}", created_at.format("%Y%m%d%H%M%S")),
        created_at,
        has_defect: false,
        defect_reason: String::new(),
        batch_number: "B001".to_string(),
        product_model_id: model_id,
        product_line_id: None,
        pallet_id: None,
    }
}

pub fn insert_record(conn: &Connection, r: &InspectionRecord) -> i64 {
    conn.execute(
        r#"INSERT INTO products
           (sn, created_at, has_defect, defect_reason, batch_number, product_model_id, product_line_id, pallet_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        params![
            r.sn,
            r.created_at,
            r.has_defect,
            r.defect_reason,
            r.batch_number,
            r.product_model_id,
            r.product_line_id,
            r.pallet_id
        ],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// 批量插入 count 条记录，其中前 defects 条为不良
pub fn insert_records(
    conn: &Connection,
    model_id: i64,
    created_at: NaiveDateTime,
    reason: &str,
    count: usize,
    defects: usize,
) {
    for i in 0..count {
        let mut r = record(model_id, created_at);
        r.sn = format!("SN-{}-{}-{}", model_id, created_at.format("%Y%m%d"), i);
        r.defect_reason = reason.to_string();
        r.has_defect = i < defects;
        insert_record(conn, &r);
    }
}

// ==========================================
// 生产计划表格
// ==========================================

pub fn plan_header() -> Vec<String> {
    ["物料编码", "部品号", "类型", "厂家", "计划日期", "生产线体", "T计划", "T实际"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 计划数据行: T / T+1 计划与实际，其余列留空
pub fn plan_row(material: &str, plan_date: &str, t: (i64, i64), t1: (i64, i64)) -> Vec<String> {
    let mut row = vec![String::new(); 11];
    row[0] = material.to_string();
    row[1] = format!("{}-P", material);
    row[2] = "直流".to_string();
    row[3] = "ACME".to_string();
    row[4] = plan_date.to_string();
    row[5] = "L1".to_string();
    row[6] = t.0.to_string();
    row[7] = t.1.to_string();
    row[9] = t1.0.to_string();
    row[10] = t1.1.to_string();
    row
}

pub fn plan_sheet(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut sheet = vec![plan_header()];
    sheet.extend(rows);
    sheet
}

pub fn count_plans_for(conn: &Arc<Mutex<Connection>>, plan_date: NaiveDate) -> i64 {
    conn.lock()
        .unwrap()
        .query_row(
            "SELECT COUNT(*) FROM production_plans WHERE plan_date = ?1",
            params![plan_date],
            |row| row.get(0),
        )
        .unwrap()
}

/// 读取 tests/fixtures 下的夹具文件
pub fn fixture_bytes(relative: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative);
    std::fs::read(&path).unwrap_or_else(|e| panic!("无法读取夹具 {}: {}", path.display(), e))
}
