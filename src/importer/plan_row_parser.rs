// ==========================================
// 电机来料检验数据服务 - 生产计划行解析
// ==========================================
// 列布局（按位置）:
//   [0] 物料编码 [1] 部品号 [2] 类型 [3] 厂家 [4] 计划日期 [5] 生产线体
//   [6,7] T 计划/实际   [9,10] T+1   [12,13] T+2   [15,16] T+3
//   [22] 特殊物料备注
// 规则:
// - 第 0 行为表头，始终跳过
// - 单行异常只跳过该行，不中止整体
// - 超出行长度的列取零值（计数 0，文本空）
// ==========================================

use crate::domain::production_plan::{HorizonCounts, PlanRowBase, ProductionPlanRow};
use chrono::NaiveDate;
use std::fmt;

/// 基础字段所需的最少列数
pub const MIN_COLUMNS: usize = 6;

const COL_MATERIAL_CODE: usize = 0;
const COL_PART_NUMBER: usize = 1;
const COL_TYPE: usize = 2;
const COL_MANUFACTURER: usize = 3;
const COL_PLAN_DATE: usize = 4;
const COL_PRODUCTION_LINE: usize = 5;
const COL_SPECIAL_NOTE: usize = 22;

/// 各窗口的 (计划列, 实际列)，T+1 起与前一窗口之间隔一列
const HORIZON_COLUMNS: [(usize, usize); 4] = [(6, 7), (9, 10), (12, 13), (15, 16)];

/// 跳过原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 列数不足
    InsufficientColumns { found: usize },
    /// 计划日期无法识别
    InvalidPlanDate { raw: String },
    /// 计划日期与目标日期不一致
    DateMismatch { plan_date: NaiveDate },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientColumns { found } => {
                write!(f, "列数不足: {} < {}", found, MIN_COLUMNS)
            }
            SkipReason::InvalidPlanDate { raw } => write!(f, "计划日期格式无效: '{}'", raw),
            SkipReason::DateMismatch { plan_date } => {
                write!(f, "计划日期 {} 不是目标日期", plan_date)
            }
        }
    }
}

/// 单行解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(ProductionPlanRow),
    Skipped(SkipReason),
}

/// 被跳过的行（row_index 为表格中的行号，表头为 0）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row_index: usize,
    pub reason: SkipReason,
}

/// 整表解析结果
#[derive(Debug, Clone, Default)]
pub struct ParsedPlan {
    pub accepted: Vec<ProductionPlanRow>,
    pub skipped: Vec<SkippedRow>,
}

/// 解析计划日期: 先试 YYYY-MM-DD，再试 YY-MM-DD
///
/// 两位年份按 69 分界: 00-68 -> 20xx，69-99 -> 19xx
///
/// # 示例
/// ```
/// use chrono::NaiveDate;
/// use vmi_analytics::importer::plan_row_parser::parse_plan_date;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 3, 4);
/// assert_eq!(parse_plan_date("2025-03-04"), expected);
/// assert_eq!(parse_plan_date("25-03-04"), expected);
/// assert_eq!(parse_plan_date("2025/03/04"), None);
/// ```
pub fn parse_plan_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('-').collect();
    if parts.len() != 3 || !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    if parts[1].len() != 2 || parts[2].len() != 2 {
        return None;
    }

    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;
    let year: i32 = match parts[0].len() {
        4 => parts[0].parse().ok()?,
        2 => {
            let yy: i32 = parts[0].parse().ok()?;
            if yy < 69 {
                2000 + yy
            } else {
                1900 + yy
            }
        }
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn text_at(row: &[String], col: usize) -> String {
    row.get(col).cloned().unwrap_or_default()
}

/// 计数列: 缺失或非整数时取 0
fn count_at(row: &[String], col: usize) -> i64 {
    row.get(col)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// 解析单个数据行
pub fn parse_plan_row(row: &[String], target_date: NaiveDate) -> RowOutcome {
    if row.len() < MIN_COLUMNS {
        return RowOutcome::Skipped(SkipReason::InsufficientColumns { found: row.len() });
    }

    let raw_date = &row[COL_PLAN_DATE];
    let plan_date = match parse_plan_date(raw_date) {
        Some(d) => d,
        None => {
            return RowOutcome::Skipped(SkipReason::InvalidPlanDate {
                raw: raw_date.clone(),
            })
        }
    };

    if plan_date != target_date {
        return RowOutcome::Skipped(SkipReason::DateMismatch { plan_date });
    }

    let base = PlanRowBase {
        material_code: text_at(row, COL_MATERIAL_CODE),
        part_number: text_at(row, COL_PART_NUMBER),
        plan_type: text_at(row, COL_TYPE),
        manufacturer: text_at(row, COL_MANUFACTURER),
        production_line: text_at(row, COL_PRODUCTION_LINE),
        special_note: text_at(row, COL_SPECIAL_NOTE),
    };
    let horizons =
        HORIZON_COLUMNS.map(|(planned, actual)| HorizonCounts::new(count_at(row, planned), count_at(row, actual)));

    RowOutcome::Accepted(ProductionPlanRow::new(base, plan_date, horizons))
}

/// 解析整表（跳过表头），保持输入顺序
pub fn parse_plan_rows(rows: &[Vec<String>], target_date: NaiveDate) -> ParsedPlan {
    let mut parsed = ParsedPlan::default();
    if let Some(header) = rows.first() {
        tracing::debug!(columns = header.len(), "跳过表头");
    }

    for (row_index, row) in rows.iter().enumerate().skip(1) {
        match parse_plan_row(row, target_date) {
            RowOutcome::Accepted(plan) => parsed.accepted.push(plan),
            RowOutcome::Skipped(reason) => {
                tracing::debug!(row = row_index, reason = %reason, "计划行已跳过");
                parsed.skipped.push(SkippedRow { row_index, reason });
            }
        }
    }

    parsed
}
