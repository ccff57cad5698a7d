// ==========================================
// 电机来料检验数据服务 - 常用谓词函数
// ==========================================
// 职责: 生成可组合的范围 / 模糊 / 关联条件
// 说明: 可选值为空时返回恒等谓词，调用方无需判空
// ==========================================

use crate::query::sql_builder::{PagedQuery, Predicate, SqlParam};
use chrono::{NaiveDate, NaiveDateTime};

fn identity() -> Predicate {
    Box::new(|query| query)
}

/// `DATE(column) >= date`
pub fn date_from(column: &str, date: Option<NaiveDate>) -> Predicate {
    match date {
        Some(d) => {
            let condition = format!("DATE({}) >= ?", column);
            let value = d.format("%Y-%m-%d").to_string();
            Box::new(move |query: PagedQuery| {
                query.where_clause(&condition, [SqlParam::Text(value.clone())])
            })
        }
        None => identity(),
    }
}

/// `DATE(column) <= date`
pub fn date_to(column: &str, date: Option<NaiveDate>) -> Predicate {
    match date {
        Some(d) => {
            let condition = format!("DATE({}) <= ?", column);
            let value = d.format("%Y-%m-%d").to_string();
            Box::new(move |query: PagedQuery| {
                query.where_clause(&condition, [SqlParam::Text(value.clone())])
            })
        }
        None => identity(),
    }
}

/// `column BETWEEN start AND end`（按时间点，两端包含）
pub fn between(column: &str, start: NaiveDateTime, end: NaiveDateTime) -> Predicate {
    let condition = format!("{} BETWEEN ? AND ?", column);
    let start = start.format("%Y-%m-%d %H:%M:%S%.f").to_string();
    let end = end.format("%Y-%m-%d %H:%M:%S%.f").to_string();
    Box::new(move |query: PagedQuery| {
        query.where_clause(
            &condition,
            [SqlParam::Text(start.clone()), SqlParam::Text(end.clone())],
        )
    })
}

/// `column LIKE %text%`（空文本不加条件）
pub fn contains(column: &str, text: &str) -> Predicate {
    let text = text.trim();
    if text.is_empty() {
        return identity();
    }
    let condition = format!("{} LIKE ?", column);
    let pattern = format!("%{}%", text);
    Box::new(move |query: PagedQuery| {
        query.where_clause(&condition, [SqlParam::Text(pattern.clone())])
    })
}

/// `column = value`（值为 None 时不加条件）
pub fn eq<V: Into<SqlParam>>(column: &str, value: Option<V>) -> Predicate {
    match value {
        Some(v) => {
            let condition = format!("{} = ?", column);
            let value: SqlParam = v.into();
            Box::new(move |query: PagedQuery| query.where_clause(&condition, [value.clone()]))
        }
        None => identity(),
    }
}

/// 追加 JOIN 子句
pub fn join(clause: &str) -> Predicate {
    let clause = clause.to_string();
    Box::new(move |query: PagedQuery| query.join(&clause))
}
