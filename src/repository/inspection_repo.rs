// ==========================================
// 电机来料检验数据服务 - 检验记录仓储
// ==========================================
// 职责: 检验记录的分组聚合查询（质量统计唯一的数据来源）
// 红线: Repository 不含业务逻辑，视图派生在 engine 层完成
// ==========================================

use crate::domain::inspection::GroupedAggregate;
use crate::query::predicates;
use crate::query::sql_builder::PagedQuery;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// GroupedAggregateSource Trait
// ==========================================
// 用途: 质量统计引擎的数据来源接口（便于替换为测试桩）
// 实现者: InspectionRepository（rusqlite）
pub trait GroupedAggregateSource: Send + Sync {
    /// 按 (日期, 厂家ID, 厂家名, 不良原因) 分组统计 [start, end] 内的检验记录
    ///
    /// # 返回
    /// - Ok(Vec<GroupedAggregate>): 按日期、厂家名排序
    /// - Err: 区间非法 / 数据库错误
    fn fetch_grouped_aggregates(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<GroupedAggregate>>;
}

pub struct InspectionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InspectionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn validate_interval(start: NaiveDateTime, end: NaiveDateTime) -> RepositoryResult<()> {
        if start > end {
            return Err(RepositoryError::ValidationError(format!(
                "时间区间非法: start={} 晚于 end={}",
                start, end
            )));
        }
        Ok(())
    }

    /// 分组聚合查询
    fn grouped_query(start: NaiveDateTime, end: NaiveDateTime) -> PagedQuery {
        PagedQuery::new(
            r#"DATE(p.created_at) AS stat_date,
                s.id AS supplier_id,
                s.name AS supplier_name,
                COALESCE(p.defect_reason, '') AS defect_reason,
                COUNT(*) AS total_count,
                SUM(CASE WHEN p.has_defect = 1 THEN 1 ELSE 0 END) AS defect_count"#,
            "products p",
        )
        .join("INNER JOIN product_models pm ON p.product_model_id = pm.id")
        .join("INNER JOIN suppliers s ON pm.supplier_id = s.id")
        .apply(&[predicates::between("p.created_at", start, end)])
        .group_by("DATE(p.created_at), s.id, s.name, COALESCE(p.defect_reason, '')")
        .order_by("stat_date ASC, supplier_name ASC, defect_reason ASC")
    }

    /// 区间内检验记录总数
    pub fn count_in_interval(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<i64> {
        Self::validate_interval(start, end)?;
        let conn = self.get_conn()?;

        let plan = PagedQuery::new("p.id", "products p")
            .apply(&[predicates::between("p.created_at", start, end)])
            .count_plan();
        plan.query_scalar(&conn)
    }
}

impl GroupedAggregateSource for InspectionRepository {
    fn fetch_grouped_aggregates(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RepositoryResult<Vec<GroupedAggregate>> {
        Self::validate_interval(start, end)?;
        let conn = self.get_conn()?;

        let plan = Self::grouped_query(start, end).page_plan(None);
        let aggregates = plan.query_rows(&conn, |row| {
            Ok(GroupedAggregate {
                date: row.get(0)?,
                supplier_id: row.get(1)?,
                supplier_name: row.get(2)?,
                defect_reason: row.get(3)?,
                total_count: row.get(4)?,
                defect_count: row.get(5)?,
            })
        })?;

        tracing::debug!(
            start = %start,
            end = %end,
            tuples = aggregates.len(),
            "检验记录分组聚合完成"
        );

        Ok(aggregates)
    }
}
