// ==========================================
// 电机来料检验数据服务 - 生产计划仓储
// ==========================================
// 职责:
// - 生产计划分页查询（保持导入顺序: id ASC）
// - 按计划日期整体替换（删除 + 批量插入 在同一事务内）
// 并发说明:
// - 替换使用 IMMEDIATE 事务，读者不会看到"删了一半/插了一半"的状态
// - 同一日期的并发替换不做应用层加锁，以后提交者为准
// ==========================================

use crate::domain::pagination::{PageRequest, PagedResponse};
use crate::domain::production_plan::{HorizonCounts, ProductionPlanRow};
use crate::query::pagination::build_paged_query;
use crate::query::sql_builder::{EqFilters, PagedQuery, Predicate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::sync::{Arc, Mutex, MutexGuard};

const PLAN_COLUMNS: &str = r#"id, material_code, part_number, plan_type, manufacturer, plan_date,
    production_line,
    t_planned, t_actual, t_unfinished,
    t1_planned, t1_actual, t1_unfinished,
    t2_planned, t2_actual, t2_unfinished,
    t3_planned, t3_actual, t3_unfinished,
    total_planned, total_inspected, total_unfinished, achievement_rate, special_note"#;

fn map_plan_row(row: &Row<'_>) -> rusqlite::Result<ProductionPlanRow> {
    let horizon = |base: usize| -> rusqlite::Result<HorizonCounts> {
        Ok(HorizonCounts {
            planned: row.get(base)?,
            actual: row.get(base + 1)?,
            unfinished: row.get(base + 2)?,
        })
    };

    Ok(ProductionPlanRow {
        id: Some(row.get(0)?),
        material_code: row.get(1)?,
        part_number: row.get(2)?,
        plan_type: row.get(3)?,
        manufacturer: row.get(4)?,
        plan_date: row.get(5)?,
        production_line: row.get(6)?,
        t: horizon(7)?,
        t1: horizon(10)?,
        t2: horizon(13)?,
        t3: horizon(16)?,
        total_planned: row.get(19)?,
        total_inspected: row.get(20)?,
        total_unfinished: row.get(21)?,
        achievement_rate: row.get(22)?,
        special_note: row.get(23)?,
    })
}

/// 整体替换结果
#[derive(Debug, Clone)]
pub struct ReplaceOutcome {
    pub deleted: usize,
    pub inserted: Vec<ProductionPlanRow>,
}

// ==========================================
// PlanReplaceUnit - 按日期替换的工作单元
// ==========================================
// 生命周期: begin -> delete_existing -> insert_all -> commit
// 未 commit 即 drop 时事务自动回滚
pub struct PlanReplaceUnit<'c> {
    tx: Transaction<'c>,
    plan_date: NaiveDate,
}

impl<'c> PlanReplaceUnit<'c> {
    /// 开启 IMMEDIATE 事务（立即持有写锁）
    pub fn begin(conn: &'c mut Connection, plan_date: NaiveDate) -> RepositoryResult<Self> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(Self { tx, plan_date })
    }

    /// 删除该日期的全部既有计划
    pub fn delete_existing(&self) -> RepositoryResult<usize> {
        let deleted = self.tx.execute(
            "DELETE FROM production_plans WHERE plan_date = ?1",
            params![self.plan_date],
        )?;
        Ok(deleted)
    }

    /// 批量插入，返回回填 id 的计划行（保持输入顺序）
    pub fn insert_all(&self, rows: &[ProductionPlanRow]) -> RepositoryResult<Vec<ProductionPlanRow>> {
        let mut stmt = self.tx.prepare(
            r#"
            INSERT INTO production_plans (
                material_code, part_number, plan_type, manufacturer, plan_date, production_line,
                t_planned, t_actual, t_unfinished,
                t1_planned, t1_actual, t1_unfinished,
                t2_planned, t2_actual, t2_unfinished,
                t3_planned, t3_actual, t3_unfinished,
                total_planned, total_inspected, total_unfinished, achievement_rate, special_note
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12,
                ?13, ?14, ?15,
                ?16, ?17, ?18,
                ?19, ?20, ?21, ?22, ?23
            )
            "#,
        )?;

        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            let id = stmt.insert(params![
                row.material_code,
                row.part_number,
                row.plan_type,
                row.manufacturer,
                row.plan_date,
                row.production_line,
                row.t.planned,
                row.t.actual,
                row.t.unfinished,
                row.t1.planned,
                row.t1.actual,
                row.t1.unfinished,
                row.t2.planned,
                row.t2.actual,
                row.t2.unfinished,
                row.t3.planned,
                row.t3.actual,
                row.t3.unfinished,
                row.total_planned,
                row.total_inspected,
                row.total_unfinished,
                row.achievement_rate,
                row.special_note,
            ])?;

            let mut stored = row.clone();
            stored.id = Some(id);
            inserted.push(stored);
        }

        Ok(inserted)
    }

    /// 提交事务
    pub fn commit(self) -> RepositoryResult<()> {
        self.tx
            .commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))
    }
}

// ==========================================
// ProductionPlanRepository
// ==========================================
pub struct ProductionPlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionPlanRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按日期整体替换计划
    ///
    /// # 说明
    /// - 删除与插入在同一事务内，任一步失败整体回滚（旧数据保留）
    /// - rows 为空时仍执行删除，但不插入
    /// - 不自动重试
    pub fn replace_plans_for_date(
        &self,
        plan_date: NaiveDate,
        rows: &[ProductionPlanRow],
    ) -> RepositoryResult<ReplaceOutcome> {
        let mut conn = self.get_conn()?;
        let unit = PlanReplaceUnit::begin(&mut conn, plan_date)?;

        let deleted = unit.delete_existing()?;
        let inserted = if rows.is_empty() {
            Vec::new()
        } else {
            unit.insert_all(rows)?
        };
        unit.commit()?;

        tracing::info!(
            plan_date = %plan_date,
            deleted = deleted,
            inserted = inserted.len(),
            "生产计划按日期替换完成"
        );

        Ok(ReplaceOutcome { deleted, inserted })
    }

    /// 查询某日期的全部计划（按导入顺序）
    pub fn find_by_plan_date(&self, plan_date: NaiveDate) -> RepositoryResult<Vec<ProductionPlanRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM production_plans WHERE plan_date = ?1 ORDER BY id ASC",
            PLAN_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![plan_date], map_plan_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 分页查询计划
    ///
    /// # 参数
    /// - filters: 等值过滤（列名 -> 值）
    /// - predicates: 额外谓词（范围/模糊）
    /// - page: 分页请求（page_size = -1 导出全部）
    pub fn list_plans(
        &self,
        filters: &EqFilters,
        predicates: &[Predicate],
        page: PageRequest,
    ) -> RepositoryResult<PagedResponse<ProductionPlanRow>> {
        let query = PagedQuery::new(PLAN_COLUMNS, "production_plans")
            .apply(predicates)
            .with_filters(filters)?
            .order_by("id ASC");

        let conn = self.get_conn()?;
        let (plan, pagination) = build_paged_query(&conn, &query, page)?;
        let items = plan.query_rows(&conn, map_plan_row)?;

        Ok(PagedResponse { items, pagination })
    }
}
