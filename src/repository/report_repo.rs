// ==========================================
// 电机来料检验数据服务 - 报表仓储
// ==========================================
// 报表: 不合格明细 / 检测汇总 / 检测费用汇总
// 分页: 统一走 build_paged_query（page_size = -1 导出全部）
// ==========================================

use crate::domain::pagination::PagedResponse;
use crate::domain::report::{
    CostReportItem, CostReportQuery, DefectReportItem, DefectReportQuery, InspectionReportItem,
    InspectionReportQuery,
};
use crate::query::pagination::build_paged_query;
use crate::query::predicates;
use crate::query::sql_builder::{PagedQuery, SqlParam};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ReportRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReportRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 不合格明细（仅含有不良原因的不良记录，按检验时间倒序）
    pub fn defect_report(
        &self,
        query: &DefectReportQuery,
    ) -> RepositoryResult<PagedResponse<DefectReportItem>> {
        let paged = PagedQuery::new(
            r#"s.name AS supplier_name,
                p.created_at AS quality_date,
                p.sn AS product_sn,
                pm.sn AS product_model_sn,
                pm.description AS description,
                p.batch_number,
                p.defect_reason"#,
            "products p",
        )
        .join("LEFT JOIN product_models pm ON p.product_model_id = pm.id")
        .join("LEFT JOIN suppliers s ON pm.supplier_id = s.id")
        .where_clause(
            "p.has_defect = ? AND p.defect_reason != ''",
            [SqlParam::Integer(1)],
        )
        .apply(&[
            predicates::date_from("p.created_at", query.start_date),
            predicates::date_to("p.created_at", query.end_date),
            predicates::eq("pm.supplier_id", query.supplier_id),
            predicates::contains("pm.sn", &query.product_model_sn),
        ])
        .order_by("p.created_at DESC, p.id DESC");

        let conn = self.get_conn()?;
        let (plan, pagination) = build_paged_query(&conn, &paged, query.page)?;
        let items = plan.query_rows(&conn, |row| {
            Ok(DefectReportItem {
                supplier_name: row.get(0)?,
                quality_date: row.get(1)?,
                product_sn: row.get(2)?,
                product_model_sn: row.get(3)?,
                description: row.get(4)?,
                batch_number: row.get(5)?,
                defect_reason: row.get(6)?,
            })
        })?;

        Ok(PagedResponse { items, pagination })
    }

    /// 检测汇总（物料编码 + 批次 + 日期 + 厂家 + 产线）
    pub fn inspection_report(
        &self,
        query: &InspectionReportQuery,
    ) -> RepositoryResult<PagedResponse<InspectionReportItem>> {
        let paged = PagedQuery::new(
            r#"pm.sn AS product_model_sn,
                pm.description AS description,
                p.batch_number,
                DATE(p.created_at) AS inspection_date,
                s.name AS supplier_name,
                pl.name AS product_line,
                COUNT(*) AS inspection_count,
                SUM(CASE WHEN p.has_defect = 0 THEN 1 ELSE 0 END) AS qualified_count,
                SUM(CASE WHEN p.has_defect = 1 THEN 1 ELSE 0 END) AS unqualified_count"#,
            "products p",
        )
        .join("LEFT JOIN product_models pm ON p.product_model_id = pm.id")
        .join("LEFT JOIN suppliers s ON pm.supplier_id = s.id")
        .join("LEFT JOIN product_lines pl ON p.product_line_id = pl.id")
        .apply(&[
            predicates::contains("pm.sn", &query.product_model_sn),
            predicates::contains("p.batch_number", &query.batch_number),
            predicates::contains("s.name", &query.supplier_name),
            predicates::date_from("p.created_at", query.start_date),
            predicates::date_to("p.created_at", query.end_date),
        ])
        .group_by("pm.sn, pm.description, p.batch_number, DATE(p.created_at), s.name, pl.name")
        .order_by("inspection_date DESC, pm.sn, p.batch_number");

        let conn = self.get_conn()?;
        let (plan, pagination) = build_paged_query(&conn, &paged, query.page)?;
        let items = plan.query_rows(&conn, |row| {
            Ok(InspectionReportItem {
                product_model_sn: row.get(0)?,
                description: row.get(1)?,
                batch_number: row.get(2)?,
                inspection_date: row.get(3)?,
                supplier_name: row.get(4)?,
                product_line: row.get(5)?,
                inspection_count: row.get(6)?,
                qualified_count: row.get(7)?,
                unqualified_count: row.get(8)?,
            })
        })?;

        Ok(PagedResponse { items, pagination })
    }

    /// 检测费用汇总（厂家 + 物料编码 + 型号描述 + 日期）
    pub fn cost_report(
        &self,
        query: &CostReportQuery,
    ) -> RepositoryResult<PagedResponse<CostReportItem>> {
        let paged = PagedQuery::new(
            r#"s.name AS supplier_name,
                pm.sn AS product_model_sn,
                pm.description AS motor_type,
                DATE(p.created_at) AS test_date,
                SUM(CASE WHEN p.has_defect = 0 THEN 1 ELSE 0 END) AS qualified_count,
                SUM(CASE WHEN p.has_defect = 1 THEN 1 ELSE 0 END) AS unqualified_count,
                COUNT(*) AS total_count"#,
            "products p",
        )
        .join("LEFT JOIN product_models pm ON p.product_model_id = pm.id")
        .join("LEFT JOIN suppliers s ON pm.supplier_id = s.id")
        .apply(&[
            predicates::contains("s.name", &query.supplier_name),
            predicates::contains("pm.sn", &query.product_model_sn),
            predicates::contains("pm.description", &query.motor_type),
            predicates::date_from("p.created_at", query.start_date),
            predicates::date_to("p.created_at", query.end_date),
        ])
        .group_by("s.name, pm.sn, pm.description, DATE(p.created_at)")
        .order_by("test_date DESC, s.name, pm.sn");

        let conn = self.get_conn()?;
        let (plan, pagination) = build_paged_query(&conn, &paged, query.page)?;
        let items = plan.query_rows(&conn, |row| {
            Ok(CostReportItem {
                supplier_name: row.get(0)?,
                product_model_sn: row.get(1)?,
                motor_type: row.get(2)?,
                test_date: row.get(3)?,
                qualified_count: row.get(4)?,
                unqualified_count: row.get(5)?,
                total_count: row.get(6)?,
            })
        })?;

        Ok(PagedResponse { items, pagination })
    }
}
