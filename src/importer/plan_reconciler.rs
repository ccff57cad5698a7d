// ==========================================
// 电机来料检验数据服务 - 生产计划对账
// ==========================================
// 流程:
//   1. 读取载荷（失败则在写库前中止）
//   2. 逐行解析，只保留目标日期的行
//   3. 单事务: 删除目标日期既有计划 + 插入保留行
// 红线: 任一步失败不重试；事务失败时旧数据保持不变
// ==========================================

use crate::domain::production_plan::ProductionPlanRow;
use crate::importer::error::ImportResult;
use crate::importer::plan_row_parser::{parse_plan_rows, SkippedRow};
use crate::importer::sheet_reader::read_sheet_rows;
use crate::repository::production_plan_repo::ProductionPlanRepository;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// 单次对账结果
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub run_id: String,
    pub target_date: NaiveDate,
    pub rows: Vec<ProductionPlanRow>, // 已落库（回填 id），保持输入顺序
    pub skipped: Vec<SkippedRow>,
    pub deleted: usize,
}

pub struct PlanReconciler {
    repo: Arc<ProductionPlanRepository>,
}

impl PlanReconciler {
    pub fn new(repo: Arc<ProductionPlanRepository>) -> Self {
        Self { repo }
    }

    /// 以表格载荷对账目标日期的生产计划
    pub fn reconcile(&self, payload: &[u8], target_date: NaiveDate) -> ImportResult<ReconcileReport> {
        let rows = read_sheet_rows(payload)?;
        self.reconcile_rows(&rows, target_date)
    }

    /// 以已读取的行对账（第 0 行为表头）
    pub fn reconcile_rows(
        &self,
        rows: &[Vec<String>],
        target_date: NaiveDate,
    ) -> ImportResult<ReconcileReport> {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("plan_reconcile", run_id = %run_id, target_date = %target_date);
        let _enter = span.enter();

        let parsed = parse_plan_rows(rows, target_date);
        tracing::info!(
            total_rows = rows.len().saturating_sub(1),
            accepted = parsed.accepted.len(),
            skipped = parsed.skipped.len(),
            "计划行解析完成"
        );

        let outcome = match self.repo.replace_plans_for_date(target_date, &parsed.accepted) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "计划替换失败，事务已回滚");
                return Err(e.into());
            }
        };

        Ok(ReconcileReport {
            run_id,
            target_date,
            rows: outcome.inserted,
            skipped: parsed.skipped,
            deleted: outcome.deleted,
        })
    }
}
