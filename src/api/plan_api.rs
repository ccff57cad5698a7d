// ==========================================
// 电机来料检验数据服务 - 生产计划 API
// ==========================================
// 职责: reconcileProductionPlan 调用契约 + 计划分页查询
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::api::error::ApiResult;
use crate::domain::pagination::{PageRequest, PagedResponse};
use crate::domain::production_plan::ProductionPlanRow;
use crate::importer::plan_reconciler::{PlanReconciler, ReconcileReport};
use crate::perf::OpTimer;
use crate::query::sql_builder::{EqFilters, Predicate};
use crate::repository::production_plan_repo::ProductionPlanRepository;

/// 生产计划API
pub struct PlanApi {
    plan_repo: Arc<ProductionPlanRepository>,
    reconciler: PlanReconciler,
}

impl PlanApi {
    pub fn new(plan_repo: Arc<ProductionPlanRepository>) -> Self {
        let reconciler = PlanReconciler::new(plan_repo.clone());
        Self {
            plan_repo,
            reconciler,
        }
    }

    /// 以表格载荷对账目标日期的生产计划
    ///
    /// # 返回
    /// - Ok(Vec<ProductionPlanRow>): 保留并落库的计划行（输入顺序）
    /// - Err(ImportValidationError): 载荷无法打开，未写库
    /// - Err(DataAccessError): 替换事务失败，目标日期旧数据保持不变
    pub fn reconcile_production_plan(
        &self,
        payload: &[u8],
        target_date: NaiveDate,
    ) -> ApiResult<Vec<ProductionPlanRow>> {
        Ok(self.reconcile_production_plan_report(payload, target_date)?.rows)
    }

    /// 同上，返回含跳过明细的完整结果
    pub fn reconcile_production_plan_report(
        &self,
        payload: &[u8],
        target_date: NaiveDate,
    ) -> ApiResult<ReconcileReport> {
        let _perf = OpTimer::start("reconcile_production_plan");
        let report = self.reconciler.reconcile(payload, target_date)?;

        info!(
            run_id = %report.run_id,
            target_date = %target_date,
            deleted = report.deleted,
            inserted = report.rows.len(),
            skipped = report.skipped.len(),
            "生产计划对账完成"
        );
        Ok(report)
    }

    /// 计划分页查询（按导入顺序）
    pub fn list_production_plans(
        &self,
        filters: &EqFilters,
        predicates: &[Predicate],
        page: PageRequest,
    ) -> ApiResult<PagedResponse<ProductionPlanRow>> {
        let _perf = OpTimer::start("list_production_plans");
        Ok(self.plan_repo.list_plans(filters, predicates, page)?)
    }

    /// 查询某日期的全部计划
    pub fn plans_for_date(&self, plan_date: NaiveDate) -> ApiResult<Vec<ProductionPlanRow>> {
        Ok(self.plan_repo.find_by_plan_date(plan_date)?)
    }
}
