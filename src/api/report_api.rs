// ==========================================
// 电机来料检验数据服务 - 报表 API
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::pagination::PagedResponse;
use crate::domain::report::{
    CostReportItem, CostReportQuery, DefectReportItem, DefectReportQuery, InspectionReportItem,
    InspectionReportQuery,
};
use crate::perf::OpTimer;
use crate::repository::report_repo::ReportRepository;

/// 报表API（分页，page_size = -1 导出全部）
pub struct ReportApi {
    report_repo: Arc<ReportRepository>,
}

impl ReportApi {
    pub fn new(report_repo: Arc<ReportRepository>) -> Self {
        Self { report_repo }
    }

    /// 不合格明细报表
    pub fn defect_report(&self, query: &DefectReportQuery) -> ApiResult<PagedResponse<DefectReportItem>> {
        let _perf = OpTimer::start("defect_report");
        Self::check_dates(query.start_date, query.end_date)?;
        Ok(self.report_repo.defect_report(query)?)
    }

    /// 检测汇总报表
    pub fn inspection_report(
        &self,
        query: &InspectionReportQuery,
    ) -> ApiResult<PagedResponse<InspectionReportItem>> {
        let _perf = OpTimer::start("inspection_report");
        Self::check_dates(query.start_date, query.end_date)?;
        Ok(self.report_repo.inspection_report(query)?)
    }

    /// 检测费用报表
    pub fn cost_report(&self, query: &CostReportQuery) -> ApiResult<PagedResponse<CostReportItem>> {
        let _perf = OpTimer::start("cost_report");
        Self::check_dates(query.start_date, query.end_date)?;
        Ok(self.report_repo.cost_report(query)?)
    }

    fn check_dates(
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) -> ApiResult<()> {
        match (start, end) {
            (Some(s), Some(e)) if s > e => Err(ApiError::InvalidInput(format!(
                "开始日期 {} 晚于结束日期 {}",
                s, e
            ))),
            _ => Ok(()),
        }
    }
}
