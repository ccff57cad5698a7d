// ==========================================
// 电机来料检验数据服务 - 报表模型
// ==========================================
// 不合格报表 / 检测报表 / 检测费用报表
// ==========================================

use crate::domain::pagination::PageRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// 不合格报表
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefectReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub supplier_id: Option<i64>,
    pub product_model_sn: String, // 模糊匹配
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectReportItem {
    pub supplier_name: Option<String>,
    pub quality_date: NaiveDateTime,
    pub product_sn: String,
    pub product_model_sn: Option<String>,
    pub description: Option<String>,
    pub batch_number: String,
    pub defect_reason: String,
}

// ==========================================
// 检测报表（按物料编码 + 批次 + 日期分组）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectionReportQuery {
    pub product_model_sn: String, // 物料编码
    pub batch_number: String,     // 批次号
    pub supplier_name: String,    // 生产厂家
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionReportItem {
    pub product_model_sn: Option<String>,
    pub description: Option<String>,
    pub batch_number: String,
    pub inspection_date: NaiveDate,
    pub supplier_name: Option<String>,
    pub product_line: Option<String>,
    pub inspection_count: i64,
    pub qualified_count: i64,
    pub unqualified_count: i64,
}

// ==========================================
// 检测费用报表（按厂家 + 物料编码 + 日期分组）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostReportQuery {
    pub supplier_name: String,
    pub product_model_sn: String,
    pub motor_type: String, // 型号描述
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReportItem {
    pub supplier_name: Option<String>,
    pub product_model_sn: Option<String>,
    pub motor_type: Option<String>,
    pub test_date: NaiveDate,
    pub qualified_count: i64,
    pub unqualified_count: i64,
    pub total_count: i64,
}
