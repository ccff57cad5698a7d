// ==========================================
// 电机来料检验数据服务 - 检验记录领域模型
// ==========================================
// 职责: 检验记录（只读输入）与分组聚合元组
// 红线: 检验记录由持久层拥有，核心只读不写
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// InspectionRecord - 检验记录
// ==========================================
// 对应 products 表，一条记录代表一台被检产品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: i64,                          // 主键
    pub sn: String,                       // 产品序列号
    pub created_at: NaiveDateTime,        // 检验时间
    pub has_defect: bool,                 // 是否不良
    pub defect_reason: String,            // 不良原因（合格时为空）
    pub batch_number: String,             // 批次号
    pub product_model_id: i64,            // 关联型号（型号再关联厂家）
    pub product_line_id: Option<i64>,     // 产线（可选）
    pub pallet_id: Option<i64>,           // 托盘（可选）
}

// ==========================================
// GroupedAggregate - 分组聚合元组
// ==========================================
// 一次分组查询的单行结果: (日期, 厂家, 不良原因) -> 计数
// 不变式: defect_count <= total_count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedAggregate {
    pub date: NaiveDate,
    pub supplier_id: i64,
    pub supplier_name: String,
    pub defect_reason: String,
    pub total_count: i64,
    pub defect_count: i64,
}

impl GroupedAggregate {
    /// 不良原因是否为空
    pub fn has_reason(&self) -> bool {
        !self.defect_reason.is_empty()
    }
}
