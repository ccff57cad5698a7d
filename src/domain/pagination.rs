// ==========================================
// 电机来料检验数据服务 - 分页模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认页大小
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// 导出全部的页大小哨兵值
pub const EXPORT_ALL_PAGE_SIZE: i64 = -1;

/// 分页请求（调用方原始输入，未归一化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_num: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page_num: i64, page_size: i64) -> Self {
        Self { page_num, page_size }
    }

    /// 导出全部
    pub fn export_all() -> Self {
        Self::new(1, EXPORT_ALL_PAGE_SIZE)
    }

    pub fn is_export_all(&self) -> bool {
        self.page_size == EXPORT_ALL_PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// 分页结果描述
///
/// 导出全部模式下 `page_size == total`，调用方据此区分"全部返回"与"单页返回"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResult {
    pub total: i64,
    pub page_num: i64,
    pub page_size: i64,
}

/// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationResult,
}
