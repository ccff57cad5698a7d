// ==========================================
// 电机来料检验数据服务 - 分页处理
// ==========================================
// 规则:
// - page_size == -1: 导出全部，page_size 取总数，page_num 固定为 1，不加 LIMIT
// - 其他 page_size <= 0 归一化为 20；page_num <= 0 归一化为 1
// - 两种模式排序一致
// ==========================================

use crate::domain::pagination::{PageRequest, PaginationResult, DEFAULT_PAGE_SIZE};
use crate::query::sql_builder::{PagedQuery, QueryPlan};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;

/// 归一化分页参数
///
/// # 返回
/// - `Option<(limit, offset)>`: None 表示导出全部
/// - `PaginationResult`: 分页描述
///
/// # 示例
/// ```
/// use vmi_analytics::domain::PageRequest;
/// use vmi_analytics::query::resolve_pagination;
///
/// let (limit, result) = resolve_pagination(PageRequest::new(2, 0), 57);
/// assert_eq!(limit, Some((20, 20)));
/// assert_eq!(result.page_size, 20);
///
/// let (limit, result) = resolve_pagination(PageRequest::export_all(), 57);
/// assert_eq!(limit, None);
/// assert_eq!(result.page_size, 57);
/// ```
pub fn resolve_pagination(
    request: PageRequest,
    total: i64,
) -> (Option<(i64, i64)>, PaginationResult) {
    if request.is_export_all() {
        return (
            None,
            PaginationResult {
                total,
                page_num: 1,
                page_size: total,
            },
        );
    }

    let page_size = if request.page_size <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        request.page_size
    };
    let page_num = if request.page_num <= 0 { 1 } else { request.page_num };
    let offset = (page_num - 1).saturating_mul(page_size);

    (
        Some((page_size, offset)),
        PaginationResult {
            total,
            page_num,
            page_size,
        },
    )
}

/// 构建分页查询: 先统计总数，再生成数据查询计划
///
/// # 参数
/// - conn: 数据库连接（仅用于执行 COUNT）
/// - query: 已组合好过滤/谓词/排序的查询
/// - request: 分页请求
///
/// # 返回
/// - (QueryPlan, PaginationResult)
/// - Err: 未指定排序 / 数据库错误
pub fn build_paged_query(
    conn: &Connection,
    query: &PagedQuery,
    request: PageRequest,
) -> RepositoryResult<(QueryPlan, PaginationResult)> {
    if !query.has_order() {
        return Err(RepositoryError::ValidationError(
            "分页查询必须显式指定排序".to_string(),
        ));
    }

    let total = query.count_plan().query_scalar(conn)?;
    let (limit_offset, pagination) = resolve_pagination(request, total);

    tracing::debug!(
        total = total,
        page_num = pagination.page_num,
        page_size = pagination.page_size,
        export_all = limit_offset.is_none(),
        "分页查询"
    );

    Ok((query.page_plan(limit_offset), pagination))
}
