// ==========================================
// 电机来料检验数据服务 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单行解析失败不是错误（记为跳过），这里只有整体失败
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 载荷错误（任何写库之前中止） =====
    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("Excel 文件无工作表")]
    NoWorksheet,

    // ===== 持久化错误（事务已回滚） =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
