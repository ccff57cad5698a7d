// ==========================================
// 电机来料检验数据服务 - API层错误类型
// ==========================================
// 职责: 把仓储/导入错误收敛为调用方可见的两类失败
// - DataAccessError: 存储不可用 / 查询非法（从不自动重试）
// - ImportValidationError: 载荷无法作为表格打开（写库之前中止）
// 说明: 单行跳过不是错误
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("数据访问失败: {0}")]
    DataAccessError(String),

    #[error("导入载荷无效: {0}")]
    ImportValidationError(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::LockError(msg) => {
                ApiError::DataAccessError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DataAccessError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(repo) => ApiError::from(repo),
            ImportError::Other(err) => ApiError::Other(err),
            payload => ApiError::ImportValidationError(payload.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
