// ==========================================
// 门店库存调拨系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户友好的错误消息
// 红线: 可解释性 —— 所有错误信息必须包含显式原因；
//       任何下层异常不得未经格式化逃逸给调用方
// ==========================================

use crate::engine::error::EngineError;
use crate::engine::orchestrator::AllocationRunError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("字段值错误 (field={field}): {rule}")]
    FieldValueError { field: String, rule: String },

    // ==========================================
    // 资源错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 存储错误
    // ==========================================
    /// 瞬时存储失败，重试耗尽后才对外暴露
    #[error("存储重试耗尽: operation={operation}, attempts={attempts}, 原因: {message}")]
    StorageRetryExhausted {
        operation: String,
        attempts: u32,
        message: String,
    },

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 内部一致性错误（致命，不可重试）
    // ==========================================
    #[error("内部一致性校验失败: {0}")]
    ConsistencyViolation(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 存储失败的尝试次数（仅 StorageRetryExhausted 有值）
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ApiError::StorageRetryExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

// ==========================================
// 从下层错误转换
// 目的: 把技术错误转换为用户可读的业务错误
// ==========================================

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => ApiError::FieldValueError {
                field,
                rule: message,
            },
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::ConsistencyViolation(err.to_string())
    }
}

impl From<AllocationRunError> for ApiError {
    fn from(err: AllocationRunError) -> Self {
        match err {
            AllocationRunError::DestinationUnavailable(msg) => ApiError::NotFound(msg),
            AllocationRunError::Storage(retry_err) => ApiError::StorageRetryExhausted {
                operation: retry_err.operation.clone(),
                attempts: retry_err.attempts,
                message: retry_err.source.to_string(),
            },
            AllocationRunError::Consistency(engine_err) => engine_err.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
