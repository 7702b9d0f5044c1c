// 错误类型定义
// 业务错误的统一枚举，以及到HTTP响应的映射

use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use thiserror::Error;
use crate::models::ApiResponse;

/// 网关业务错误
///
/// 四种业务错误类型加上存储层错误的透传。
/// 存储层错误不做吞没处理，避免掩盖数据一致性风险。
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 引用的实体不存在
    #[error("{resource} not found with {field}: '{value}'")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// 业务规则校验失败 (状态错误、已过期、余额不足等)
    #[error("{0}")]
    InvalidRequest(String),

    /// 唯一性约束冲突
    #[error("{resource} already exists with {field}: '{value}'")]
    DuplicateResource {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// HMAC签名验证失败
    #[error("{0}")]
    InvalidSignature(String),

    /// 存储层错误
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl GatewayError {
    /// 构造NotFound错误
    pub fn not_found(resource: &'static str, field: &'static str, value: impl ToString) -> Self {
        GatewayError::NotFound {
            resource,
            field,
            value: value.to_string(),
        }
    }

    /// 构造DuplicateResource错误
    pub fn duplicate(resource: &'static str, field: &'static str, value: impl ToString) -> Self {
        GatewayError::DuplicateResource {
            resource,
            field,
            value: value.to_string(),
        }
    }

    /// 错误码字符串 (供API响应使用)
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::NotFound { .. } => "NOT_FOUND",
            GatewayError::InvalidRequest(_) => "INVALID_REQUEST",
            GatewayError::DuplicateResource { .. } => "DUPLICATE",
            GatewayError::InvalidSignature(_) => "INVALID_SIGNATURE",
            GatewayError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::DuplicateResource { .. } => StatusCode::CONFLICT,
            GatewayError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            GatewayError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // 存储层错误不向调用方泄漏细节
        let message = match self {
            GatewayError::Database(e) => {
                log::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code())
            .json(ApiResponse::<()>::error_with_code(self.error_code(), &message))
    }
}

/// 业务操作结果类型别名
pub type GatewayResult<T> = Result<T, GatewayError>;
