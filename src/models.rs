// 数据模型定义
// 包含商户、支付订单、账本交易、Webhook等核心数据结构

/// 为枚举实现VARCHAR列的存取
///
/// 枚举在数据库中以文本形式保存，编码解码都走显式的
/// 字符串映射，未知取值在解码时报错而不是静默吞掉。
macro_rules! varchar_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::std::string::String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::std::string::String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> ::sqlx::Encode<'q, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::sqlx::encode::IsNull {
                <&str as ::sqlx::Encode<'q, ::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let text = <&str as ::sqlx::Decode<'r, ::sqlx::Postgres>>::decode(value)?;
                Self::parse(text).ok_or_else(|| {
                    format!("unknown {} value: {}", stringify!($name), text).into()
                })
            }
        }
    };
}

pub(crate) use varchar_enum;

mod merchant;
mod payment;
mod transaction;
mod webhook;

// 重新导出核心类型
pub use merchant::*;
pub use payment::*;
pub use transaction::*;
pub use webhook::*;

use serde::Serialize;

/// 标准API响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 响应状态
    pub success: bool,
    /// 错误码 (成功时为空)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// 响应消息
    pub message: String,
    /// 响应数据
    pub data: Option<T>,
    /// 响应时间戳
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            error_code: None,
            message: "Success".to_string(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    /// 创建错误响应
    pub fn error(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            error_code: None,
            message: message.to_string(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 创建带错误码的错误响应
    pub fn error_with_code(error_code: &str, message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            error_code: Some(error_code.to_string()),
            message: message.to_string(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}
