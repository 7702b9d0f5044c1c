// 数据验证工具函数
// 提供输入数据验证和格式检查功能

use regex::Regex;
use rust_decimal::Decimal;
use crate::error::{GatewayError, GatewayResult};

/// 金额上限 9,999,999,999.99，对应NUMERIC(12,2)列
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// 验证邮箱地址格式
///
/// # Arguments
/// * `email` - 邮箱地址字符串
///
/// # Returns
/// * 邮箱是否有效
pub fn validate_email(email: &str) -> bool {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    email_regex.is_match(email)
}

/// 验证URL格式
///
/// # Arguments
/// * `url` - URL字符串
///
/// # Returns
/// * URL是否有效
pub fn validate_url(url: &str) -> bool {
    let url_regex = Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap();
    url_regex.is_match(url)
}

/// 验证支付金额
///
/// 金额必须为正，最多两位小数，且不超过存储列的取值范围
pub fn validate_payment_amount(amount: &Decimal) -> GatewayResult<()> {
    if *amount <= Decimal::ZERO {
        return Err(GatewayError::InvalidRequest(
            "Payment amount must be positive".to_string(),
        ));
    }

    if amount.scale() > 2 {
        return Err(GatewayError::InvalidRequest(
            "Payment amount supports at most 2 decimal places".to_string(),
        ));
    }

    if *amount > MAX_AMOUNT {
        return Err(GatewayError::InvalidRequest(
            "Payment amount too large".to_string(),
        ));
    }

    Ok(())
}

/// 验证订单ID格式
///
/// # Arguments
/// * `order_id` - 订单ID字符串
pub fn validate_order_id(order_id: &str) -> GatewayResult<()> {
    if order_id.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Order ID cannot be empty".to_string(),
        ));
    }

    if order_id.len() > 255 {
        return Err(GatewayError::InvalidRequest(
            "Order ID too long (max 255 characters)".to_string(),
        ));
    }

    // 只允许字母、数字、下划线、连字符
    let valid_chars = order_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-');

    if !valid_chars {
        return Err(GatewayError::InvalidRequest(
            "Order ID contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        // 有效邮箱
        assert!(validate_email("test@example.com"));
        assert!(validate_email("user.name+tag@domain.co.uk"));

        // 无效邮箱
        assert!(!validate_email("invalid-email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/webhook"));
        assert!(validate_url("http://localhost:8080/hook"));

        assert!(!validate_url("ftp://example.com"));
        assert!(!validate_url("not a url"));
    }

    #[test]
    fn test_validate_payment_amount() {
        // 有效金额
        assert!(validate_payment_amount(&"1500.00".parse().unwrap()).is_ok());
        assert!(validate_payment_amount(&"0.01".parse().unwrap()).is_ok());

        // 无效金额
        assert!(validate_payment_amount(&Decimal::ZERO).is_err());
        assert!(validate_payment_amount(&"-1.00".parse().unwrap()).is_err());
        assert!(validate_payment_amount(&"1.001".parse().unwrap()).is_err());
        assert!(validate_payment_amount(&"99999999999.00".parse().unwrap()).is_err());
    }

    #[test]
    fn test_validate_order_id() {
        assert!(validate_order_id("ORDER_2024-001").is_ok());

        assert!(validate_order_id("").is_err());
        assert!(validate_order_id("order with spaces").is_err());
        assert!(validate_order_id(&"X".repeat(256)).is_err());
    }
}
