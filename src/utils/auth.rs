// 认证工具函数
// 提供API密钥提取、商户认证、签名头提取等功能

use actix_web::{error::ErrorUnauthorized, HttpRequest, Result as ActixResult};
use crate::models::Merchant;
use crate::services::MerchantService;

/// Webhook签名头名称
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// 从HTTP请求中提取API密钥
///
/// # Arguments
/// * `req` - HTTP请求对象
///
/// # Returns
/// * API密钥字符串
pub fn extract_api_key(req: &HttpRequest) -> ActixResult<String> {
    // 从Authorization头部提取Bearer token
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Ok(token.to_string());
            }
        }
    }

    // 从X-API-Key头部提取
    if let Some(api_key_header) = req.headers().get("X-API-Key") {
        if let Ok(api_key) = api_key_header.to_str() {
            return Ok(api_key.to_string());
        }
    }

    Err(ErrorUnauthorized("Missing or invalid API key"))
}

/// 验证API密钥并返回商户信息
///
/// # Arguments
/// * `service` - 商户服务
/// * `req` - HTTP请求对象
///
/// # Returns
/// * 活跃商户信息
pub async fn authenticate_merchant(
    service: &MerchantService,
    req: &HttpRequest,
) -> ActixResult<Merchant> {
    let api_key = extract_api_key(req)?;

    let merchant = service
        .get_merchant_by_api_key(&api_key)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    merchant.ok_or_else(|| ErrorUnauthorized("Invalid or inactive API key"))
}

/// 从HTTP请求中提取Webhook签名头
///
/// 缺失的签名头直接拒绝，入站Webhook不接受未签名请求
pub fn extract_signature_header(req: &HttpRequest) -> ActixResult<String> {
    req.headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .ok_or_else(|| ErrorUnauthorized("Missing webhook signature header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_api_key_from_bearer() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer pk_live_abc123"))
            .to_http_request();
        assert_eq!(extract_api_key(&req).unwrap(), "pk_live_abc123");
    }

    #[test]
    fn test_extract_api_key_from_header() {
        let req = TestRequest::default()
            .insert_header(("X-API-Key", "pk_live_xyz789"))
            .to_http_request();
        assert_eq!(extract_api_key(&req).unwrap(), "pk_live_xyz789");
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let req = TestRequest::default().to_http_request();
        assert!(extract_api_key(&req).is_err());
    }

    #[test]
    fn test_extract_signature_header() {
        let req = TestRequest::default()
            .insert_header((SIGNATURE_HEADER, "sha256=abcdef"))
            .to_http_request();
        assert_eq!(extract_signature_header(&req).unwrap(), "sha256=abcdef");

        let bare = TestRequest::default().to_http_request();
        assert!(extract_signature_header(&bare).is_err());
    }
}
