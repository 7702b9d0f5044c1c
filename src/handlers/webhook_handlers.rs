// Webhook API处理器
// 入站事件接收与验签、出站测试投递、签名调试

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use crate::models::{ApiResponse, SignatureTestRequest};
use crate::services::WebhookService;
use crate::state::AppState;
use crate::utils::authenticate_merchant;
use crate::utils::auth::extract_signature_header;
use crate::utils::crypto::{parse_signature_header, validate_signature};

/// 接收支付网关Webhook事件
/// POST /api/v1/webhooks/payment
///
/// 验签基于原始请求字节，JSON解析在验签通过之后进行。
/// 未签名或签名无效的请求一律拒绝。
pub async fn receive_payment_webhook(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let header_value = extract_signature_header(&req)?;
    let signature = parse_signature_header(&header_value)?;
    validate_signature(&body, signature, &data.config.webhook.secret)?;

    let mutated = data.webhook_service().apply_event(&body).await?;
    data.cache.invalidate(&mutated.invalidate);

    log::info!(
        "Webhook processed for {}: {}",
        mutated.value.reference_id,
        mutated.value.result
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(mutated.value)))
}

/// 发送测试Webhook到商户回调地址
/// POST /api/v1/webhooks/test
///
/// 使用商户自己的webhook_secret签名出站请求
pub async fn test_webhook(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;

    let result = data.webhook_service().send_test_webhook(merchant.id).await?;

    log::info!(
        "Test webhook for merchant {}: delivered={}",
        merchant.id,
        result.delivered
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// 计算测试签名
/// POST /api/v1/webhooks/test-signature
///
/// 对接调试用，返回给定payload和密钥的签名及完整头部值
pub async fn test_signature(
    request: web::Json<SignatureTestRequest>,
) -> ActixResult<HttpResponse> {
    let response = WebhookService::sign_test_payload(request.into_inner())?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
