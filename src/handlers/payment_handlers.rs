// 支付订单API处理器
// 所有支付接口要求商户API密钥认证，写操作提交后清除相关缓存

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;
use crate::cache::CacheKey;
use crate::error::GatewayError;
use crate::models::{
    ApiResponse, CancelPaymentRequest, ChargeResultRequest, CreatePaymentRequest,
    PaymentListQuery, RefundPaymentRequest,
};
use crate::services::payment_service::PAYMENT_EXPIRED_MESSAGE;
use crate::services::PaymentService;
use crate::state::AppState;
use crate::utils::authenticate_merchant;

/// 校验支付订单归属于当前商户
///
/// 其他商户的订单一律按不存在处理，不暴露存在性
async fn authorize_payment_owner(
    service: &PaymentService,
    merchant_id: Uuid,
    reference_id: &str,
) -> ActixResult<()> {
    let owner = service.get_payment_owner(reference_id).await?;
    if owner != merchant_id {
        return Err(GatewayError::not_found("Payment", "referenceId", reference_id).into());
    }
    Ok(())
}

/// 创建支付订单
/// POST /api/v1/payments
pub async fn create_payment(
    req: HttpRequest,
    data: web::Data<AppState>,
    request: web::Json<CreatePaymentRequest>,
) -> ActixResult<HttpResponse> {
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;

    let mutated = data
        .payment_service()
        .create_payment(merchant.id, request.into_inner())
        .await?;
    data.cache.invalidate(&mutated.invalidate);

    log::info!(
        "Payment created: {} for merchant {}",
        mutated.value.reference_id,
        merchant.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(mutated.value)))
}

/// 获取支付订单列表
/// GET /api/v1/payments
pub async fn list_payments(
    req: HttpRequest,
    data: web::Data<AppState>,
    query: web::Query<PaymentListQuery>,
) -> ActixResult<HttpResponse> {
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;

    // 列表按商户分页查询，不走进程内缓存
    let payments = data
        .payment_service()
        .list_payments(merchant.id, query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(payments)))
}

/// 获取支付订单详情
/// GET /api/v1/payments/{reference_id}
pub async fn get_payment(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let reference_id = path.into_inner();
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;
    let service = data.payment_service();

    authorize_payment_owner(&service, merchant.id, &reference_id).await?;

    let key = CacheKey::PaymentByRef(reference_id.clone());
    if let Some(cached) = data.cache.get(&key) {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(cached)));
    }

    let payment = service.get_payment(&reference_id).await?;
    let value = serde_json::to_value(&payment).map_err(actix_web::error::ErrorInternalServerError)?;
    data.cache.put(&key, value.clone());

    Ok(HttpResponse::Ok().json(ApiResponse::success(value)))
}

/// 获取支付订单的账本交易记录
/// GET /api/v1/payments/{reference_id}/transactions
pub async fn list_payment_transactions(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let reference_id = path.into_inner();
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;
    let service = data.payment_service();

    authorize_payment_owner(&service, merchant.id, &reference_id).await?;

    let transactions = service.list_transactions(&reference_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(transactions)))
}

/// 完成支付订单
/// POST /api/v1/payments/{reference_id}/complete
pub async fn complete_payment(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let reference_id = path.into_inner();
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;
    let service = data.payment_service();

    authorize_payment_owner(&service, merchant.id, &reference_id).await?;

    match service.complete_payment(&reference_id).await {
        Ok(mutated) => {
            data.cache.invalidate(&mutated.invalidate);
            log::info!("Payment completed: {}", reference_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(mutated.value)))
        }
        Err(err) => {
            // 过期转换在拒绝前已经提交，相关缓存同样失效
            if matches!(&err, GatewayError::InvalidRequest(msg) if msg == PAYMENT_EXPIRED_MESSAGE) {
                data.cache
                    .invalidate(&CacheKey::for_payment_mutation(&reference_id));
            }
            Err(err.into())
        }
    }
}

/// 取消支付订单
/// POST /api/v1/payments/{reference_id}/cancel
pub async fn cancel_payment(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<CancelPaymentRequest>,
) -> ActixResult<HttpResponse> {
    let reference_id = path.into_inner();
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;
    let service = data.payment_service();

    authorize_payment_owner(&service, merchant.id, &reference_id).await?;

    let mutated = service
        .cancel_payment(&reference_id, request.into_inner())
        .await?;
    data.cache.invalidate(&mutated.invalidate);

    log::info!("Payment cancelled: {}", reference_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(mutated.value)))
}

/// 退款
/// POST /api/v1/payments/{reference_id}/refund
pub async fn refund_payment(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<RefundPaymentRequest>,
) -> ActixResult<HttpResponse> {
    let reference_id = path.into_inner();
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;
    let service = data.payment_service();

    authorize_payment_owner(&service, merchant.id, &reference_id).await?;

    let mutated = service
        .refund_payment(&reference_id, request.into_inner())
        .await?;
    data.cache.invalidate(&mutated.invalidate);

    log::info!("Payment refunded: {}", reference_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(mutated.value)))
}

/// 应用支付处理器结果
/// POST /api/v1/payments/{reference_id}/charge-result
pub async fn apply_charge_result(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<ChargeResultRequest>,
) -> ActixResult<HttpResponse> {
    let reference_id = path.into_inner();
    let merchant = authenticate_merchant(&data.merchant_service(), &req).await?;
    let service = data.payment_service();

    authorize_payment_owner(&service, merchant.id, &reference_id).await?;

    let outcome = request.outcome;
    let mutated = service
        .apply_charge_outcome(&reference_id, request.into_inner())
        .await?;
    data.cache.invalidate(&mutated.invalidate);

    log::info!(
        "Charge result applied for {}: {:?}",
        reference_id,
        outcome
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(mutated.value)))
}

/// Dashboard聚合统计
/// GET /api/v1/dashboard/stats
pub async fn dashboard_stats(data: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let key = CacheKey::DashboardStats;
    if let Some(cached) = data.cache.get(&key) {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(cached)));
    }

    let stats = data.payment_service().dashboard_stats().await?;
    let value = serde_json::to_value(&stats).map_err(actix_web::error::ErrorInternalServerError)?;
    data.cache.put(&key, value.clone());

    Ok(HttpResponse::Ok().json(ApiResponse::success(value)))
}
