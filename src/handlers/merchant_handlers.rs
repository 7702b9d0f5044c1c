// 商户管理API处理器
// 商户开通、查询、状态管理和密钥轮换

use actix_web::{web, HttpResponse, Result as ActixResult};
use uuid::Uuid;
use crate::models::{ApiResponse, CreateMerchantRequest, UpdateMerchantStatusRequest};
use crate::state::AppState;

/// 创建商户
/// POST /api/v1/merchants
///
/// 响应中的api_secret和webhook_secret仅在此处明文返回一次
pub async fn create_merchant(
    data: web::Data<AppState>,
    request: web::Json<CreateMerchantRequest>,
) -> ActixResult<HttpResponse> {
    let merchant = data
        .merchant_service()
        .create_merchant(request.into_inner())
        .await?;

    log::info!("Merchant created: {}", merchant.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(merchant)))
}

/// 获取商户列表
/// GET /api/v1/merchants
pub async fn list_merchants(data: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let merchants = data.merchant_service().list_merchants().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(merchants)))
}

/// 获取商户详情
/// GET /api/v1/merchants/{merchant_id}
pub async fn get_merchant(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let merchant = data.merchant_service().get_merchant(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(merchant.to_response(false))))
}

/// 更新商户活跃状态
/// PATCH /api/v1/merchants/{merchant_id}/status
pub async fn update_merchant_status(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateMerchantStatusRequest>,
) -> ActixResult<HttpResponse> {
    let merchant_id = path.into_inner();
    let merchant = data
        .merchant_service()
        .update_merchant_status(merchant_id, request.is_active)
        .await?;

    log::info!(
        "Merchant {} status updated: is_active={}",
        merchant_id,
        request.is_active
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(merchant)))
}

/// 重新生成商户密钥
/// POST /api/v1/merchants/{merchant_id}/regenerate-secret
///
/// 同时轮换api_secret和webhook_secret，旧密钥立即失效
pub async fn regenerate_secrets(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let merchant_id = path.into_inner();
    let merchant = data.merchant_service().regenerate_secrets(merchant_id).await?;

    log::info!("Merchant {} secrets regenerated", merchant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(merchant)))
}
