// API路由配置
// 定义所有API端点的路由规则

use actix_web::{web, Scope};
use crate::handlers::{
    apply_charge_result, cancel_payment, complete_payment, create_merchant, create_payment,
    dashboard_stats, get_merchant, get_payment, health_check, list_merchants,
    list_payment_transactions, list_payments, receive_payment_webhook, refund_payment,
    regenerate_secrets, test_signature, test_webhook, update_merchant_status,
};

/// API v1 路由
pub fn api_v1_routes() -> Scope {
    web::scope("/api/v1")
        .service(merchant_routes())
        .service(payment_routes())
        .service(webhook_routes())
        .route("/dashboard/stats", web::get().to(dashboard_stats))
}

/// 商户管理路由
fn merchant_routes() -> Scope {
    web::scope("/merchants")
        .route("", web::post().to(create_merchant))
        .route("", web::get().to(list_merchants))
        .route("/{merchant_id}", web::get().to(get_merchant))
        .route("/{merchant_id}/status", web::patch().to(update_merchant_status))
        .route("/{merchant_id}/regenerate-secret", web::post().to(regenerate_secrets))
}

/// 支付订单路由
fn payment_routes() -> Scope {
    web::scope("/payments")
        .route("", web::post().to(create_payment))
        .route("", web::get().to(list_payments))
        .route("/{reference_id}", web::get().to(get_payment))
        .route("/{reference_id}/transactions", web::get().to(list_payment_transactions))
        .route("/{reference_id}/complete", web::post().to(complete_payment))
        .route("/{reference_id}/cancel", web::post().to(cancel_payment))
        .route("/{reference_id}/refund", web::post().to(refund_payment))
        .route("/{reference_id}/charge-result", web::post().to(apply_charge_result))
}

/// Webhook路由
fn webhook_routes() -> Scope {
    web::scope("/webhooks")
        .route("/payment", web::post().to(receive_payment_webhook))
        .route("/test", web::post().to(test_webhook))
        .route("/test-signature", web::post().to(test_signature))
}

/// 公开路由 (无认证)
pub fn public_routes() -> Scope {
    web::scope("").route("/health", web::get().to(health_check))
}
