// 健康检查API处理器

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::state::AppState;

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

/// 健康检查
/// GET /health
pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    let database_ok = sqlx::query("SELECT 1")
        .execute(&data.db_pool)
        .await
        .is_ok();

    let response = HealthResponse {
        status: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if database_ok { "connected" } else { "disconnected" }.to_string(),
        timestamp: Utc::now(),
    };

    if database_ok {
        HttpResponse::Ok().json(response)
    } else {
        log::error!("Health check failed: database unreachable");
        HttpResponse::ServiceUnavailable().json(response)
    }
}
