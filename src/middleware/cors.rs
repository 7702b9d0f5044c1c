// CORS中间件配置
// 处理商户控制台等前端应用的跨域请求

use actix_cors::Cors;
use actix_web::http::header;

/// 创建CORS中间件
///
/// 开发环境允许本地源，生产部署应通过create_restricted_cors限制域名
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|origin, _req_head| {
            origin.as_bytes().starts_with(b"http://localhost")
                || origin.as_bytes().starts_with(b"https://localhost")
                || origin.as_bytes().starts_with(b"http://127.0.0.1")
                || origin.as_bytes().starts_with(b"https://127.0.0.1")
        })
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
            header::HeaderName::from_static("x-webhook-signature"),
        ])
        .max_age(3600)
}

/// 创建限制源的CORS配置
///
/// # Arguments
/// * `allowed_origins` - 允许的源列表
pub fn create_restricted_cors(allowed_origins: Vec<&str>) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
            header::HeaderName::from_static("x-webhook-signature"),
        ])
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
