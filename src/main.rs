mod cache;
mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod utils;

use std::io::{self, Write};
use std::time::Duration;
use actix_web::{web, App, HttpServer};
use chrono::Local;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use crate::config::Config;
use crate::middleware::{create_cors, create_restricted_cors, RequestLogging};
use crate::routes::{api_v1_routes, public_routes};
use crate::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    let mut log_builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    log_builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S %:z"),
                record.level(),
                record.args()
            )
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        })
        .init();

    let config = Config::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;
    info!("Database migrations applied");

    let bind_address = config.bind_address();
    let workers = config.server.workers;
    let app_state = web::Data::new(AppState::new(db_pool, config));

    spawn_expiry_sweep(app_state.clone());

    info!("Starting payment gateway on {}", bind_address);

    let mut server = HttpServer::new(move || {
        let cors = if app_state.config.server.cors_allowed_origins.is_empty() {
            create_cors()
        } else {
            create_restricted_cors(
                app_state
                    .config
                    .server
                    .cors_allowed_origins
                    .iter()
                    .map(String::as_str)
                    .collect(),
            )
        };

        App::new()
            .app_data(app_state.clone())
            .wrap(cors)
            .wrap(RequestLogging)
            .service(api_v1_routes())
            .service(public_routes())
    })
    .bind(&bind_address)?;

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server.run().await?;
    Ok(())
}

/// 后台过期订单清理任务
///
/// 周期性地把超过expires_at的PENDING订单批量转为EXPIRED，
/// 并清除受影响的缓存键
fn spawn_expiry_sweep(state: web::Data<AppState>) {
    let interval_secs = state.config.payment.expiry_sweep_interval_secs;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // interval的首个tick立即完成
        interval.tick().await;
        loop {
            interval.tick().await;
            match state.payment_service().expire_overdue_payments().await {
                Ok(mutated) => {
                    if mutated.value > 0 {
                        state.cache.invalidate(&mutated.invalidate);
                        info!("Expired {} overdue payments", mutated.value);
                    }
                }
                Err(e) => error!("Payment expiry sweep failed: {}", e),
            }
        }
    });
}
