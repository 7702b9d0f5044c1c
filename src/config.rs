// 应用配置管理
// 从环境变量加载服务器、数据库、Webhook配置

use std::env;
use anyhow::{bail, Context, Result};

/// 应用配置
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub payment: PaymentConfig,
    pub webhook: WebhookConfig,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// 允许跨域的源列表 (为空时仅允许本地源)
    pub cors_allowed_origins: Vec<String>,
}

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

/// 支付配置
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// 过期订单后台清理间隔 (秒)
    pub expiry_sweep_interval_secs: u64,
}

/// Webhook配置
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// 入站Webhook签名验证密钥
    pub secret: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_parse("SERVER_PORT", 8080)?,
                workers: match env::var("SERVER_WORKERS") {
                    Ok(value) => Some(
                        value
                            .parse()
                            .context("SERVER_WORKERS must be a positive integer")?,
                    ),
                    Err(_) => None,
                },
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|value| {
                        value
                            .split(',')
                            .map(|origin| origin.trim().to_string())
                            .filter(|origin| !origin.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: env_parse("DATABASE_MIN_CONNECTIONS", 1)?,
                connect_timeout_secs: env_parse("DATABASE_CONNECT_TIMEOUT", 10)?,
            },
            payment: PaymentConfig {
                expiry_sweep_interval_secs: env_parse("PAYMENT_EXPIRY_SWEEP_INTERVAL", 60)?,
            },
            webhook: WebhookConfig {
                secret: env::var("WEBHOOK_SECRET").context("WEBHOOK_SECRET must be set")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<()> {
        if !self.database.url.starts_with("postgres://")
            && !self.database.url.starts_with("postgresql://")
        {
            bail!("DATABASE_URL must be a postgres connection string");
        }

        if self.database.max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        if self.database.min_connections > self.database.max_connections {
            bail!("DATABASE_MIN_CONNECTIONS cannot exceed DATABASE_MAX_CONNECTIONS");
        }

        if self.webhook.secret.len() < 16 {
            bail!("WEBHOOK_SECRET must be at least 16 characters");
        }

        if self.payment.expiry_sweep_interval_secs == 0 {
            bail!("PAYMENT_EXPIRY_SWEEP_INTERVAL must be at least 1 second");
        }

        Ok(())
    }

    /// 服务器绑定地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// 读取环境变量并解析，缺失时使用默认值
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
                cors_allowed_origins: Vec::new(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/paygate".to_string(),
                max_connections: 10,
                min_connections: 1,
                connect_timeout_secs: 10,
            },
            payment: PaymentConfig {
                expiry_sweep_interval_secs: 60,
            },
            webhook: WebhookConfig {
                secret: "whsec_test_0123456789".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
        assert_eq!(base_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_rejects_short_webhook_secret() {
        let mut config = base_config();
        config.webhook.secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_postgres_url() {
        let mut config = base_config();
        config.database.url = "mysql://localhost/paygate".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_pool_bounds() {
        let mut config = base_config();
        config.database.min_connections = 20;
        assert!(config.validate().is_err());
    }
}
