// 业务服务模块

pub mod merchant_service;
pub mod payment_service;
pub mod webhook_service;

pub use merchant_service::MerchantService;
pub use payment_service::PaymentService;
pub use webhook_service::WebhookService;
