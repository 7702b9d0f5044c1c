// 支付订单数据模型
// 定义支付相关的数据结构和状态机规则

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 支付订单模型
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    /// 支付订单唯一标识符
    pub id: Uuid,
    /// 对外引用标识符 (PAY-前缀，创建后不可变更)
    pub reference_id: String,
    /// 商户ID
    pub merchant_id: Uuid,
    /// 商户订单号 (同一商户下唯一)
    pub order_id: String,
    /// 支付金额 (创建后不可变更)
    pub amount: Decimal,
    /// 货币代码 (ISO 4217)
    pub currency: String,
    /// 支付状态
    pub status: PaymentStatus,
    /// 支付方式
    pub payment_method: Option<PaymentMethod>,
    /// 商品描述
    pub description: Option<String>,
    /// 客户姓名
    pub customer_name: Option<String>,
    /// 客户邮箱
    pub customer_email: Option<String>,
    /// 客户电话
    pub customer_phone: Option<String>,
    /// 失败/取消原因
    pub failure_reason: Option<String>,
    /// 支付成功时间 (首次进入COMPLETED时设置，仅设置一次)
    pub paid_at: Option<DateTime<Utc>>,
    /// 订单过期时间 (创建时固定)
    pub expires_at: DateTime<Utc>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 支付状态枚举
///
/// 状态机:
/// PENDING → PROCESSING → COMPLETED → {REFUNDED, PARTIALLY_REFUNDED}
/// PENDING/PROCESSING → {FAILED, CANCELLED, EXPIRED} (终态侧支)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// 待支付
    #[serde(rename = "PENDING")]
    Pending,
    /// 处理中 (处理器已受理，等待结果)
    #[serde(rename = "PROCESSING")]
    Processing,
    /// 支付成功
    #[serde(rename = "COMPLETED")]
    Completed,
    /// 支付失败
    #[serde(rename = "FAILED")]
    Failed,
    /// 已取消
    #[serde(rename = "CANCELLED")]
    Cancelled,
    /// 已全额退款
    #[serde(rename = "REFUNDED")]
    Refunded,
    /// 已部分退款
    #[serde(rename = "PARTIALLY_REFUNDED")]
    PartiallyRefunded,
    /// 已过期
    #[serde(rename = "EXPIRED")]
    Expired,
}

crate::models::varchar_enum!(PaymentStatus {
    Pending => "PENDING",
    Processing => "PROCESSING",
    Completed => "COMPLETED",
    Failed => "FAILED",
    Cancelled => "CANCELLED",
    Refunded => "REFUNDED",
    PartiallyRefunded => "PARTIALLY_REFUNDED",
    Expired => "EXPIRED",
});

impl PaymentStatus {
    /// 是否为终态
    ///
    /// COMPLETED不是终态 (仍可退款)；PARTIALLY_REFUNDED也不是 (可继续退款)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Failed
                | PaymentStatus::Cancelled
                | PaymentStatus::Expired
                | PaymentStatus::Refunded
        )
    }

    /// 状态转换表
    ///
    /// 所有状态写入必须通过此表校验，Webhook与直接API调用共用同一路径。
    pub fn can_transition_to(&self, target: PaymentStatus) -> bool {
        use PaymentStatus::*;
        match (self, target) {
            (Pending, Processing) => true,
            (Pending, Completed) | (Processing, Completed) => true,
            (Pending, Failed) | (Processing, Failed) => true,
            (Pending, Cancelled) | (Processing, Cancelled) => true,
            (Pending, Expired) | (Processing, Expired) => true,
            (Completed, Refunded) | (Completed, PartiallyRefunded) => true,
            (PartiallyRefunded, Refunded) | (PartiallyRefunded, PartiallyRefunded) => true,
            _ => false,
        }
    }

    /// 是否允许complete操作
    pub fn can_complete(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Processing)
    }

    /// 是否允许退款
    pub fn can_refund(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed | PaymentStatus::PartiallyRefunded
        )
    }
}

/// 支付方式枚举
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "CREDIT_CARD")]
    CreditCard,
    #[serde(rename = "DEBIT_CARD")]
    DebitCard,
    #[serde(rename = "BANK_TRANSFER")]
    BankTransfer,
    #[serde(rename = "PROMPTPAY")]
    PromptPay,
    #[serde(rename = "MOBILE_BANKING")]
    MobileBanking,
    #[serde(rename = "E_WALLET")]
    EWallet,
}

crate::models::varchar_enum!(PaymentMethod {
    CreditCard => "CREDIT_CARD",
    DebitCard => "DEBIT_CARD",
    BankTransfer => "BANK_TRANSFER",
    PromptPay => "PROMPTPAY",
    MobileBanking => "MOBILE_BANKING",
    EWallet => "E_WALLET",
});

impl Payment {
    /// 检查支付订单是否已过期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// 转换为API响应格式
    pub fn to_response(&self) -> PaymentResponse {
        PaymentResponse {
            reference_id: self.reference_id.clone(),
            order_id: self.order_id.clone(),
            amount: self.amount,
            currency: self.currency.trim_end().to_string(),
            status: self.status,
            payment_method: self.payment_method,
            description: self.description.clone(),
            customer: CustomerInfo {
                name: self.customer_name.clone(),
                email: self.customer_email.clone(),
                phone: self.customer_phone.clone(),
            },
            failure_reason: self.failure_reason.clone(),
            paid_at: self.paid_at,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            payment_url: format!("/pay/{}", self.reference_id),
        }
    }

    /// 转换为列表摘要格式
    pub fn to_summary(&self) -> PaymentSummary {
        PaymentSummary {
            reference_id: self.reference_id.clone(),
            order_id: self.order_id.clone(),
            amount: self.amount,
            currency: self.currency.trim_end().to_string(),
            status: self.status,
            payment_method: self.payment_method,
            customer_name: self.customer_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// 创建支付订单请求
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// 商户订单号
    pub order_id: String,
    /// 支付金额
    pub amount: Decimal,
    /// 货币代码 (可选，默认THB)
    pub currency: Option<String>,
    /// 支付方式 (可选)
    pub payment_method: Option<PaymentMethod>,
    /// 商品描述 (可选)
    pub description: Option<String>,
    /// 客户姓名 (可选)
    pub customer_name: Option<String>,
    /// 客户邮箱 (可选)
    pub customer_email: Option<String>,
    /// 客户电话 (可选)
    pub customer_phone: Option<String>,
    /// 过期时间 (分钟，可选，默认30分钟)
    pub expires_in_minutes: Option<i64>,
}

/// 取消支付请求
#[derive(Debug, Deserialize)]
pub struct CancelPaymentRequest {
    /// 取消原因
    pub reason: String,
}

/// 退款请求
#[derive(Debug, Deserialize)]
pub struct RefundPaymentRequest {
    /// 退款金额 (缺省表示退还全部剩余余额)
    pub amount: Option<Decimal>,
    /// 退款原因
    pub reason: String,
}

/// 归一化的处理器扣款结果
///
/// 处理器调用在进入本地锁定窗口之前已完全解析，
/// 超时一律归一化为Failed，不做静默重试
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorOutcome {
    /// 扣款成功
    Succeeded,
    /// 处理器已受理，结果未定
    Pending,
    /// 扣款失败 (含超时)
    Failed,
}

/// 扣款结果上报请求
#[derive(Debug, Deserialize)]
pub struct ChargeResultRequest {
    /// 归一化结果
    pub outcome: ProcessorOutcome,
    /// 处理器侧引用号
    pub gateway_reference: Option<String>,
    /// 响应码
    pub response_code: Option<String>,
    /// 响应消息
    pub response_message: Option<String>,
    /// 失败原因 (outcome为FAILED时记录)
    pub failure_reason: Option<String>,
}

/// 客户信息
#[derive(Debug, Serialize, Clone)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// 支付订单查询响应
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub reference_id: String,
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub description: Option<String>,
    pub customer: CustomerInfo,
    pub failure_reason: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 收银页面地址
    pub payment_url: String,
}

/// 支付订单列表摘要
#[derive(Debug, Serialize)]
pub struct PaymentSummary {
    pub reference_id: String,
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: Option<PaymentMethod>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 支付订单列表查询参数
#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    /// 页码 (从1开始)
    pub page: Option<u32>,
    /// 每页数量 (默认20，最大100)
    pub limit: Option<u32>,
    /// 状态过滤
    pub status: Option<PaymentStatus>,
}

impl PaymentListQuery {
    /// 获取分页偏移量
    pub fn offset(&self) -> u32 {
        let page = self.page.unwrap_or(1).max(1);
        (page - 1) * self.limit()
    }

    /// 获取每页限制数量
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// 支付订单列表响应
#[derive(Debug, Serialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentSummary>,
    pub pagination: PaginationInfo,
}

/// 分页信息
#[derive(Debug, Serialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl PaginationInfo {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Dashboard聚合统计
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    /// 支付订单总数
    pub total_payments: i64,
    /// 待支付数量
    pub pending_payments: i64,
    /// 成功支付数量
    pub completed_payments: i64,
    /// 失败支付数量
    pub failed_payments: i64,
    /// 成功支付总金额
    pub total_amount: Decimal,
    /// 今日成功支付金额
    pub today_amount: Decimal,
    /// 今日支付数量
    pub today_payments: i64,
}
