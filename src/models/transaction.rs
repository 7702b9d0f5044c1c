// 账本交易数据模型
// 每次资金动作和对账事件都记录为一条只追加的交易

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 账本交易记录
///
/// 交易只追加，创建后不修改不删除。
/// 支付的退款余额从交易重新计算，不单独维护计数字段。
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Transaction {
    /// 交易唯一标识符
    pub id: Uuid,
    /// 对外交易号 (TXN-前缀)
    pub transaction_id: String,
    /// 关联的支付订单ID
    pub payment_id: Uuid,
    /// 交易类型
    pub transaction_type: TransactionType,
    /// 交易金额
    pub amount: Decimal,
    /// 货币代码
    pub currency: String,
    /// 交易状态
    pub status: TransactionStatus,
    /// 处理器侧引用号
    pub gateway_reference: Option<String>,
    /// 响应码
    pub response_code: Option<String>,
    /// 响应消息
    pub response_message: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 交易类型枚举
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// 预授权
    #[serde(rename = "AUTHORIZE")]
    Authorize,
    /// 请款
    #[serde(rename = "CAPTURE")]
    Capture,
    /// 扣款
    #[serde(rename = "CHARGE")]
    Charge,
    /// 退款
    #[serde(rename = "REFUND")]
    Refund,
    /// 撤销
    #[serde(rename = "VOID")]
    Void,
    /// Webhook对账审计记录
    #[serde(rename = "WEBHOOK")]
    Webhook,
}

crate::models::varchar_enum!(TransactionType {
    Authorize => "AUTHORIZE",
    Capture => "CAPTURE",
    Charge => "CHARGE",
    Refund => "REFUND",
    Void => "VOID",
    Webhook => "WEBHOOK",
});

/// 交易状态枚举
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

crate::models::varchar_enum!(TransactionStatus {
    Pending => "PENDING",
    Success => "SUCCESS",
    Failed => "FAILED",
    Cancelled => "CANCELLED",
});

impl Transaction {
    /// 是否计入已退款总额
    ///
    /// 只有SUCCESS状态的REFUND交易计入
    pub fn counts_as_refund(&self) -> bool {
        self.transaction_type == TransactionType::Refund
            && self.status == TransactionStatus::Success
    }

    /// 转换为API响应格式
    pub fn to_response(&self) -> TransactionResponse {
        TransactionResponse {
            transaction_id: self.transaction_id.clone(),
            transaction_type: self.transaction_type,
            amount: self.amount,
            currency: self.currency.trim_end().to_string(),
            status: self.status,
            gateway_reference: self.gateway_reference.clone(),
            response_code: self.response_code.clone(),
            response_message: self.response_message.clone(),
            created_at: self.created_at,
        }
    }
}

/// 交易查询响应
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub gateway_reference: Option<String>,
    pub response_code: Option<String>,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction(
        transaction_type: TransactionType,
        status: TransactionStatus,
    ) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            transaction_id: "TXN-TEST".to_string(),
            payment_id: Uuid::new_v4(),
            transaction_type,
            amount: Decimal::new(10000, 2),
            currency: "THB".to_string(),
            status,
            gateway_reference: None,
            response_code: None,
            response_message: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_successful_refunds_count() {
        use TransactionStatus::*;
        use TransactionType::*;

        assert!(sample_transaction(Refund, Success).counts_as_refund());
        assert!(!sample_transaction(Refund, Pending).counts_as_refund());
        assert!(!sample_transaction(Refund, Failed).counts_as_refund());
        assert!(!sample_transaction(Charge, Success).counts_as_refund());
        assert!(!sample_transaction(Webhook, Success).counts_as_refund());
    }

    #[test]
    fn test_response_renames_type_field() {
        let txn = sample_transaction(TransactionType::Webhook, TransactionStatus::Success);
        let json = serde_json::to_value(txn.to_response()).unwrap();
        assert_eq!(json["type"], "WEBHOOK");
        assert_eq!(json["status"], "SUCCESS");
    }
}
