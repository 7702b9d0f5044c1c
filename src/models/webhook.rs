// Webhook数据模型
// 入站对账事件、幂等记录、出站通知的数据结构

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::PaymentStatus;

/// 入站Webhook事件
///
/// 处理器侧回调的统一格式，按event_type映射到目标支付状态
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookEvent {
    /// 事件类型
    pub event_type: String,
    /// 支付引用标识符
    pub reference_id: String,
    /// 处理器侧报告的状态 (仅记录，转换以event_type为准)
    pub status: Option<String>,
    /// 处理器侧引用号 (可选)
    pub gateway_reference: Option<String>,
    /// 响应码 (可选)
    pub response_code: Option<String>,
    /// 响应消息 (可选)
    pub response_message: Option<String>,
    /// 失败原因 (可选，failed事件使用)
    pub failure_reason: Option<String>,
    /// 事件时间戳 (可选)
    pub timestamp: Option<DateTime<Utc>>,
    /// 处理器附加数据 (原样记录)
    pub additional_data: Option<serde_json::Value>,
}

impl WebhookEvent {
    /// 按事件类型映射到目标支付状态
    ///
    /// 未知事件类型返回None，对账时作为no-op处理但仍记录审计交易
    pub fn target_status(&self) -> Option<PaymentStatus> {
        match self.event_type.as_str() {
            "payment.completed" => Some(PaymentStatus::Completed),
            "payment.failed" => Some(PaymentStatus::Failed),
            "payment.cancelled" => Some(PaymentStatus::Cancelled),
            "payment.expired" => Some(PaymentStatus::Expired),
            _ => None,
        }
    }
}

/// 对账处理结果
#[derive(Debug, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// 状态转换已应用
    Applied(PaymentStatus),
    /// 事件有效但未产生状态变更 (未知事件类型或目标状态等于当前状态)
    NoOp,
    /// 重复投递，此前已处理
    Duplicate,
}

/// Webhook确认响应
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    pub reference_id: String,
    pub result: String,
}

impl WebhookAck {
    pub fn from_outcome(reference_id: &str, outcome: &WebhookOutcome) -> Self {
        let result = match outcome {
            WebhookOutcome::Applied(status) => format!("applied:{}", status.as_str()),
            WebhookOutcome::NoOp => "no-op".to_string(),
            WebhookOutcome::Duplicate => "duplicate".to_string(),
        };
        Self {
            received: true,
            reference_id: reference_id.to_string(),
            result,
        }
    }
}

/// 出站Webhook通知载荷
///
/// 发送给商户回调地址的支付状态通知，用webhook_secret签名
#[derive(Debug, Serialize)]
pub struct WebhookNotification {
    pub event_type: String,
    pub reference_id: String,
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub timestamp: DateTime<Utc>,
}

/// 签名自检请求
#[derive(Debug, Deserialize)]
pub struct SignatureTestRequest {
    /// 待签名的载荷
    pub payload: serde_json::Value,
    /// 签名密钥
    pub secret: String,
}

/// 签名自检响应
#[derive(Debug, Serialize)]
pub struct SignatureTestResponse {
    pub signature: String,
    pub header_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: &str) -> WebhookEvent {
        WebhookEvent {
            event_type: event_type.to_string(),
            reference_id: "PAY-TEST".to_string(),
            status: None,
            gateway_reference: None,
            response_code: None,
            response_message: None,
            failure_reason: None,
            timestamp: None,
            additional_data: None,
        }
    }

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(
            event("payment.completed").target_status(),
            Some(PaymentStatus::Completed)
        );
        assert_eq!(
            event("payment.failed").target_status(),
            Some(PaymentStatus::Failed)
        );
        assert_eq!(
            event("payment.cancelled").target_status(),
            Some(PaymentStatus::Cancelled)
        );
        assert_eq!(
            event("payment.expired").target_status(),
            Some(PaymentStatus::Expired)
        );
    }

    #[test]
    fn test_unknown_event_maps_to_none() {
        assert_eq!(event("payment.refund.created").target_status(), None);
        assert_eq!(event("charge.create").target_status(), None);
        assert_eq!(event("").target_status(), None);
    }

    #[test]
    fn test_ack_wording() {
        let ack = WebhookAck::from_outcome(
            "PAY-1",
            &WebhookOutcome::Applied(PaymentStatus::Completed),
        );
        assert!(ack.received);
        assert_eq!(ack.result, "applied:COMPLETED");

        let ack = WebhookAck::from_outcome("PAY-1", &WebhookOutcome::Duplicate);
        assert_eq!(ack.result, "duplicate");

        let ack = WebhookAck::from_outcome("PAY-1", &WebhookOutcome::NoOp);
        assert_eq!(ack.result, "no-op");
    }
}
