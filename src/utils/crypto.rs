// 加密工具函数
// 提供标识符/密钥生成、HMAC-SHA256签名验证等安全功能

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use rand::RngCore;
use crate::error::{GatewayError, GatewayResult};

type HmacSha256 = Hmac<Sha256>;

/// 签名头前缀，约定格式: sha256=<64位十六进制>
const SIGNATURE_HEADER_PREFIX: &str = "sha256=";

/// 随机字节来源
///
/// 以注入能力的形式提供，生产环境使用操作系统CSPRNG，
/// 测试可替换为确定性来源。
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, buf: &mut [u8]);
}

/// 操作系统安全随机源
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, buf: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(buf);
    }
}

/// URL安全字符集 (64字符，单字节取模无偏差)
const URL_SAFE_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// 引用标识符字符集 (大写字母+数字，便于人工核对)
const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn random_string(random: &dyn RandomSource, charset: &[u8], length: usize) -> String {
    let mut bytes = vec![0u8; length];
    random.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| charset[(*b as usize) % charset.len()] as char)
        .collect()
}

/// 生成API Key
/// 格式: pk_live_ + 24位URL安全随机字符
pub fn generate_api_key(random: &dyn RandomSource) -> String {
    format!("pk_live_{}", random_string(random, URL_SAFE_CHARSET, 24))
}

/// 生成API Secret
/// 格式: sk_live_ + 56位URL安全随机字符
pub fn generate_api_secret(random: &dyn RandomSource) -> String {
    format!("sk_live_{}", random_string(random, URL_SAFE_CHARSET, 56))
}

/// 生成Webhook Secret
/// 格式: whsec_ + 34位URL安全随机字符
pub fn generate_webhook_secret(random: &dyn RandomSource) -> String {
    format!("whsec_{}", random_string(random, URL_SAFE_CHARSET, 34))
}

/// 生成支付引用标识符
/// 格式: PAY-xxxxxxxxxxxxxxxxxx (18位)，创建后不可变更
pub fn generate_reference_id(random: &dyn RandomSource) -> String {
    format!("PAY-{}", random_string(random, REFERENCE_CHARSET, 18))
}

/// 生成账本交易标识符
/// 格式: TXN-xxxxxxxxxxxxxxxxxx (18位)
pub fn generate_transaction_id(random: &dyn RandomSource) -> String {
    format!("TXN-{}", random_string(random, REFERENCE_CHARSET, 18))
}

/// 计算HMAC-SHA256签名
///
/// # Arguments
/// * `payload` - 原始请求体字节 (不做重新序列化)
/// * `secret` - 签名密钥
///
/// # Returns
/// * 小写十六进制签名字符串
pub fn generate_signature(payload: &[u8], secret: &str) -> String {
    // HMAC对任意长度密钥都有效，new_from_slice不会失败
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// 验证HMAC-SHA256签名
///
/// 使用常量时间比较，防止时序攻击。
pub fn verify_signature(payload: &[u8], received_signature: &str, secret: &str) -> bool {
    let expected = generate_signature(payload, secret);
    constant_time_eq(expected.as_bytes(), received_signature.to_lowercase().as_bytes())
}

/// 验证签名，失败时返回InvalidSignature错误
pub fn validate_signature(payload: &[u8], received_signature: &str, secret: &str) -> GatewayResult<()> {
    if !verify_signature(payload, received_signature, secret) {
        log::warn!("Invalid webhook signature received");
        return Err(GatewayError::InvalidSignature(
            "Invalid webhook signature".to_string(),
        ));
    }
    Ok(())
}

/// 常量时间字节比较
///
/// 长度相同时逐位比较全部位置，不提前退出。
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.iter().zip(b.iter()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

/// 生成签名头的完整取值
pub fn create_signature_header(payload: &[u8], secret: &str) -> String {
    format!("{}{}", SIGNATURE_HEADER_PREFIX, generate_signature(payload, secret))
}

/// 从签名头中解析签名
///
/// 只接受 sha256= 前缀加64位十六进制字符的形式，
/// 格式错误的头被拒绝而不是当作未签名处理。
pub fn parse_signature_header(header: &str) -> GatewayResult<&str> {
    let signature = header.strip_prefix(SIGNATURE_HEADER_PREFIX).ok_or_else(|| {
        GatewayError::InvalidSignature("Malformed signature header".to_string())
    })?;

    if signature.len() != 64 || !signature.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GatewayError::InvalidSignature(
            "Malformed signature header".to_string(),
        ));
    }

    Ok(signature)
}

/// 计算事件载荷的去重哈希 (SHA-256十六进制)
///
/// 同一外部事件重复投递时哈希一致，用于幂等短路。
pub fn payload_hash(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
pub mod test_support {
    use super::RandomSource;
    use std::sync::atomic::{AtomicU8, Ordering};

    /// 确定性随机源，测试用
    pub struct SequentialRandom {
        counter: AtomicU8,
    }

    impl SequentialRandom {
        pub fn new() -> Self {
            Self { counter: AtomicU8::new(0) }
        }
    }

    impl RandomSource for SequentialRandom {
        fn fill_bytes(&self, buf: &mut [u8]) {
            for byte in buf.iter_mut() {
                *byte = self.counter.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::SequentialRandom;
    use super::*;

    #[test]
    fn test_key_formats() {
        let random = OsRandom;
        let api_key = generate_api_key(&random);
        let api_secret = generate_api_secret(&random);
        let webhook_secret = generate_webhook_secret(&random);

        assert!(api_key.starts_with("pk_live_"));
        assert_eq!(api_key.len(), "pk_live_".len() + 24);
        assert!(api_secret.starts_with("sk_live_"));
        assert_eq!(api_secret.len(), "sk_live_".len() + 56);
        assert!(webhook_secret.starts_with("whsec_"));
        assert_eq!(webhook_secret.len(), "whsec_".len() + 34);
    }

    #[test]
    fn test_reference_id_format() {
        let random = OsRandom;
        let reference_id = generate_reference_id(&random);
        assert!(reference_id.starts_with("PAY-"));
        assert_eq!(reference_id.len(), 22);
        assert!(reference_id[4..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

        let transaction_id = generate_transaction_id(&random);
        assert!(transaction_id.starts_with("TXN-"));
        assert_eq!(transaction_id.len(), 22);
    }

    #[test]
    fn test_deterministic_source_is_reproducible() {
        let a = generate_api_key(&SequentialRandom::new());
        let b = generate_api_key(&SequentialRandom::new());
        assert_eq!(a, b);

        let c = generate_api_key(&OsRandom);
        let d = generate_api_key(&OsRandom);
        assert_ne!(c, d);
    }

    #[test]
    fn test_signature_golden_vector() {
        // 跨语言黄金测试向量: HMAC-SHA256("s3cret", "{\"a\":1}")
        let signature = generate_signature(br#"{"a":1}"#, "s3cret");
        assert_eq!(
            signature,
            "5910e62016ef5034272c926c27071992a465c2335cecf41851bda071577f4f6d"
        );
    }

    #[test]
    fn test_verify_signature() {
        let payload = br#"{"event":"payment.completed","referenceId":"PAY-1"}"#;
        let secret = "whsec_test";

        let signature = generate_signature(payload, secret);
        assert!(verify_signature(payload, &signature, secret));
        assert!(verify_signature(payload, &signature.to_uppercase(), secret));
        assert!(!verify_signature(payload, &signature, "wrong_secret"));
        assert!(!verify_signature(b"tampered", &signature, secret));
    }

    #[test]
    fn test_signature_header_round_trip() {
        let payload = b"test payload";
        let secret = "s3cret";

        let header = create_signature_header(payload, secret);
        assert!(header.starts_with("sha256="));

        let parsed = parse_signature_header(&header).unwrap();
        assert!(verify_signature(payload, parsed, secret));
    }

    #[test]
    fn test_malformed_headers_rejected() {
        assert!(parse_signature_header("").is_err());
        assert!(parse_signature_header("sha256=").is_err());
        assert!(parse_signature_header("sha256=abc").is_err());
        assert!(parse_signature_header("md5=0123456789abcdef").is_err());
        // 正确长度但含非十六进制字符
        let bad = format!("sha256={}", "g".repeat(64));
        assert!(parse_signature_header(&bad).is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hello world"));
    }

    #[test]
    fn test_payload_hash_is_deterministic() {
        let a = payload_hash(b"{\"event\":\"payment.completed\"}");
        let b = payload_hash(b"{\"event\":\"payment.completed\"}");
        let c = payload_hash(b"{\"event\":\"payment.failed\"}");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
