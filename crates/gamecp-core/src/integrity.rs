//! 子资源完整性（SRI）摘要。
//!
//! 格式：
//! - `sha384-<base64>`，base64 为标准字母表、带 padding
//! - 宿主加载 UI 包时据此校验内容未被篡改
//!
//! 作者：GameCP 扩展工具组
//! 创建时间：2026-10-16
//! 修改时间：2026-10-16

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha384};

/// SRI 摘要前缀。
pub const SRI_PREFIX: &str = "sha384-";

/// 计算内容的 SRI 摘要。
///
/// 参数：
/// - `content`：被摘要的原始字节
///
/// 返回值：
/// - `sha384-<base64>` 文本
pub fn sri_sha384(content: &[u8]) -> String {
    let digest = Sha384::digest(content);
    format!("{SRI_PREFIX}{}", STANDARD.encode(digest))
}

/// 校验内容是否与给定 SRI 摘要一致。
pub fn matches_sri(content: &[u8], expected: &str) -> bool {
    sri_sha384(content) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_of_empty_input() {
        assert_eq!(
            sri_sha384(b""),
            "sha384-OLBgp1GsljhM2TJ+sbHjaiH9txEUvgdDTAzHv2P24donTt6/529l+9Ua0vFImLlb"
        );
    }

    #[test]
    fn digest_is_deterministic_and_content_sensitive() {
        let a = sri_sha384(b"console.log(1)");
        assert_eq!(a, sri_sha384(b"console.log(1)"));
        assert_ne!(a, sri_sha384(b"console.log(2)"));
        assert!(a.starts_with(SRI_PREFIX));
        assert!(matches_sri(b"console.log(1)", &a));
    }
}
