pub mod ip;
pub mod password;

/// 生成 URL 安全的随机 token（用于 JWT 密钥兜底和密码重置 token）
pub fn generate_secure_token(byte_len: usize) -> String {
    use base64::Engine;
    use rand::RngExt;

    let mut bytes = vec![0u8; byte_len];
    rand::rng().fill(&mut bytes[..]);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secure_token_length_and_charset() {
        let token = generate_secure_token(32);
        // base64url 无填充：32 字节 -> 43 字符
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generate_secure_token_unique() {
        assert_ne!(generate_secure_token(32), generate_secure_token(32));
    }
}
