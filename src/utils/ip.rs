//! 客户端 IP 提取工具
//!
//! 优先取 X-Forwarded-For（第一个值，即原始客户端 IP），
//! 其次 X-Real-IP，最后回退到 TCP 对端地址。

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(String::from)
                .filter(|s| !s.is_empty())
        })
}

/// 从 HttpRequest 提取客户端 IP
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_forwarded_ip_from_headers(req.headers())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(
            extract_client_ip(&req),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .insert_header(("x-real-ip", "198.51.100.4"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), Some("198.51.100.4".to_string()));
    }

    #[test]
    fn test_peer_addr_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:54321".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req), Some("192.0.2.10".to_string()));
    }

    #[test]
    fn test_no_source_yields_none() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_client_ip(&req), None);
    }
}
