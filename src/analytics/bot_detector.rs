//! UserAgent 爬虫识别
//!
//! 纯子串匹配，不访问网络也不持有状态。模式表是进程级常量，
//! 启动后不会变更。

/// 命中任意一个即判定为爬虫（小写子串匹配）
const BOT_PATTERNS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "slurp",
    "baiduspider",
    "yandexbot",
    "facebookexternalhit",
    "linkedinbot",
    "twitterbot",
    "slackbot",
    "telegrambot",
    "whatsapp",
    "ahrefsbot",
    "semrushbot",
    "pingdom",
    "googlebot",
    "bingbot",
    "yandex",
    "duckduckbot",
    "ia_archiver",
    "applebot",
    "headlesschrome",
    "lighthouse",
    "pagespeed",
    "ptst",
    "uptimerobot",
    "bitlybot",
    "discordbot",
    "curl",
    "wget",
    "python-requests",
    "axios",
    "postman",
    "insomnia",
    "screaming frog",
    "sitebulb",
    "netcraft",
    "check_http",
    "monitoring",
];

/// 模式 -> 家族名映射，靠前的更具体，先命中先返回
const BOT_TYPE_MAP: &[(&str, &str)] = &[
    ("googlebot", "Googlebot"),
    ("bingbot", "Bingbot"),
    ("yandexbot", "Yandexbot"),
    ("baiduspider", "Baiduspider"),
    ("facebookexternalhit", "Facebook"),
    ("linkedinbot", "LinkedIn"),
    ("twitterbot", "Twitter"),
    ("slackbot", "Slack"),
    ("telegrambot", "Telegram"),
    ("whatsapp", "WhatsApp"),
    ("ahrefsbot", "Ahrefs"),
    ("semrushbot", "SEMrush"),
    ("applebot", "Applebot"),
    ("duckduckbot", "DuckDuckBot"),
    ("ia_archiver", "Internet Archive"),
    ("headlesschrome", "Headless Chrome"),
    ("lighthouse", "Lighthouse"),
    ("pagespeed", "PageSpeed"),
    ("uptimerobot", "UptimeRobot"),
    ("bitlybot", "Bitly"),
    ("discordbot", "Discord"),
    ("curl", "Curl"),
    ("wget", "Wget"),
    ("python-requests", "Python Requests"),
    ("axios", "Axios"),
    ("postman", "Postman"),
    ("insomnia", "Insomnia"),
];

/// 判定 UserAgent 是否来自已知的自动化客户端
pub fn is_bot(user_agent: Option<&str>) -> bool {
    let Some(ua) = user_agent else {
        return false;
    };
    if ua.is_empty() {
        return false;
    }

    let ua_lower = ua.to_lowercase();
    BOT_PATTERNS.iter().any(|pattern| ua_lower.contains(pattern))
}

/// 识别爬虫家族名；非爬虫返回 None
pub fn identify_bot_type(user_agent: Option<&str>) -> Option<&'static str> {
    let ua = user_agent?;
    if !is_bot(Some(ua)) {
        return None;
    }

    let ua_lower = ua.to_lowercase();

    for (pattern, bot_type) in BOT_TYPE_MAP {
        if ua_lower.contains(pattern) {
            return Some(bot_type);
        }
    }

    // 通用兜底
    if ua_lower.contains("spider") {
        return Some("Spider");
    }
    if ua_lower.contains("crawler") {
        return Some("Crawler");
    }
    if ua_lower.contains("bot") {
        return Some("Bot");
    }

    Some("Unknown Bot")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_googlebot_detected_any_case() {
        for ua in [
            "Googlebot/2.1 (+http://www.google.com/bot.html)",
            "Mozilla/5.0 (compatible; GOOGLEBOT/2.1)",
            "mozilla/5.0 (compatible; googlebot/2.1)",
        ] {
            assert!(is_bot(Some(ua)), "should flag {}", ua);
            assert_eq!(identify_bot_type(Some(ua)), Some("Googlebot"));
        }
    }

    #[test]
    fn test_plain_browser_not_flagged() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
        assert!(!is_bot(Some(ua)));
        assert_eq!(identify_bot_type(Some(ua)), None);
    }

    #[test]
    fn test_empty_and_none_are_not_bots() {
        assert!(!is_bot(None));
        assert!(!is_bot(Some("")));
        assert_eq!(identify_bot_type(None), None);
        assert_eq!(identify_bot_type(Some("")), None);
    }

    #[test]
    fn test_http_clients_flagged() {
        assert_eq!(identify_bot_type(Some("curl/8.4.0")), Some("Curl"));
        assert_eq!(identify_bot_type(Some("Wget/1.21")), Some("Wget"));
        assert_eq!(
            identify_bot_type(Some("python-requests/2.31.0")),
            Some("Python Requests")
        );
        assert_eq!(identify_bot_type(Some("axios/1.6.2")), Some("Axios"));
        assert_eq!(
            identify_bot_type(Some("PostmanRuntime/7.36.0")),
            Some("Postman")
        );
    }

    #[test]
    fn test_generic_fallbacks() {
        assert_eq!(identify_bot_type(Some("SomeSpider/1.0")), Some("Spider"));
        assert_eq!(
            identify_bot_type(Some("ContentCrawler/2.0")),
            Some("Crawler")
        );
        assert_eq!(identify_bot_type(Some("randombot/0.1")), Some("Bot"));
        // 命中 is_bot 模式但不在家族表里，也不含通用词
        assert_eq!(identify_bot_type(Some("Pingdom.com_check")), Some("Unknown Bot"));
    }

    #[test]
    fn test_social_preview_bots() {
        assert_eq!(
            identify_bot_type(Some("facebookexternalhit/1.1")),
            Some("Facebook")
        );
        assert_eq!(
            identify_bot_type(Some("Mozilla/5.0 (compatible; Discordbot/2.0)")),
            Some("Discord")
        );
        assert_eq!(identify_bot_type(Some("WhatsApp/2.23.20")), Some("WhatsApp"));
    }

    #[test]
    fn test_headless_and_perf_tools() {
        assert!(is_bot(Some(
            "Mozilla/5.0 (X11; Linux x86_64) HeadlessChrome/119.0"
        )));
        assert_eq!(
            identify_bot_type(Some("Chrome-Lighthouse/11.0")),
            Some("Lighthouse")
        );
    }
}
