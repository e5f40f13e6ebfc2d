//! Crawler classification from the User-Agent header.
//!
//! A request is only worth mutating when the client cannot run the SPA's
//! JavaScript. Outside production the classifier gates the whole pipeline so
//! live-reload tooling sees untouched HTML; in production injection always
//! runs and the classifier is informational.

/// Case-insensitive substrings that identify automated clients.
///
/// Covers search engines, social link-preview fetchers, and AI content
/// fetchers. The bare substring `bot` is absent (it matches handset
/// User-Agents such as "Cubot"), so new crawlers must be listed explicitly
/// or carry one of the generic `crawler`/`spider` tokens.
pub const BOT_PATTERNS: &[&str] = &[
    // Search engines
    "googlebot",
    "google-inspectiontool",
    "adsbot-google",
    "mediapartners-google",
    "bingbot",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "sogou",
    "exabot",
    "applebot",
    "petalbot",
    "seznambot",
    // Social preview fetchers
    "facebookexternalhit",
    "facebot",
    "twitterbot",
    "linkedinbot",
    "pinterestbot",
    "slackbot",
    "discordbot",
    "telegrambot",
    "whatsapp",
    "skypeuripreview",
    // AI fetchers
    "gptbot",
    "chatgpt-user",
    "oai-searchbot",
    "claudebot",
    "claude-web",
    "anthropic-ai",
    "perplexitybot",
    "youbot",
    "ccbot",
    "bytespider",
    "amazonbot",
    "google-extended",
    "cohere-ai",
    // SEO tooling
    "semrushbot",
    "ahrefsbot",
    "mj12bot",
    "dotbot",
    "rogerbot",
    "screaming frog",
    // Archivers and generic tokens
    "ia_archiver",
    "archive.org_bot",
    "crawler",
    "spider",
    "crawling",
    "headlesschrome",
    "lighthouse",
];

/// Classify a request by its User-Agent header.
///
/// An absent header is never a crawler. Matching is a lower-cased substring
/// scan over [`BOT_PATTERNS`]; no side effects.
pub fn is_crawler(user_agent: Option<&str>) -> bool {
    let Some(ua) = user_agent else {
        return false;
    };
    let ua = ua.to_lowercase();
    BOT_PATTERNS.iter().any(|pattern| ua.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_header_is_not_a_crawler() {
        assert!(!is_crawler(None));
    }

    #[test]
    fn test_search_engines_detected() {
        assert!(is_crawler(Some(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)"
        )));
        assert!(is_crawler(Some(
            "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)"
        )));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(is_crawler(Some("GOOGLEBOT/2.1")));
        assert!(is_crawler(Some("GPTBot/1.0")));
    }

    #[test]
    fn test_preview_and_ai_fetchers_detected() {
        assert!(is_crawler(Some("facebookexternalhit/1.1")));
        assert!(is_crawler(Some(
            "Mozilla/5.0 AppleWebKit/537.36 (compatible; ClaudeBot/1.0)"
        )));
        assert!(is_crawler(Some("PerplexityBot/1.0 (+https://perplexity.ai/bot)")));
    }

    #[test]
    fn test_browsers_pass_through() {
        assert!(!is_crawler(Some(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
        )));
        assert!(!is_crawler(Some(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Version/17.0 Safari/604.1"
        )));
    }

    #[test]
    fn test_handset_names_containing_bot_pass_through() {
        // "Cubot" is a phone manufacturer, not a crawler.
        assert!(!is_crawler(Some(
            "Mozilla/5.0 (Linux; Android 13; Cubot X70) AppleWebKit/537.36 Chrome/112.0 Mobile"
        )));
    }
}
