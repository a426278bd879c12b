//! URL判定
//!
//! 結果リストで「開く」アクションを出すかどうかの判定に使う。
//! ブラウザのURL解析に合わせ、http/https/ftp/ws/wss はホストだけを検査する
//! （`http:example.com` やパス中の空白は許容、ホスト中の空白は不可）。

use regex::Regex;

lazy_static::lazy_static! {
    /// `scheme:rest` 形式
    static ref ABSOLUTE_URL_RE: Regex =
        Regex::new(r"(?s)^[A-Za-z][A-Za-z0-9+.\-]*:.*$").unwrap();
    /// ホストが必須のスキーム（区切りの `/` `\` は省略可）
    static ref SPECIAL_HOST_RE: Regex =
        Regex::new(r"^(?i)(?:https?|ftp|wss?):[/\\]*([^/\\?#]*)").unwrap();
}

/// 絶対URLとして解釈できるか
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    if !ABSOLUTE_URL_RE.is_match(text) {
        return false;
    }
    match SPECIAL_HOST_RE.captures(text).and_then(|caps| caps.get(1)) {
        Some(host) => {
            let host = host.as_str();
            !host.is_empty() && !host.chars().any(char::is_whitespace)
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_urls() {
        assert!(is_url("https://example.com"));
        assert!(is_url("http://example.com/path?q=1#frag"));
        assert!(is_url("HTTPS://EXAMPLE.COM"));
        assert!(is_url("  https://example.com  "));
    }

    #[test]
    fn test_lenient_special_urls() {
        assert!(is_url("http:example.com"));
        assert!(is_url("https:\\\\example.com\\path"));
        assert!(is_url("https://a.com/a b"));
        assert!(is_url("https://example.com/search?q=two words"));
    }

    #[test]
    fn test_other_schemes() {
        assert!(is_url("mailto:user@example.com"));
        assert!(is_url("tel:+81312345678"));
        assert!(is_url("WIFI:S:home;T:WPA;P:secret;;"));
    }

    #[test]
    fn test_not_urls() {
        assert!(!is_url(""));
        assert!(!is_url("hello world"));
        assert!(!is_url("example.com"));
        assert!(!is_url("1234567890128"));
        assert!(!is_url("https://"));
        assert!(!is_url("http:"));
        assert!(!is_url("https://a b.com"));
    }
}
