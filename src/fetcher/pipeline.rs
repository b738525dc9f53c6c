use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Bytes inspected for a `<meta>` charset declaration.
const SNIFF_LEN: usize = 4096;

/// Decode a response body to UTF-8.
///
/// Undecodable sequences become U+FFFD, which the extractor's character
/// filter later drops.
pub fn decode_body(content_type: &str, body: &[u8]) -> (String, &'static Encoding) {
    let encoding = detect_encoding(content_type, body);
    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        warn!(encoding = used.name(), "Body contained malformed sequences");
    }
    (decoded.into_owned(), used)
}

pub fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    // 1. Content-Type header
    if let Some(encoding) = label_from(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    // 2. <meta charset> or <meta http-equiv> in the first few KB
    let head = &body[..body.len().min(SNIFF_LEN)];
    let head_str = String::from_utf8_lossy(head);
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &head_str)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &head_str))
    {
        return encoding;
    }

    // 3. Heuristic detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, body.len() <= SNIFF_LEN);
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
