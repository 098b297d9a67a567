//! HTML helpers for the crawler: tag stripping and link extraction.
//!
//! Nothing here tries to be a full parser; crawl input is assumed to be
//! ordinary static HTML, and anything the regexes miss simply never
//! reaches the index.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

static BLOCKS: OnceLock<Regex> = OnceLock::new();
static TAGS: OnceLock<Regex> = OnceLock::new();
static HREFS: OnceLock<Regex> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("static pattern"))
}

/// Remove script/style/comment blocks and all remaining tags, then
/// decode the handful of entities that matter for plain-text indexing.
pub fn strip_html(html: &str) -> String {
    let blocks = pattern(
        &BLOCKS,
        r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->",
    );
    let tags = pattern(&TAGS, r"(?s)<[^>]*>");
    let text = blocks.replace_all(html, " ");
    let text = tags.replace_all(&text, " ");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Pull `href` targets out of anchor tags and resolve them against the
/// page URL. Only http(s) links survive, and fragments are dropped so
/// in-page anchors do not multiply crawl targets.
pub fn extract_links(base: &Url, html: &str) -> Vec<Url> {
    let hrefs = pattern(&HREFS, r#"(?is)<a\s[^>]*?href\s*=\s*["']([^"']*)["']"#);
    let mut links = Vec::new();
    for capture in hrefs.captures_iter(html) {
        let Ok(mut url) = base.join(&capture[1]) else {
            continue;
        };
        if url.scheme() != "http" && url.scheme() != "https" {
            continue;
        }
        url.set_fragment(None);
        links.push(url);
    }
    links
}
