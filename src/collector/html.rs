use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::RawListing;

static OFFER_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="/job-offer/"]"#).unwrap());
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(https://justjoin\.it/job-offer/[^"]+|/job-offer/[^"]+)""#).unwrap()
});
static ESCAPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https:\\/\\/justjoin\.it\\/job-offer\\/[^"\\]+"#).unwrap());

const SITE_ROOT: &str = "https://justjoin.it";

/// Elements that start a new rendered line.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "div", "dl", "dt", "dd", "fieldset", "figure", "footer", "form",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "table", "tr", "td", "th", "ul",
];
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// One listing per distinct `/job-offer/` anchor, first occurrence wins.
/// When the page has no such anchors (cards not hydrated yet), fall back to
/// scraping offer URLs out of the raw source; those come back with no lines.
pub fn harvest_listings(page: &str, page_url: &str) -> Vec<RawListing> {
    let base = Url::parse(page_url).ok();
    let doc = Html::parse_document(page);
    let mut seen: HashSet<String> = HashSet::new();
    let mut listings = Vec::new();

    for anchor in doc.select(&OFFER_LINK) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve(base.as_ref(), href.trim()) else {
            continue;
        };
        if !url.contains("/job-offer/") || !seen.insert(url.clone()) {
            continue;
        }
        listings.push(RawListing {
            url,
            lines: visible_lines(anchor),
        });
    }

    if listings.is_empty() {
        listings = scan_source_links(page, &mut seen);
    }
    listings
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let url = match base {
        Some(b) => b.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    Some(url.to_string())
}

fn scan_source_links(page: &str, seen: &mut HashSet<String>) -> Vec<RawListing> {
    let plain = HREF_RE.captures_iter(page).map(|caps| {
        let link = &caps[1];
        if link.starts_with('/') {
            format!("{}{}", SITE_ROOT, link)
        } else {
            link.to_string()
        }
    });
    let escaped = ESCAPED_RE
        .find_iter(page)
        .map(|m| m.as_str().replace("\\/", "/"));

    plain
        .chain(escaped)
        .filter(|url| seen.insert(url.clone()))
        .map(|url| RawListing { url, lines: Vec::new() })
        .collect()
}

/// Approximates the rendered text of an element: block boundaries and `<br>`
/// end a line, runs of whitespace collapse, blank lines are dropped.
pub fn visible_lines(el: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    walk(el, &mut current, &mut lines);
    flush(&mut current, &mut lines);
    lines
}

fn walk(el: ElementRef<'_>, current: &mut String, lines: &mut Vec<String>) {
    let name = el.value().name();
    if SKIP_TAGS.contains(&name) {
        return;
    }
    let block = BLOCK_TAGS.contains(&name);
    if block {
        flush(current, lines);
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if child_el.value().name() == "br" {
                flush(current, lines);
            } else {
                walk(child_el, current, lines);
            }
        }
    }
    if block {
        flush(current, lines);
    }
}

fn flush(current: &mut String, lines: &mut Vec<String>) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

// ── Tests ──
