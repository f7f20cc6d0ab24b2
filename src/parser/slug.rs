use url::Url;

use crate::model::UNKNOWN_SLUG;

/// Last non-empty path segment of the offer URL.
pub fn offer_slug(offer_url: &str) -> String {
    Url::parse(offer_url.trim())
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .filter(|seg| !seg.is_empty())
                .last()
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNKNOWN_SLUG.to_string())
}

/// "senior-python-dev" → "Senior Python Dev".
pub fn title_from_slug(slug: &str) -> String {
    let spaced = slug.replace('-', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_alpha = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
