use std::sync::LazyLock;

use regex::Regex;
use url::{ParseError, Url};

static ID_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+").expect("static regex"));

/// Extract a YouTube video id from a watch URL (`youtube.com/watch?v=<id>`)
/// or a short link (`youtu.be/<id>`).
///
/// Returns `None` for anything else, including the `N/A` placeholder and
/// YouTube URLs without an id.
pub fn resolve_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        // Links pasted without a scheme, e.g. `youtu.be/<id>`.
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", url)).ok()?,
        Err(_) => return None,
    };
    let host = parsed.host_str()?.to_ascii_lowercase();

    let candidate = if host == "youtu.be" {
        parsed.path_segments()?.next()?.to_string()
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?
    } else {
        return None;
    };

    ID_PREFIX
        .find(&candidate)
        .map(|m| m.as_str().to_string())
}
