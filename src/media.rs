use std::sync::LazyLock;

use regex::Regex;

const DRIVE_HOST: &str = "drive.google.com";

fn drive_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static drive url pattern")
}

/// Share-link shapes rewritten to thumbnails, in priority order.
static THUMBNAIL_SOURCES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        drive_regex(r"drive\.google\.com/file/d/([a-zA-Z0-9_-]+)"),
        drive_regex(r"drive\.google\.com/open\?id=([a-zA-Z0-9_-]+)"),
        drive_regex(r"drive\.google\.com/uc\?.*id=([a-zA-Z0-9_-]+)"),
    ]
});

/// Shapes recognized when a rendered image fails and alternates are needed.
static FALLBACK_SOURCES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        drive_regex(r"drive\.google\.com/.*[/?]id=([a-zA-Z0-9_-]+)"),
        drive_regex(r"drive\.google\.com/file/d/([a-zA-Z0-9_-]+)"),
        drive_regex(r"drive\.google\.com/thumbnail\?id=([a-zA-Z0-9_-]+)"),
    ]
});

static PATH_ID: LazyLock<Regex> = LazyLock::new(|| drive_regex(r"/d/([a-zA-Z0-9_-]+)"));
static QUERY_ID: LazyLock<Regex> = LazyLock::new(|| drive_regex(r"[?&]id=([a-zA-Z0-9_-]+)"));

fn first_capture<'u>(patterns: &[Regex], url: &'u str) -> Option<&'u str> {
    patterns
        .iter()
        .find_map(|re| re.captures(url).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}

pub fn thumbnail_url(id: &str) -> String {
    format!("https://{DRIVE_HOST}/thumbnail?id={id}&sz=w1000-h1000")
}

pub fn view_url(id: &str) -> String {
    format!("https://{DRIVE_HOST}/uc?export=view&id={id}")
}

pub fn download_url(id: &str) -> String {
    format!("https://{DRIVE_HOST}/uc?export=download&id={id}")
}

pub fn preview_url(id: &str) -> String {
    format!("https://{DRIVE_HOST}/file/d/{id}/preview")
}

/// Rewrites a drive share link (`file/d/`, `open?id=`, `uc?...id=`) to its
/// direct thumbnail endpoint. Other URLs come back trimmed but unchanged.
pub fn rewrite_media_url(url: &str) -> String {
    let url = url.trim();
    match first_capture(THUMBNAIL_SOURCES.as_slice(), url) {
        Some(id) => thumbnail_url(id),
        None => url.to_owned(),
    }
}

pub fn is_drive_link(url: &str) -> bool {
    url.contains(DRIVE_HOST)
}

/// File id from a `/d/<id>` path segment or an `id=` query parameter.
pub fn extract_drive_id(url: &str) -> Option<&str> {
    PATH_ID
        .captures(url)
        .or_else(|| QUERY_ID.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaElement {
    Img,
    Iframe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub element: MediaElement,
    pub src: String,
}

/// Picks the element and source used to embed `url` in an article.
///
/// Drive links are pointed at the inline-view endpoint for images and the
/// preview player for videos. Anything else is embedded as-is.
pub fn resolve_media(url: &str, preferred: MediaKind) -> ResolvedMedia {
    let element = match preferred {
        MediaKind::Image => MediaElement::Img,
        MediaKind::Video => MediaElement::Iframe,
    };
    let src = match (is_drive_link(url), extract_drive_id(url)) {
        (true, Some(id)) => match preferred {
            MediaKind::Image => view_url(id),
            MediaKind::Video => preview_url(id),
        },
        (true, None) => {
            tracing::debug!(url, "drive link without file id; embedding as-is");
            url.to_owned()
        }
        (false, _) => url.to_owned(),
    };
    ResolvedMedia { element, src }
}

/// Alternate sources to try, in order, when an image at `url` fails to load.
pub fn fallback_urls(url: &str) -> Vec<String> {
    match first_capture(FALLBACK_SOURCES.as_slice(), url) {
        Some(id) => vec![thumbnail_url(id), view_url(id), download_url(id)],
        None => Vec::new(),
    }
}
