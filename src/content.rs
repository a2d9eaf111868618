//! Line-oriented article renderers.
//!
//! Two dialects share one line classifier: the spreadsheet markup (headings,
//! lists, `[image]`/`[video]` tags, no inline formatting) and the build-time
//! Markdown subset (headings, lists, inline emphasis/code/links). Neither
//! supports constructs spanning lines.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::media::{MediaElement, MediaKind, ResolvedMedia, fallback_urls, resolve_media};

const IFRAME_ALLOW: &str =
    "accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture";

static IMAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[image\]([^|\]]+)(?:\|([^\]]*))?\[/image\]$").expect("image tag pattern")
});
static VIDEO_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[video\]([^|\]]+)(?:\|([^\]]*))?\[/video\]$").expect("video tag pattern")
});

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("strong pattern"));
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("em pattern"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").expect("code pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    SheetMarkup,
    Markdown,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Media {
        kind: MediaKind,
        path: &'a str,
        caption: &'a str,
    },
    Heading { level: u8, text: &'a str },
    ListItem(&'a str),
    Paragraph(&'a str),
}

fn media_tag(line: &str) -> Option<Line<'_>> {
    for (re, kind) in [(&*VIDEO_TAG, MediaKind::Video), (&*IMAGE_TAG, MediaKind::Image)] {
        if let Some(caps) = re.captures(line) {
            let path = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let caption = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            return Some(Line::Media {
                kind,
                path,
                caption,
            });
        }
    }
    None
}

fn classify(line: &str, dialect: Dialect) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if dialect == Dialect::SheetMarkup
        && let Some(media) = media_tag(line)
    {
        return media;
    }
    if let Some(rest) = line.strip_prefix("### ") {
        return Line::Heading {
            level: 3,
            text: rest.trim_start(),
        };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Line::Heading {
            level: 2,
            text: rest.trim_start(),
        };
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Line::ListItem(rest.trim_start());
    }
    Line::Paragraph(line)
}

#[derive(Debug, Default)]
struct HtmlOut {
    lines: Vec<String>,
    list_open: bool,
}

impl HtmlOut {
    fn push(&mut self, html: String) {
        self.lines.push(html);
    }

    fn open_list(&mut self) {
        if !self.list_open {
            self.lines.push("<ul>".to_owned());
            self.list_open = true;
        }
    }

    fn close_list(&mut self) {
        if self.list_open {
            self.lines.push("</ul>".to_owned());
            self.list_open = false;
        }
    }

    fn finish(mut self) -> String {
        self.close_list();
        self.lines.join("\n")
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Applies bold, emphasis, code and link formatting to already-escaped text.
fn inline_format(escaped: &str) -> String {
    let text = STRONG.replace_all(escaped, "<strong>${1}</strong>");
    let text = EMPHASIS.replace_all(&text, "<em>${1}</em>");
    let text = CODE.replace_all(&text, "<code>${1}</code>");
    LINK.replace_all(&text, |caps: &Captures<'_>| {
        format!("<a href=\"{}\">{}</a>", &caps[2], &caps[1])
    })
    .into_owned()
}

fn embedded_player(src: &str, original: &str) -> String {
    format!(
        "<div class=\"video-wrap\"><iframe src=\"{}\" frameborder=\"0\" allow=\"{IFRAME_ALLOW}\" allowfullscreen data-original=\"{}\"></iframe></div>",
        escape_html(src),
        escape_html(original)
    )
}

/// `data-fallbacks` lists alternate sources to try when a drive image fails.
fn image_tag(src: &str, alt: &str, original: &str) -> String {
    let fallbacks = fallback_urls(original);
    let fallbacks = if fallbacks.is_empty() {
        String::new()
    } else {
        format!(" data-fallbacks=\"{}\"", escape_html(&fallbacks.join(" ")))
    };
    format!(
        "<img src=\"{}\" alt=\"{}\" loading=\"lazy\" data-original=\"{}\"{fallbacks}>",
        escape_html(src),
        escape_html(alt),
        escape_html(original)
    )
}

fn render_media(out: &mut HtmlOut, kind: MediaKind, path: &str, caption: &str) {
    let figure_class = match kind {
        MediaKind::Image => "article-inline-image",
        MediaKind::Video => "article-inline-video",
    };
    out.push(format!("<figure class=\"{figure_class}\">"));
    let ResolvedMedia { element, src } = resolve_media(path, kind);
    match element {
        MediaElement::Img => {
            let alt = if caption.is_empty() {
                "Article image"
            } else {
                caption
            };
            out.push(image_tag(&src, alt, path));
        }
        MediaElement::Iframe => out.push(embedded_player(&src, path)),
    }
    if !caption.is_empty() {
        out.push(format!("<figcaption>{}</figcaption>", escape_html(caption)));
    }
    out.push("</figure>".to_owned());
}

fn render(text: &str, dialect: Dialect) -> String {
    let format_text = |text: &str| match dialect {
        Dialect::SheetMarkup => escape_html(text),
        Dialect::Markdown => inline_format(&escape_html(text)),
    };

    let mut out = HtmlOut::default();
    for raw_line in text.lines() {
        match classify(raw_line.trim_end(), dialect) {
            Line::Blank => out.close_list(),
            Line::Media {
                kind,
                path,
                caption,
            } => {
                out.close_list();
                if !path.is_empty() {
                    render_media(&mut out, kind, path, caption);
                }
            }
            Line::Heading { level, text } => {
                out.close_list();
                out.push(format!("<h{level}>{}</h{level}>", escape_html(text)));
            }
            Line::ListItem(text) => {
                out.open_list();
                out.push(format!("<li>{}</li>", format_text(text)));
            }
            Line::Paragraph(text) => {
                out.close_list();
                out.push(format!("<p>{}</p>", format_text(text)));
            }
        }
    }
    out.finish()
}

/// Renders spreadsheet article markup to HTML.
pub fn render_markup(text: &str) -> String {
    render(text, Dialect::SheetMarkup)
}

/// Converts the Markdown subset used by article source files to HTML.
pub fn markdown_to_html(text: &str) -> String {
    render(text, Dialect::Markdown)
}

/// Plain text of an HTML fragment, for searching.
pub fn strip_html(html: &str) -> String {
    TAG.replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
