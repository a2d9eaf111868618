use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::article::sort_newest_first;
use crate::cli::BuildArticlesArgs;
use crate::content::markdown_to_html;
use crate::dates::normalize_date;
use crate::formats::Article;
use crate::records::header_key;

pub fn run(args: BuildArticlesArgs) -> anyhow::Result<()> {
    let content_dir = PathBuf::from(&args.content);
    let out_path = PathBuf::from(&args.out);

    let articles = if content_dir.is_dir() {
        build_articles(&content_dir)?
    } else {
        tracing::info!(
            content = %content_dir.display(),
            "content directory not found; writing empty article list"
        );
        Vec::new()
    };

    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(&articles).context("serialize articles json")?;
    std::fs::write(&out_path, json)
        .with_context(|| format!("write articles json: {}", out_path.display()))?;

    tracing::info!(
        articles = articles.len(),
        out = %out_path.display(),
        "built articles"
    );
    Ok(())
}

/// Converts every `*.md` file in `content_dir`, newest first.
pub fn build_articles(content_dir: &Path) -> anyhow::Result<Vec<Article>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(content_dir)
        .with_context(|| format!("read content dir: {}", content_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut articles = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping file with non-utf-8 name");
            continue;
        };
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read article: {}", path.display()))?;
        match article_from_markdown(slug, &raw) {
            Some(article) => articles.push(article),
            None => tracing::debug!(path = %path.display(), "skipping article without title"),
        }
    }

    sort_newest_first(&mut articles);
    Ok(articles)
}

/// Builds one article from a Markdown source; the title defaults to `slug`.
pub fn article_from_markdown(slug: &str, raw: &str) -> Option<Article> {
    let (front, body) = split_front_matter(raw);
    let field = |key: &str| front.get(key).map(|v| v.trim()).unwrap_or_default();

    let title = match field("title") {
        "" => slug.trim(),
        title => title,
    };
    if title.is_empty() {
        return None;
    }

    let date_raw = field("date");
    let date = normalize_date(date_raw);
    Some(Article {
        slug: slug.to_owned(),
        title: title.to_owned(),
        date_raw: date_raw.to_owned(),
        date_display: date.display,
        date_sort: date.sort,
        summary: field("summary").to_owned(),
        content: markdown_to_html(body),
        cover_image: field("cover_image").to_owned(),
    })
}

/// Splits a leading `---` block from the body. Without a closed block the
/// whole text is body.
pub fn split_front_matter(raw: &str) -> (BTreeMap<String, String>, &str) {
    let mut lines = raw.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (BTreeMap::new(), raw.trim());
    };
    if first.trim_end() != "---" {
        return (BTreeMap::new(), raw.trim());
    }

    let mut offset = first.len();
    let block_start = offset;
    for line in lines {
        let line_start = offset;
        offset += line.len();
        if line.trim_end() == "---" {
            let front = parse_front_matter(&raw[block_start..line_start]);
            return (front, raw[offset..].trim());
        }
    }

    (BTreeMap::new(), raw.trim())
}

/// Front matter as a flat map with normalized keys. Values are the text
/// after the first `:` on each line; YAML only supplies string values
/// (quoted, escaped or block scalars), so numbers and `null` keep their
/// written form.
pub fn parse_front_matter(block: &str) -> BTreeMap<String, String> {
    let mut front = parse_line_front_matter(block);
    if let Some(strings) = yaml_string_values(block) {
        front.extend(strings);
    }
    front
}

fn yaml_string_values(block: &str) -> Option<BTreeMap<String, String>> {
    let mapping = match serde_yaml::from_str::<serde_yaml::Mapping>(block) {
        Ok(mapping) => mapping,
        Err(err) => {
            tracing::debug!(%err, "front matter is not yaml; using key/value lines");
            return None;
        }
    };

    let mut strings = BTreeMap::new();
    for (key, value) in mapping {
        if let (Some(key), serde_yaml::Value::String(value)) = (key.as_str(), value) {
            strings.insert(header_key(key.trim()), value.trim().to_owned());
        }
    }
    Some(strings)
}

fn parse_line_front_matter(block: &str) -> BTreeMap<String, String> {
    let mut front = BTreeMap::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        front.insert(header_key(key.trim()), unquote(value.trim()).to_owned());
    }
    front
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_front_matter_from_body() {
        let (front, body) =
            split_front_matter("---\ntitle: Hello\nCover Image: a.png\n---\n\nBody text\n");
        assert_eq!(front.get("title").map(String::as_str), Some("Hello"));
        assert_eq!(front.get("cover_image").map(String::as_str), Some("a.png"));
        assert_eq!(body, "Body text");
    }

    #[test]
    fn handles_crlf_front_matter() {
        let (front, body) = split_front_matter("---\r\ntitle: Win\r\n---\r\nBody\r\n");
        assert_eq!(front.get("title").map(String::as_str), Some("Win"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn missing_or_unclosed_front_matter_is_all_body() {
        let (front, body) = split_front_matter("# Just text\n");
        assert!(front.is_empty());
        assert_eq!(body, "# Just text");

        let (front, body) = split_front_matter("---\ntitle: x\nno end");
        assert!(front.is_empty());
        assert_eq!(body, "---\ntitle: x\nno end");
    }

    #[test]
    fn falls_back_to_line_parsing_for_non_yaml_values() {
        let front =
            parse_front_matter("title: Tips: build a PC\nsummary: 'Quoted'\ndate: \"2024-01-15\"");
        assert_eq!(front.get("title").map(String::as_str), Some("Tips: build a PC"));
        assert_eq!(front.get("summary").map(String::as_str), Some("Quoted"));
        assert_eq!(front.get("date").map(String::as_str), Some("2024-01-15"));
    }

    #[test]
    fn yaml_strings_are_unescaped() {
        let front = parse_front_matter(
            "summary: \"quoted, \\\"escaped\\\"\"\nnotes: >\n  folded\n  text\ndraft: true",
        );
        assert_eq!(
            front.get("summary").map(String::as_str),
            Some("quoted, \"escaped\"")
        );
        assert_eq!(front.get("notes").map(String::as_str), Some("folded text"));
        assert_eq!(front.get("draft").map(String::as_str), Some("true"));
    }

    #[test]
    fn non_string_scalars_keep_their_written_text() {
        let front = parse_front_matter("title: 1.50\nsummary: null\nversion: 010\nprice: 1e3");
        assert_eq!(front.get("title").map(String::as_str), Some("1.50"));
        assert_eq!(front.get("summary").map(String::as_str), Some("null"));
        assert_eq!(front.get("version").map(String::as_str), Some("010"));
        assert_eq!(front.get("price").map(String::as_str), Some("1e3"));
    }

    #[test]
    fn builds_article_with_defaults() -> anyhow::Result<()> {
        let raw = "---\ndate: 2024-01-15\n---\n## Speed\n- fast\n";
        let article = article_from_markdown("ssd-vs-hdd", raw)
            .ok_or_else(|| anyhow::anyhow!("article should build"))?;
        assert_eq!(article.title, "ssd-vs-hdd");
        assert_eq!(article.date_display, "Jan 15, 2024");
        assert_eq!(article.content, "<h2>Speed</h2>\n<ul>\n<li>fast</li>\n</ul>");
        assert_eq!(article.cover_image, "");
        Ok(())
    }

    #[test]
    fn builds_directory_newest_first() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        std::fs::write(temp.path().join("old.md"), "---\ntitle: Old\ndate: 2023-05-01\n---\nx")?;
        std::fs::write(temp.path().join("new.md"), "---\ntitle: New\ndate: 2024-05-01\n---\ny")?;
        std::fs::write(temp.path().join("undated.md"), "z")?;
        std::fs::write(temp.path().join("notes.txt"), "ignored")?;

        let articles = build_articles(temp.path())?;
        let slugs = articles.iter().map(|a| a.slug.as_str()).collect::<Vec<_>>();
        assert_eq!(slugs, vec!["new", "old", "undated"]);
        Ok(())
    }
}
