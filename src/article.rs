use crate::dates::normalize_date;
use crate::formats::Article;
use crate::records::{AliasTable, FieldAlias, RawRecord, RequiredKey, project_records};
use crate::tokenize::parse_rows;

pub const REQUIRED: RequiredKey = RequiredKey::AnyOf(&["slug", "title"]);

static FIELDS: AliasTable = AliasTable(&[FieldAlias {
    field: "cover_image",
    headers: &["cover_image", "coverimage", "cover", "image"],
}]);

/// How an article feed body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedShape {
    /// Spreadsheet CSV export.
    Csv,
    /// JSON array written by `build-articles`.
    Json,
}

impl FeedShape {
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('[') {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

/// Builds an [`Article`] from one sheet row. Never fails: a bad date only
/// degrades the display text and sort key.
pub fn normalize_article(record: &RawRecord) -> Article {
    let date_raw = FIELDS.resolve(record, "date");
    let date = normalize_date(date_raw);
    Article {
        slug: FIELDS.resolve(record, "slug").to_owned(),
        title: FIELDS.resolve(record, "title").to_owned(),
        date_raw: date_raw.to_owned(),
        date_display: date.display,
        date_sort: date.sort,
        summary: FIELDS.resolve(record, "summary").to_owned(),
        content: FIELDS.resolve(record, "content").to_owned(),
        cover_image: FIELDS.resolve(record, "cover_image").to_owned(),
    }
}

/// Trims a pre-built record and fills date fields the producer left blank.
pub fn normalize_built_article(mut article: Article) -> Article {
    for field in [
        &mut article.slug,
        &mut article.title,
        &mut article.date_raw,
        &mut article.summary,
        &mut article.content,
        &mut article.cover_image,
    ] {
        let trimmed = field.trim();
        if trimmed.len() != field.len() {
            *field = trimmed.to_owned();
        }
    }
    if article.date_display.is_empty() && !article.date_raw.is_empty() {
        let date = normalize_date(&article.date_raw);
        article.date_display = date.display;
        article.date_sort = date.sort;
    }
    article
}

fn is_complete(article: &Article) -> bool {
    let complete = !article.slug.is_empty() && !article.title.is_empty();
    if !complete {
        tracing::debug!(
            slug = %article.slug,
            title = %article.title,
            "dropping article without slug or title"
        );
    }
    complete
}

pub fn parse_articles_csv(csv_text: &str) -> Vec<Article> {
    project_records(&parse_rows(csv_text), REQUIRED)
        .iter()
        .map(normalize_article)
        .filter(is_complete)
        .collect()
}

/// Reads a JSON article array. Anything that is not an array of objects
/// yields no articles; malformed elements are skipped individually.
pub fn parse_articles_json(json_text: &str) -> Vec<Article> {
    let value = match serde_json::from_str::<serde_json::Value>(json_text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%err, "article feed is not valid json");
            return Vec::new();
        }
    };
    let serde_json::Value::Array(items) = value else {
        tracing::warn!("article feed json is not an array");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<Article>(item) {
            Ok(article) => Some(normalize_built_article(article)),
            Err(err) => {
                tracing::debug!(index = idx, %err, "skipping malformed article entry");
                None
            }
        })
        .filter(is_complete)
        .collect()
}

/// Parses either feed shape, preserving feed order.
pub fn parse_articles(text: &str) -> Vec<Article> {
    match FeedShape::detect(text) {
        FeedShape::Csv => parse_articles_csv(text),
        FeedShape::Json => parse_articles_json(text),
    }
}

/// Newest first; undated articles (sort key `0`) keep their relative order
/// at the end.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.date_sort.cmp(&a.date_sort));
}

/// First article with `slug`, in sequence order.
pub fn find_by_slug<'a>(articles: &'a [Article], slug: &str) -> Option<&'a Article> {
    articles.iter().find(|a| a.slug == slug)
}
