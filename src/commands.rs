use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;

use crate::article::{FeedShape, parse_articles};
use crate::cli::{ArticleArgs, ArticlesArgs, FeedArgs, OutputFormat, ProductsArgs};
use crate::config::{ARTICLES_URL_VAR, FeedConfig, PRODUCTS_URL_VAR, pick_source};
use crate::content::render_markup;
use crate::feed::{FeedSource, load_text};
use crate::formats::Product;
use crate::product::parse_products;
use crate::store::{ALL_CATEGORIES, ArticleStore, ProductCatalog};
use crate::tokenize::write_rows;

const PRODUCT_COLUMNS: [&str; 7] = [
    "name",
    "category",
    "price",
    "description",
    "badge",
    "image",
    "images",
];

async fn load_feed(
    feed: &FeedArgs,
    configured: Option<&str>,
    var: &str,
    config: &FeedConfig,
) -> anyhow::Result<String> {
    let raw = pick_source(feed.source.as_deref(), configured, var)?;
    let source = FeedSource::parse(&raw)?;
    let config = config.clone().with_timeout_override(feed.timeout_ms);
    load_text(&source, config.fetch_timeout).await
}

fn emit(out: Option<&str>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir: {}", parent.display()))?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("write output: {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write stdout")?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n").context("write stdout newline")?;
            }
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

fn products_csv(products: &[Product]) -> anyhow::Result<String> {
    let header = PRODUCT_COLUMNS.map(str::to_owned).to_vec();
    let rows = products.iter().map(|p| {
        vec![
            p.name.clone(),
            p.category.clone(),
            p.price.clone(),
            p.description.clone(),
            p.badge.clone(),
            p.image.clone(),
            p.images.join(","),
        ]
    });
    write_rows(std::iter::once(header).chain(rows))
}

pub async fn products(args: ProductsArgs, config: &FeedConfig) -> anyhow::Result<()> {
    let text = load_feed(
        &args.feed,
        config.products_source.as_deref(),
        PRODUCTS_URL_VAR,
        config,
    )
    .await?;

    let catalog = ProductCatalog::new(parse_products(&text));
    if args.list_categories {
        let categories = catalog.categories();
        tracing::info!(categories = categories.len(), "product categories ready");
        let body =
            serde_json::to_string_pretty(&categories).context("serialize categories json")?;
        return emit(args.feed.out.as_deref(), &body);
    }

    let category = args.category.as_deref().unwrap_or(ALL_CATEGORIES);
    let selected = if args.featured {
        catalog.featured(category, args.limit)
    } else {
        catalog.in_category(category).into_iter().cloned().collect()
    };
    tracing::info!(
        total = catalog.products().len(),
        selected = selected.len(),
        category,
        featured = args.featured,
        "products ready"
    );

    let body = match args.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&selected).context("serialize products json")?
        }
        OutputFormat::Csv => products_csv(&selected).context("serialize products csv")?,
    };
    emit(args.feed.out.as_deref(), &body)
}

pub async fn articles(args: ArticlesArgs, config: &FeedConfig) -> anyhow::Result<()> {
    let text = load_feed(
        &args.feed,
        config.articles_source.as_deref(),
        ARTICLES_URL_VAR,
        config,
    )
    .await?;

    let mut store = ArticleStore::new(parse_articles(&text));
    store.sort_newest_first();
    if store.is_empty() {
        tracing::info!("article feed has no complete articles");
    }
    let found = store.search(args.query.as_deref().unwrap_or_default());
    tracing::info!(total = store.len(), matched = found.len(), "articles ready");

    let body = serde_json::to_string_pretty(&found).context("serialize articles json")?;
    emit(args.feed.out.as_deref(), &body)
}

pub async fn article(args: ArticleArgs, config: &FeedConfig) -> anyhow::Result<()> {
    let text = load_feed(
        &args.feed,
        config.articles_source.as_deref(),
        ARTICLES_URL_VAR,
        config,
    )
    .await?;

    let store = ArticleStore::new(parse_articles(&text));
    let mut article = store
        .find_by_slug(&args.slug)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("article not found: {}", args.slug))?;

    // Built JSON already carries HTML.
    if args.render && FeedShape::detect(&text) == FeedShape::Csv {
        article.content = render_markup(&article.content);
    }

    let body = serde_json::to_string_pretty(&article).context("serialize article json")?;
    emit(args.feed.out.as_deref(), &body)
}
