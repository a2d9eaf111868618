use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::product::DEFAULT_FEATURED_LIMIT;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize the product sheet.
    Products(ProductsArgs),
    /// List articles from the article sheet or a built JSON file.
    Articles(ArticlesArgs),
    /// Look up one article by slug.
    Article(ArticleArgs),
    /// Convert Markdown articles into the JSON article feed.
    BuildArticles(BuildArticlesArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct FeedArgs {
    /// Feed URL (http/https) or local file. Defaults to the matching
    /// `SHEETFEED_*_URL` environment variable.
    #[arg(long)]
    pub source: Option<String>,

    /// Fetch timeout in milliseconds (default: `SHEETFEED_FETCH_TIMEOUT_MS` or 8000).
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Write output to this file instead of stdout.
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Only products in this category (`all` keeps everything).
    #[arg(long)]
    pub category: Option<String>,

    /// Select featured products (hot/popular badges first).
    #[arg(long)]
    pub featured: bool,

    /// Print the distinct categories (first-seen order) instead of products.
    #[arg(long, conflicts_with_all = ["category", "featured", "format"])]
    pub list_categories: bool,

    /// Maximum number of featured products.
    #[arg(long, default_value_t = DEFAULT_FEATURED_LIMIT)]
    pub limit: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ArticlesArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Case-insensitive search over title, summary and content.
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct ArticleArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Article slug; the first matching article wins.
    #[arg(long)]
    pub slug: String,

    /// Render sheet markup in `content` to HTML.
    #[arg(long)]
    pub render: bool,
}

#[derive(Debug, Args)]
pub struct BuildArticlesArgs {
    /// Directory of `*.md` article sources.
    #[arg(long)]
    pub content: String,

    /// Output path for the JSON article array.
    #[arg(long)]
    pub out: String,
}
