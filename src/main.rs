use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    sheetfeed::logging::init().context("init logging")?;

    let cli = sheetfeed::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let config = sheetfeed::config::FeedConfig::from_env().context("load config")?;

    match cli.command {
        sheetfeed::cli::Command::Products(args) => {
            sheetfeed::commands::products(args, &config)
                .await
                .context("products")?;
        }
        sheetfeed::cli::Command::Articles(args) => {
            sheetfeed::commands::articles(args, &config)
                .await
                .context("articles")?;
        }
        sheetfeed::cli::Command::Article(args) => {
            sheetfeed::commands::article(args, &config)
                .await
                .context("article")?;
        }
        sheetfeed::cli::Command::BuildArticles(args) => {
            sheetfeed::build_articles::run(args).context("build-articles")?;
        }
    }

    Ok(())
}
