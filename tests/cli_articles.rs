use std::fs;

use predicates::prelude::*;
use sheetfeed::formats::Article;

mod sheet_stub;

use sheet_stub::{Route, SheetStub};

const ARTICLES_CSV: &str = "Slug,Title,Date,Summary,Content,Cover Image\n\
how-to-choose-ram,How to Choose RAM,2024-01-15,Capacity and speed,\"## Capacity\n16GB is the sweet spot.\n- DDR4\n- DDR5\n\n[image]https://drive.google.com/file/d/ram1/view|A DIMM[/image]\",https://example.com/ram.png\n\
ssd-vs-hdd,SSD vs HDD,2024-03-01,Which storage?,NVMe drives are fast.,\n\
pc-building-tips,PC Building Tips,sometime soon,Avoid mistakes,Ground yourself.,\n\
ssd-vs-hdd,Duplicate SSD,2023-01-01,dup,dup,\n\
,,,orphan,,\n";

fn sheetfeed() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sheetfeed");
    cmd.env_remove("SHEETFEED_PRODUCTS_URL")
        .env_remove("SHEETFEED_ARTICLES_URL")
        .env_remove("SHEETFEED_FETCH_TIMEOUT_MS");
    cmd
}

#[test]
fn articles_are_listed_newest_first() -> anyhow::Result<()> {
    let stub = SheetStub::spawn(vec![("/pub", Route::csv(ARTICLES_CSV))]);

    let output = sheetfeed()
        .env("SHEETFEED_ARTICLES_URL", stub.url("/pub?output=csv"))
        .args(["articles"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let articles: Vec<Article> = serde_json::from_slice(&output)?;

    let slugs = articles.iter().map(|a| a.slug.as_str()).collect::<Vec<_>>();
    assert_eq!(
        slugs,
        vec!["ssd-vs-hdd", "how-to-choose-ram", "ssd-vs-hdd", "pc-building-tips"]
    );
    assert_eq!(articles[1].date_display, "Jan 15, 2024");
    assert_eq!(articles[1].cover_image, "https://example.com/ram.png");
    assert_eq!(articles[3].date_display, "sometime soon");
    assert_eq!(articles[3].date_sort, 0);
    Ok(())
}

#[test]
fn articles_can_be_searched() -> anyhow::Result<()> {
    let stub = SheetStub::spawn(vec![("/pub", Route::csv(ARTICLES_CSV))]);

    let output = sheetfeed()
        .args(["articles", "--source", &stub.url("/pub"), "--query", "SWEET spot"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let articles: Vec<Article> = serde_json::from_slice(&output)?;
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].slug, "how-to-choose-ram");
    Ok(())
}

#[test]
fn article_lookup_renders_markup_and_takes_first_duplicate() -> anyhow::Result<()> {
    let stub = SheetStub::spawn(vec![("/pub", Route::csv(ARTICLES_CSV))]);

    let output = sheetfeed()
        .args([
            "article",
            "--source",
            &stub.url("/pub"),
            "--slug",
            "how-to-choose-ram",
            "--render",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let article: Article = serde_json::from_slice(&output)?;
    assert_eq!(article.title, "How to Choose RAM");
    assert_eq!(
        article.content,
        "<h2>Capacity</h2>\n\
<p>16GB is the sweet spot.</p>\n\
<ul>\n<li>DDR4</li>\n<li>DDR5</li>\n</ul>\n\
<figure class=\"article-inline-image\">\n\
<img src=\"https://drive.google.com/uc?export=view&amp;id=ram1\" alt=\"A DIMM\" loading=\"lazy\" \
data-original=\"https://drive.google.com/file/d/ram1/view\" \
data-fallbacks=\"https://drive.google.com/thumbnail?id=ram1&amp;sz=w1000-h1000 \
https://drive.google.com/uc?export=view&amp;id=ram1 \
https://drive.google.com/uc?export=download&amp;id=ram1\">\n\
<figcaption>A DIMM</figcaption>\n\
</figure>"
    );

    let output = sheetfeed()
        .args(["article", "--source", &stub.url("/pub"), "--slug", "ssd-vs-hdd"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let article: Article = serde_json::from_slice(&output)?;
    assert_eq!(article.title, "SSD vs HDD");
    Ok(())
}

#[test]
fn unknown_slug_fails() {
    let stub = SheetStub::spawn(vec![("/pub", Route::csv(ARTICLES_CSV))]);
    sheetfeed()
        .args(["article", "--source", &stub.url("/pub"), "--slug", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("article not found: nope"));
}

#[test]
fn built_articles_feed_the_reader() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let content_dir = temp.path().join("content").join("articles");
    fs::create_dir_all(&content_dir)?;
    fs::write(
        content_dir.join("gpu-guide.md"),
        "---\n\
title: \"GPU Guide\"\n\
date: 2024-06-01\n\
summary: Pick the right card\n\
cover_image: assets/gpu.png\n\
---\n\
\n\
## Budget\n\
Spend **wisely** on `VRAM`.\n",
    )?;
    fs::write(content_dir.join("no-front-matter.md"), "Just a paragraph.\n")?;

    let json_path = temp.path().join("data").join("articles.json");
    sheetfeed()
        .args([
            "build-articles",
            "--content",
            content_dir.to_str().unwrap(),
            "--out",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let built: Vec<Article> = serde_json::from_str(&fs::read_to_string(&json_path)?)?;
    assert_eq!(built.len(), 2);
    assert_eq!(built[0].slug, "gpu-guide");
    assert_eq!(built[0].title, "GPU Guide");
    assert_eq!(built[0].date_display, "Jun 1, 2024");
    assert_eq!(built[0].cover_image, "assets/gpu.png");
    assert_eq!(
        built[0].content,
        "<h2>Budget</h2>\n<p>Spend <strong>wisely</strong> on <code>VRAM</code>.</p>"
    );
    assert_eq!(built[1].title, "no-front-matter");
    assert_eq!(built[1].date_sort, 0);

    let output = sheetfeed()
        .args([
            "article",
            "--source",
            json_path.to_str().unwrap(),
            "--slug",
            "gpu-guide",
            "--render",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let article: Article = serde_json::from_slice(&output)?;
    assert_eq!(article.content, built[0].content);
    Ok(())
}

#[test]
fn build_without_content_dir_writes_empty_array() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let json_path = temp.path().join("articles.json");

    sheetfeed()
        .args([
            "build-articles",
            "--content",
            temp.path().join("missing").to_str().unwrap(),
            "--out",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&json_path)?, "[]");
    Ok(())
}
