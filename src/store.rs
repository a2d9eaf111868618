//! Caller-owned in-memory views over one loaded feed.

use crate::article::{find_by_slug, sort_newest_first};
use crate::content::strip_html;
use crate::formats::{Article, Product};
use crate::product::select_featured;

pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default)]
pub struct ArticleStore {
    articles: Vec<Article>,
}

impl ArticleStore {
    /// Keeps `articles` in the order given; lookups honor that order.
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn sort_newest_first(&mut self) {
        sort_newest_first(&mut self.articles);
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Article> {
        find_by_slug(&self.articles, slug)
    }

    /// Case-insensitive substring match over title, summary and the text of
    /// the content. A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Article> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.articles.iter().collect();
        }
        self.articles
            .iter()
            .filter(|a| {
                let haystack = format!("{} {} {}", a.title, a.summary, strip_html(&a.content));
                haystack.to_lowercase().contains(&query)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products whose category equals `category`; `all` selects everything.
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        let category = category.trim();
        if category.is_empty() || category == ALL_CATEGORIES {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for product in &self.products {
            let category = product.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Featured selection among the products of `category`.
    pub fn featured(&self, category: &str, limit: usize) -> Vec<Product> {
        select_featured(self.in_category(category), limit)
    }
}
