use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    /// Display text with the currency symbol embedded, e.g. `₱34,999`.
    pub price: String,
    pub description: String,
    pub badge: String,
    pub image: String,
    pub images: Vec<String>,
}

/// Article record shared by the spreadsheet feed and the Markdown build step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub slug: String,
    pub title: String,
    #[serde(rename = "dateRaw")]
    pub date_raw: String,
    #[serde(rename = "dateDisplay")]
    pub date_display: String,
    #[serde(rename = "dateSort")]
    pub date_sort: i64,
    pub summary: String,
    /// Pre-rendered HTML from the build step, or line markup from the sheet.
    pub content: String,
    #[serde(alias = "coverImage")]
    pub cover_image: String,
}
