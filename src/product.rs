use crate::formats::Product;
use crate::media::rewrite_media_url;
use crate::records::{AliasTable, FieldAlias, RawRecord, RequiredKey, project_records};
use crate::tokenize::parse_rows;

pub const DEFAULT_FEATURED_LIMIT: usize = 8;

pub const REQUIRED: RequiredKey = RequiredKey::Field("name");

static FIELDS: AliasTable = AliasTable(&[FieldAlias {
    field: "description",
    headers: &["description", "full_description", "desc"],
}]);

fn split_image_list(images: &str) -> impl Iterator<Item = &str> {
    images.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Builds a [`Product`] from one sheet row. Pure string work; never fails.
pub fn normalize_product(record: &RawRecord) -> Product {
    let images_cell = FIELDS.resolve(record, "images");
    let mut image = FIELDS.resolve(record, "image");
    if image.is_empty() {
        image = split_image_list(images_cell).next().unwrap_or_default();
    }
    let image = rewrite_media_url(image);

    let mut images = split_image_list(images_cell)
        .map(rewrite_media_url)
        .filter(|url| !url.is_empty())
        .collect::<Vec<_>>();
    if images.is_empty() && !image.is_empty() {
        images.push(image.clone());
    }

    Product {
        name: FIELDS.resolve(record, "name").to_owned(),
        category: FIELDS.resolve(record, "category").to_owned(),
        price: FIELDS.resolve(record, "price").to_owned(),
        description: FIELDS.resolve(record, "description").to_owned(),
        badge: FIELDS.resolve(record, "badge").to_owned(),
        image,
        images,
    }
}

/// Full product pipeline over a CSV export, in sheet order.
pub fn parse_products(csv_text: &str) -> Vec<Product> {
    let rows = parse_rows(csv_text);
    let products = project_records(&rows, REQUIRED)
        .iter()
        .map(normalize_product)
        .filter(|p| !p.name.is_empty())
        .collect::<Vec<_>>();
    tracing::debug!(rows = rows.len(), products = products.len(), "parsed product feed");
    products
}

pub fn is_featured_badge(badge: &str) -> bool {
    let badge = badge.trim();
    badge.eq_ignore_ascii_case("hot") || badge.eq_ignore_ascii_case("popular")
}

/// Badged (hot/popular) products first, topped up with the rest in feed
/// order, capped at `limit`.
pub fn select_featured<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    limit: usize,
) -> Vec<Product> {
    let (badged, rest): (Vec<&Product>, Vec<&Product>) = products
        .into_iter()
        .partition(|p| is_featured_badge(&p.badge));
    badged
        .into_iter()
        .chain(rest)
        .take(limit)
        .cloned()
        .collect()
}
