#![forbid(unsafe_code)]

pub mod article;
pub mod build_articles;
pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod dates;
pub mod feed;
pub mod formats;
pub mod logging;
pub mod media;
pub mod product;
pub mod records;
pub mod store;
pub mod tokenize;
