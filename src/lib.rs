//! Quality filtering and topic classification for scraped Chinese articles.

pub mod ai;
pub mod app;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod quality;
pub mod tasks;
pub mod taxonomy;
