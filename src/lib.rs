pub mod api;
pub mod app;
pub mod config;
pub mod dataset;
pub mod fetch_error;
pub mod indicators;
pub mod scrape;
pub mod services;
pub mod tidy;
