pub mod app_state;
pub mod classifier;
pub mod config;
pub mod crawler;
pub mod entities;
pub mod extractor;
pub mod fetcher;
pub mod fingerprint;
pub mod health;
pub mod ingest;
pub mod items;
pub mod repositories;
pub mod server;
