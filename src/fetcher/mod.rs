pub mod client;
pub mod errors;
pub mod pipeline;

pub use client::{HttpFetcher, PageResponse};
pub use errors::FetchError;
