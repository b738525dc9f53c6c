//! Plain-text extraction for classifier input.
//!
//! The output is the visible text of the `<body>` with script and style
//! content removed, stray symbols filtered out and all whitespace collapsed to
//! single spaces.

pub mod cleaner;
pub mod errors;
pub mod reader;

#[cfg(test)]
mod tests;

pub use errors::ExtractError;

use scraper::Html;

pub fn extract(raw_html: &str) -> Result<String, ExtractError> {
    if raw_html.trim().is_empty() {
        return Err(ExtractError::Parse("document is empty".to_string()));
    }

    let document = Html::parse_document(raw_html);
    let body = reader::find_body(&document).ok_or(ExtractError::NoBody)?;

    let mut text = String::new();
    reader::collect_text(body, &mut text);

    Ok(cleaner::normalize_whitespace(&cleaner::filter_chars(&text)))
}
