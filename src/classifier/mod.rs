//! Earthquake fact extraction through an external text classifier.
//!
//! The [`Classifier`] trait is the transport seam: it takes sanitized article
//! text and returns the service's raw answer. Parsing and validation of that
//! answer live here so every backend shares them.

pub mod errors;
pub mod gemini;

pub use errors::{ClassificationError, ClassifierError, Rejection};
pub use gemini::GeminiClassifier;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::entities::{EventDraft, UNKNOWN};

/// Instructions prepended to every article.
pub const PROMPT_TEMPLATE: &str = r#"
output a json with the following format:
{"deaths": 0, "injured": 0, "magnitude": 4.7, "location": "City, State", "date": "YYYY-MM-DD"}
(int) deaths/injured value should come from term like "[number] people died/dead/killed/injured" or in words like "killing at least three" as deaths or "injuring ten" as injured value. 0 if int is missing.
(string) location must be in the format "City, State" or "City, Country" if outside the US. "unknown" if not confident in location.
(string) date must be in the format "YYYY-MM-DD", "unknown" if date is missing
"#;

pub fn build_prompt(text: &str) -> String {
    format!("{}{}", PROMPT_TEMPLATE, text)
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify article text, returning the service's raw response text.
    async fn classify(&self, text: &str) -> Result<String, ClassifierError>;
}

/// Structured facts as reported by the classifier.
///
/// Missing or `null` fields take the same sentinel the prompt asks for: `0`
/// for numbers and `"unknown"` for strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub deaths: u32,
    pub injured: u32,
    pub magnitude: f64,
    pub location: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(default)]
    deaths: Option<u32>,
    #[serde(default)]
    injured: Option<u32>,
    #[serde(default)]
    magnitude: Option<f64>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl From<RawClassification> for Classification {
    fn from(raw: RawClassification) -> Self {
        Self {
            deaths: raw.deaths.unwrap_or(0),
            injured: raw.injured.unwrap_or(0),
            magnitude: raw.magnitude.unwrap_or(0.0),
            location: raw.location.unwrap_or_else(|| UNKNOWN.to_string()),
            date: raw.date.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

impl Classification {
    /// Validate for persistence. Anything that fails here never reaches the
    /// store.
    pub fn into_draft(self, ref_url: &str) -> Result<EventDraft, Rejection> {
        if !self.magnitude.is_finite() || self.magnitude <= 0.0 {
            return Err(Rejection::MissingMagnitude(self.magnitude));
        }

        let location = self.location.trim();
        if is_unknown(location) {
            return Err(Rejection::UnknownLocation);
        }

        let date = self.date.trim();
        if is_unknown(date) {
            return Err(Rejection::UnknownDate);
        }
        if !is_iso_date(date) {
            return Err(Rejection::MalformedDate(date.to_string()));
        }

        Ok(EventDraft {
            injured: self.injured,
            deaths: self.deaths,
            magnitude: self.magnitude,
            location: location.to_string(),
            date: date.to_string(),
            ref_url: ref_url.to_string(),
        })
    }
}

fn is_unknown(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(UNKNOWN)
}

/// Strict `YYYY-MM-DD`. chrono alone skips padding before numeric fields, so
/// the shape is checked byte by byte before the calendar check.
fn is_iso_date(value: &str) -> bool {
    let shaped = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    shaped && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Parse a classifier response, tolerating code fences and stray prose
/// around the JSON object.
pub fn parse_classification(response: &str) -> Result<Classification, ClassificationError> {
    let body = strip_code_fences(response);
    let raw: RawClassification = serde_json::from_str(body)?;
    Ok(raw.into())
}

/// Strip markdown code fences (and a leading `json` tag) from a response.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let trimmed = trimmed.strip_prefix("json").unwrap_or(trimmed).trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}
