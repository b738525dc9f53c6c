use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{Classifier, ClassifierError, build_prompt};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Google Gemini `generateContent` client.
pub struct GeminiClassifier {
    http: reqwest::Client,
    headers: HeaderMap,
    model: String,
    base_url: String,
}

impl GeminiClassifier {
    pub fn new(api_key: &str, model: &str) -> Result<Self, ClassifierError> {
        if api_key.trim().is_empty() {
            return Err(ClassifierError::Config("api key is empty".to_string()));
        }
        if model.trim().is_empty() {
            return Err(ClassifierError::Config("model name is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| ClassifierError::Config(format!("api key is not a valid header: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            headers,
            model: model.to_string(),
            base_url: GEMINI_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    #[instrument(skip_all, fields(model = %self.model, chars = text.len()))]
    async fn classify(&self, text: &str) -> Result<String, ClassifierError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(text),
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Classifier returned an error status");
            return Err(ClassifierError::Api { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let answer = parsed.text();
        if answer.trim().is_empty() {
            return Err(ClassifierError::EmptyResponse);
        }

        debug!(response_chars = answer.len(), "Classifier responded");
        Ok(answer)
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
