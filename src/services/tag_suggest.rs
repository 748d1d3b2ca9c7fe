use crate::config::GeminiConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Best-effort tag suggestions from a generative-text endpoint.
///
/// Every failure path - missing key, transport error, non-success status,
/// unexpected response shape - yields an empty list. A broken suggestion
/// service must never block the session form.
pub struct TagSuggester {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

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

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl TagSuggester {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn suggest(&self, title: &str, description: &str) -> Vec<String> {
        if self.api_key.is_empty() {
            debug!("Tag suggestions disabled: no API key configured");
            return Vec::new();
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let prompt = format!(
            "Suggest 5 relevant, short, comma-separated tags for a skill-sharing \
             session with the following details:\nTitle: {}\nDescription: {}\nTags:",
            title, description
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Tag suggestion request failed: {}", e);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!("Tag suggestion endpoint returned {}", response.status());
            return Vec::new();
        }

        let data: GenerateContentResponse = match response.json().await {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to parse tag suggestion response: {}", e);
                return Vec::new();
            }
        };

        let text = data
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
            .unwrap_or("");

        parse_tag_line(text)
    }
}

/// Split a model-produced tag line into clean tags.
pub fn parse_tag_line(text: &str) -> Vec<String> {
    text.replace('\n', "")
        .split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}
