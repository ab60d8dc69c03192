//! Assist client for a hosted generative-text endpoint.
//!
//! Three independent operations, each one outbound `generateContent` request.
//! No retries and no queuing: a call either succeeds or immediately falls
//! back to fixed content, so callers never see an error.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::warn;

use pawpal_types::models::{Message, Pet, SopItem, UserRole};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const SUMMARY_EMPTY: &str = "No messages to summarize.";
pub const SUMMARY_BLANK_RESPONSE: &str = "Could not generate summary.";
pub const SUMMARY_FALLBACK: &str = "Summary unavailable at this time.";
pub const TIP_BLANK_RESPONSE: &str = "Always meet in a public place first.";
pub const TIP_FALLBACK: &str = "Ensure emergency contacts are exchanged before the booking.";

/// Generic care items substituted when SOP generation fails for any reason.
pub fn fallback_sops() -> Vec<SopItem> {
    vec![
        SopItem {
            id: "err-1".into(),
            title: "Basic Care".into(),
            instruction: "Ensure fresh water is always available.".into(),
        },
        SopItem {
            id: "err-2".into(),
            title: "Emergency".into(),
            instruction: "Contact owner immediately in case of illness.".into(),
        },
    ]
}

pub struct AssistClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AssistClient {
    pub fn new(api_key: &str, base_url: Option<&str>, model: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PAWPAL_GENAI_API_KEY").unwrap_or_default();
        let base_url = std::env::var("PAWPAL_GENAI_URL").ok();
        let model = std::env::var("PAWPAL_GENAI_MODEL").ok();
        Self::new(&api_key, base_url.as_deref(), model.as_deref())
    }

    /// Generates five care instructions for a pet. Any failure (transport,
    /// HTTP status, malformed body) yields the fixed two-item fallback.
    pub async fn generate_sops(
        &self,
        species: &str,
        breed: &str,
        age: u32,
        personality: &str,
    ) -> Vec<SopItem> {
        let prompt = format!(
            "Generate a list of 5 essential care instructions (Standard Operating Procedures) \
             for a {age}-year-old {breed} {species} with a {personality} personality. \
             Focus on feeding, activity, and safety. Keep instructions concise."
        );

        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING", "description": "Short title of the instruction" },
                    "instruction": { "type": "STRING", "description": "The detailed instruction" }
                },
                "required": ["title", "instruction"]
            }
        });

        match self.generate(&prompt, Some(schema)).await {
            Ok(text) => sops_from_response(&text, chrono::Utc::now().timestamp_millis()),
            Err(e) => {
                warn!("SOP generation failed, using fallback: {}", e);
                fallback_sops()
            }
        }
    }

    /// Summarizes a booking's chat transcript into prose.
    pub async fn summarize_chat(&self, messages: &[Message]) -> String {
        if messages.is_empty() {
            return SUMMARY_EMPTY.to_string();
        }

        let transcript = messages
            .iter()
            .map(|m| format!("User {}: {}", m.sender_id, m.text))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Summarize the following conversation between a pet owner and a pet sitter. \
             Highlight any agreed-upon times or specific care requirements.\n\n{transcript}"
        );

        match self.generate(&prompt, None).await {
            Ok(text) if text.is_empty() => SUMMARY_BLANK_RESPONSE.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!("Chat summary failed, using fallback: {}", e);
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    /// One short safety tip for whoever is handling the pet.
    pub async fn safety_tip(&self, pet: &Pet, role: UserRole) -> String {
        let role_label = match role {
            UserRole::Owner => "OWNER",
            UserRole::Lover => "LOVER",
        };
        let prompt = format!(
            "Provide a single, short, crucial safety tip for a {role_label} dealing with a {} {}. Max 20 words.",
            pet.breed, pet.species
        );

        match self.generate(&prompt, None).await {
            Ok(text) if text.is_empty() => TIP_BLANK_RESPONSE.to_string(),
            Ok(text) => text,
            Err(_) => TIP_FALLBACK.to_string(),
        }
    }

    /// Single `generateContent` round trip. Returns the concatenated text
    /// parts of the first candidate.
    async fn generate(&self, prompt: &str, response_schema: Option<Value>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        if let Some(schema) = response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            });
        }

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("endpoint returned {}: {}", status, text));
        }

        let value: Value = resp.json().await?;
        Ok(extract_text(&value))
    }
}

/// Concatenate the text parts of the first candidate; missing pieces
/// collapse to an empty string, which callers treat as a blank response.
fn extract_text(value: &Value) -> String {
    value["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Blank text from a successful call is an empty list (the model answered
/// with nothing usable); the fallback is reserved for failed calls and
/// malformed bodies.
fn sops_from_response(text: &str, now_ms: i64) -> Vec<SopItem> {
    if text.is_empty() {
        return vec![];
    }
    match parse_sop_items(text, now_ms) {
        Ok(items) => items,
        Err(e) => {
            warn!("SOP response did not parse, using fallback: {}", e);
            fallback_sops()
        }
    }
}

/// Parse the structured-output JSON array into SOP items with fresh ids.
fn parse_sop_items(text: &str, now_ms: i64) -> Result<Vec<SopItem>> {
    let parsed: Vec<Value> = serde_json::from_str(text)?;

    parsed
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let title = item["title"]
                .as_str()
                .ok_or_else(|| anyhow!("item {} missing title", index))?;
            let instruction = item["instruction"]
                .as_str()
                .ok_or_else(|| anyhow!("item {} missing instruction", index))?;
            Ok(SopItem {
                id: format!("sop-{}-{}", now_ms, index),
                title: title.to_string(),
                instruction: instruction.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unroutable endpoint: every request fails fast with a transport error.
    fn unreachable_client() -> AssistClient {
        AssistClient::new("test-key", Some("http://127.0.0.1:9"), None).unwrap()
    }

    fn test_message(text: &str) -> Message {
        Message {
            id: "m1".into(),
            booking_id: "b1".into(),
            sender_id: "lover1".into(),
            text: text.into(),
            timestamp: 0,
        }
    }

    #[test]
    fn parses_structured_sop_response() {
        let text = r#"[
            {"title": "Feeding", "instruction": "Twice a day."},
            {"title": "Walks", "instruction": "Morning and evening."}
        ]"#;
        let items = parse_sop_items(text, 1000).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "sop-1000-0");
        assert_eq!(items[0].title, "Feeding");
        assert_eq!(items[1].instruction, "Morning and evening.");
    }

    #[test]
    fn rejects_malformed_sop_response() {
        assert!(parse_sop_items("not json", 0).is_err());
        assert!(parse_sop_items(r#"[{"title": "no instruction"}]"#, 0).is_err());
    }

    #[test]
    fn blank_response_is_empty_list_not_fallback() {
        assert!(sops_from_response("", 0).is_empty());
        // malformed text still falls back
        assert_eq!(sops_from_response("not json", 0), fallback_sops());
    }

    #[test]
    fn extracts_candidate_text() {
        let value = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] }
            }]
        });
        assert_eq!(extract_text(&value), "Hello world");
        assert_eq!(extract_text(&serde_json::json!({})), "");
    }

    #[tokio::test]
    async fn sop_generation_falls_back_deterministically() {
        let client = unreachable_client();
        let items = client.generate_sops("Dog", "Beagle", 3, "curious").await;
        assert_eq!(items, fallback_sops());
        // a second failure yields the identical list
        let again = client.generate_sops("Cat", "Siamese", 5, "vocal").await;
        assert_eq!(again, items);
    }

    #[tokio::test]
    async fn summary_fallbacks() {
        let client = unreachable_client();
        // empty transcript short-circuits without any request
        assert_eq!(client.summarize_chat(&[]).await, SUMMARY_EMPTY);
        assert_eq!(
            client.summarize_chat(&[test_message("hi")]).await,
            SUMMARY_FALLBACK
        );
    }

    #[tokio::test]
    async fn safety_tip_falls_back() {
        let client = unreachable_client();
        let pet = Pet {
            id: "pet1".into(),
            owner_id: "owner1".into(),
            name: "Bella".into(),
            species: "Dog".into(),
            breed: "Golden Retriever".into(),
            age: 3,
            description: String::new(),
            image_url: String::new(),
            sops: vec![],
        };
        assert_eq!(client.safety_tip(&pet, UserRole::Lover).await, TIP_FALLBACK);
    }
}
