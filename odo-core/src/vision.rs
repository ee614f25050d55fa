//! Vision-language model clients.
//!
//! One blocking, non-streaming request per call. No retries and no timeout
//! beyond the HTTP client's own defaults. The API key is sent in a header and
//! never written to logs.

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{OdoError, Result};
use crate::image::ImageInput;

/// Anything that can answer a text prompt about an image.
pub trait VisionModel {
    /// `Ok(None)` means the model replied without any text.
    fn generate(&self, prompt: &str, image: &ImageInput) -> Result<Option<String>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::OpenAi => "gpt-4o",
        }
    }

    pub fn default_api_base(self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::OpenAi => "https://api.openai.com",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        })
    }
}

impl FromStr for Provider {
    type Err = OdoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(OdoError::Config(format!("unknown provider: {other}"))),
        }
    }
}

pub struct VisionClient {
    provider: Provider,
    api_key: String,
    model: String,
    api_base: String,
    http: reqwest::blocking::Client,
}

impl fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionClient")
            .field("provider", &self.provider)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl VisionClient {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(OdoError::Config(format!("{provider} API key is empty")));
        }
        Ok(Self {
            provider,
            api_key,
            model: provider.default_model().to_string(),
            api_base: provider.default_api_base().to_string(),
            http: reqwest::blocking::Client::builder().build()?,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Swap in a preconfigured HTTP client (proxy, TLS roots, timeouts).
    pub fn with_http_client(mut self, http: reqwest::blocking::Client) -> Self {
        self.http = http;
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn post(&self, req: reqwest::blocking::RequestBuilder, body: &Value) -> Result<Value> {
        let resp = req.json(body).send()?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(OdoError::Model(format!(
                "{} returned {status}: {}",
                self.provider,
                text.trim()
            )));
        }
        resp.json::<Value>()
            .map_err(|e| OdoError::Model(format!("{} response decode: {e}", self.provider)))
    }
}

impl VisionModel for VisionClient {
    fn generate(&self, prompt: &str, image: &ImageInput) -> Result<Option<String>> {
        info!(
            provider = %self.provider,
            model = %self.model,
            bytes = image.bytes.len(),
            "vision: sending image"
        );
        match self.provider {
            Provider::Gemini => {
                let url = format!(
                    "{}/v1beta/models/{}:generateContent",
                    self.api_base, self.model
                );
                let req = self
                    .http
                    .post(url)
                    .header("x-goog-api-key", &self.api_key);
                let json = self.post(req, &gemini_body(prompt, image))?;
                Ok(gemini_text(&json))
            }
            Provider::OpenAi => {
                let url = format!("{}/v1/chat/completions", self.api_base);
                let req = self.http.post(url).bearer_auth(&self.api_key);
                let json = self.post(req, &openai_body(&self.model, prompt, image))?;
                Ok(openai_text(&json))
            }
        }
    }
}

pub(crate) fn gemini_body(prompt: &str, image: &ImageInput) -> Value {
    json!({
        "contents": [{ "parts": [
            { "text": prompt },
            { "inlineData": { "mimeType": image.mime_type, "data": STANDARD.encode(&image.bytes) } }
        ]}]
    })
}

/// Concatenated text of the first candidate's parts.
pub(crate) fn gemini_text(json: &Value) -> Option<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() { None } else { Some(text) }
}

pub(crate) fn openai_body(model: &str, prompt: &str, image: &ImageInput) -> Value {
    json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": prompt },
                { "type": "image_url",
                  "image_url": { "url": format!("data:{};base64,{}", image.mime_type, STANDARD.encode(&image.bytes)) } }
            ]
        }],
        "max_tokens": 64
    })
}

pub(crate) fn openai_text(json: &Value) -> Option<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImageInput {
        ImageInput {
            bytes: vec![1, 2, 3],
            mime_type: "image/png",
        }
    }

    #[test]
    fn gemini_body_inlines_base64_image() {
        let body = gemini_body("read it", &png());
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "read it");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
    }

    #[test]
    fn gemini_text_joins_parts() {
        let resp = json!({ "candidates": [{ "content": { "parts": [
            { "text": "Odometer: " }, { "text": "45,231" }
        ]}}]});
        assert_eq!(gemini_text(&resp).as_deref(), Some("Odometer: 45,231"));
    }

    #[test]
    fn gemini_blocked_prompt_has_no_text() {
        let resp = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert_eq!(gemini_text(&resp), None);
    }

    #[test]
    fn openai_body_uses_data_url() {
        let body = openai_body("gpt-4o", "read it", &png());
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(
            body["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AQID"
        );
    }

    #[test]
    fn openai_text_reads_first_choice() {
        let resp = json!({ "choices": [{ "message": { "content": "123456" } }] });
        assert_eq!(openai_text(&resp).as_deref(), Some("123456"));
        assert_eq!(openai_text(&json!({ "choices": [] })), None);
    }

    #[test]
    fn provider_parsing() {
        assert_eq!("Gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!(matches!("bard".parse::<Provider>(), Err(OdoError::Config(_))));
    }

    #[test]
    fn client_debug_hides_key() {
        let c = VisionClient::new(Provider::Gemini, "sk-secret-value").unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret-value"));
        assert!(dbg.contains("gemini-2.5-flash"));
    }

    #[test]
    fn empty_key_is_config_error() {
        assert!(matches!(
            VisionClient::new(Provider::OpenAi, "  "),
            Err(OdoError::Config(_))
        ));
    }
}
