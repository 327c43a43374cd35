//! Model backends
//!
//! [`ModelBackend`] is the seam between the assistant and the hosted model;
//! [`GeminiClient`] talks to the Gemini `generateContent` endpoint.

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::settings::AssistantSettings;
use crate::error::{LibroError, LibroResult};

/// Environment variables checked for the API key, in order
pub const API_KEY_VARS: [&str; 2] = ["LIBRO_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// An image attached to a request
#[derive(Debug, Clone)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    /// Read an image file; the MIME type comes from the extension
    pub fn from_path(path: &Path) -> LibroResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let mime_type = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "heic" => "image/heic",
            "gif" => "image/gif",
            _ => {
                return Err(LibroError::Validation(format!(
                    "Unsupported image type: {}",
                    path.display()
                )))
            }
        };
        let bytes = std::fs::read(path)
            .map_err(|e| LibroError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// One call to the model
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub system: String,
    pub prompt: String,
    pub image: Option<ImageData>,
    /// When set, the model must answer with JSON matching this schema
    pub response_schema: Option<Value>,
}

/// Something that turns a request into response text
pub trait ModelBackend {
    fn generate(&self, request: &GenerateRequest) -> LibroResult<String>;
}

// Wire format of generateContent

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Blocking client for the Gemini API
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(settings: &AssistantSettings, api_key: String) -> LibroResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LibroError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    /// Build a client with the key from the environment
    pub fn from_env(settings: &AssistantSettings) -> LibroResult<Self> {
        let api_key = api_key_from_env().ok_or_else(|| {
            LibroError::Config(format!(
                "No API key configured; set {} or {}",
                API_KEY_VARS[0], API_KEY_VARS[1]
            ))
        })?;
        Self::new(settings, api_key)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl ModelBackend for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> LibroResult<String> {
        let mut parts = vec![GeminiPart::Text {
            text: &request.prompt,
        }];
        if let Some(image) = &request.image {
            parts.push(GeminiPart::Inline {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.to_base64(),
                },
            });
        }

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user"),
                parts,
            }],
            system_instruction: (!request.system.is_empty()).then(|| GeminiContent {
                role: None,
                parts: vec![GeminiPart::Text {
                    text: &request.system,
                }],
            }),
            generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };

        tracing::debug!(model = %self.model, image = request.image.is_some(), "calling model");
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(LibroError::Http(format!("{}: {}", status, text)));
        }

        let parsed: GeminiResponse = response.json()?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LibroError::Http("Model returned no text".into()));
        }
        Ok(text)
    }
}

pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
}
