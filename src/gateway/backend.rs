//! The generative service seam and its Gemini implementation

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use serde_json::json;

use super::error::GatewayError;
use crate::audio::PcmAudio;
use crate::config::GatewayConfig;

/// A generated image, carried as a `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn from_base64(mime_type: &str, data: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, data))
    }

    pub fn from_data_url(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.0.strip_prefix("data:")?.split(';').next()
    }

    /// Decode the embedded bytes
    pub fn decode(&self) -> Result<Vec<u8>, GatewayError> {
        let payload = self.0.split_once(',').map(|(_, data)| data).unwrap_or("");
        Ok(BASE64.decode(payload)?)
    }
}

/// Something that can turn prompts into images and text into speech.
///
/// `Ok(None)` means the service answered but produced nothing usable.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageRef>, GatewayError>;

    async fn generate_speech(&self, text: &str) -> Result<Option<PcmAudio>, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

impl GenerateContentResponse {
    /// First inline payload of the first candidate
    fn inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }

    fn into_image(self) -> Option<ImageRef> {
        self.inline_data().map(|inline| {
            let mime = if inline.mime_type.is_empty() {
                "image/png"
            } else {
                inline.mime_type.as_str()
            };
            ImageRef::from_base64(mime, &inline.data)
        })
    }

    fn into_speech(self) -> Result<Option<PcmAudio>, GatewayError> {
        match self.inline_data() {
            Some(inline) => Ok(Some(PcmAudio::new(BASE64.decode(&inline.data)?))),
            None => Ok(None),
        }
    }
}

/// Client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    image_model: String,
    speech_model: String,
    voice: String,
}

impl GeminiClient {
    /// Build a client, reading the API key from the configured environment variable
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key,
            image_model: config.image_model.clone(),
            speech_model: config.speech_model.clone(),
            voice: config.voice.clone(),
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<GenerateContentResponse, GatewayError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::from_response(status.as_u16(), &text));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageRef>, GatewayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "imageConfig": { "aspectRatio": "1:1" } },
        });
        let response = self.generate_content(&self.image_model, body).await?;
        Ok(response.into_image())
    }

    async fn generate_speech(&self, text: &str) -> Result<Option<PcmAudio>, GatewayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": format!("Say: {}", text) }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": self.voice } }
                },
            },
        });
        let response = self.generate_content(&self.speech_model, body).await?;
        response.into_speech()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_image_from_response() {
        let response = parse(
            r#"{"candidates": [{"content": {"parts": [
                {"text": "here you go"},
                {"inlineData": {"mimeType": "image/png", "data": "iVBORw0K"}}
            ]}}]}"#,
        );

        let image = response.into_image().unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,iVBORw0K");
        assert_eq!(image.mime_type(), Some("image/png"));
    }

    #[test]
    fn test_empty_response_is_absent() {
        assert!(parse(r#"{"candidates": []}"#).into_image().is_none());
        assert!(parse(r#"{}"#).into_image().is_none());
        assert!(parse(r#"{"candidates": [{"content": {"parts": [{"text": "no"}]}}]}"#)
            .into_speech()
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_speech_from_response() {
        let data = BASE64.encode([0x00u8, 0x40, 0x00, 0xc0]);
        let json = format!(
            r#"{{"candidates": [{{"content": {{"parts": [{{"inlineData": {{"mimeType": "audio/L16;rate=24000", "data": "{}"}}}}]}}}}]}}"#,
            data
        );

        let audio = parse(&json).into_speech().unwrap().unwrap();
        assert_eq!(audio.samples(), vec![0.5, -0.5]);
    }

    #[test]
    fn test_image_ref_decode() {
        let image = ImageRef::from_base64("image/png", &BASE64.encode(b"png!"));
        assert_eq!(image.decode().unwrap(), b"png!");

        let broken = ImageRef::from_data_url("data:image/png;base64,@@@".to_string());
        assert!(matches!(broken.decode(), Err(GatewayError::Decode(_))));
    }
}
