//! Gemini API の送受信型
//!
//! CLI(reqwest)とWeb(fetch)で同じリクエスト本文とレスポンス解釈を使う

use crate::error::{AnalysisError, Result};
use crate::prompts::{response_schema, TRACK_PROMPT};
use crate::types::ImageUpload;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 1リクエストの上限（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// generateContentのURL
pub fn endpoint_url(base_url: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        base_url.trim_end_matches('/'),
        model,
        api_key
    )
}

/// 足跡解析リクエスト作成（画像 → 指示の順）
pub fn build_track_request(upload: &ImageUpload) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: upload.mime_type.clone(),
                        data: upload.encode_base64(),
                    },
                },
                Part::Text { text: TRACK_PROMPT.to_string() },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: None,
            response_mime_type: "application/json".to_string(),
            response_schema: response_schema(),
        },
    }
}

/// レスポンス本文から生成テキストを取り出す
///
/// 本文が空、candidatesなし、テキストが空白のみ → EmptyResponse
/// 本文がJSONでない → MalformedResponse
pub fn response_text(body: &str) -> Result<String> {
    if body.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let response: GeminiResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> ImageUpload {
        ImageUpload::new("track.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff])
    }

    #[test]
    fn test_endpoint_url() {
        let url = endpoint_url("https://example.com/v1beta/", "gemini-2.5-flash", "KEY");
        assert_eq!(url, "https://example.com/v1beta/models/gemini-2.5-flash:generateContent?key=KEY");
    }

    #[test]
    fn test_request_serialize() {
        let request = build_track_request(&upload());
        let json = serde_json::to_value(&request).expect("シリアライズ失敗");

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[0]["inline_data"]["data"], "/9j/");
        assert_eq!(parts[1]["text"], TRACK_PROMPT);

        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert!(config.get("temperature").is_none());
    }

    #[test]
    fn test_part_text_serialize() {
        let part = Part::Text { text: "Hello".to_string() };
        let json = serde_json::to_string(&part).expect("シリアライズ失敗");
        assert_eq!(json, r#"{"text":"Hello"}"#);
    }

    #[test]
    fn test_response_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#;
        assert_eq!(response_text(body).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_response_text_empty_body() {
        assert_eq!(response_text(""), Err(AnalysisError::EmptyResponse));
    }

    #[test]
    fn test_response_text_no_candidates() {
        assert_eq!(response_text(r#"{"candidates":[]}"#), Err(AnalysisError::EmptyResponse));
        assert_eq!(response_text("{}"), Err(AnalysisError::EmptyResponse));
    }

    #[test]
    fn test_response_text_blocked_candidate() {
        // セーフティでブロックされた場合はcontentが無い
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(response_text(body), Err(AnalysisError::EmptyResponse));
    }

    #[test]
    fn test_response_text_not_json() {
        assert!(matches!(
            response_text("<html>bad gateway</html>"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }
}
