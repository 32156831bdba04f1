//! Gemini API連携（fetch）
//!
//! リクエスト本文とレスポンス解釈はCLIと共通（track_scout_common::gemini）

use async_trait::async_trait;
use track_scout_common::{
    build_track_request, endpoint_url,
    gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS},
    parse_track_analysis, response_text, AnalysisError, GeminiRequest, ImageUpload,
    TrackAnalysis, TrackAnalyzer,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, DomException, File, Request, RequestInit, RequestMode, Response};

pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    timeout_ms: u32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: timeout_millis(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Gemini API呼び出し（レスポンス本文を返す）
    async fn call_gemini_api(&self, request: &GeminiRequest) -> Result<String, JsValue> {
        let url = endpoint_url(&self.base_url, &self.model, &self.api_key);
        let body = serde_json::to_string(request)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));
        // 期限切れでfetchはTimeoutErrorで失敗する
        opts.set_signal(Some(&AbortSignal::timeout_with_u32(self.timeout_ms)));

        let request = Request::new_with_str_and_init(&url, &opts)?;
        request.headers().set("Content-Type", "application/json")?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        if !resp.ok() {
            return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
        }

        let text = JsFuture::from(resp.text()?).await?;
        Ok(text.as_string().unwrap_or_default())
    }
}

#[async_trait(?Send)]
impl TrackAnalyzer for GeminiClient {
    async fn analyze(&self, upload: &ImageUpload) -> Result<TrackAnalysis, AnalysisError> {
        let request = build_track_request(upload);
        let body = self
            .call_gemini_api(&request)
            .await
            .map_err(|e| AnalysisError::Transport(js_error_message(&e)))?;

        let text = response_text(&body)?;
        parse_track_analysis(&text)
    }
}

/// 選択されたFileを読み込んでImageUploadにする
pub async fn read_upload(file: &File) -> Result<ImageUpload, AnalysisError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| AnalysisError::Transport(js_error_message(&e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ImageUpload::new(file.name(), file.type_(), bytes))
}

/// 秒をAbortSignal用のミリ秒に（u32で頭打ち）
fn timeout_millis(secs: u64) -> u32 {
    u32::try_from(secs.saturating_mul(1000)).unwrap_or(u32::MAX)
}

fn js_error_message(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        if exception.name() == "TimeoutError" {
            return format!("timeout: {}", exception.message());
        }
        return format!("{}: {}", exception.name(), exception.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_matches_cli() {
        assert_eq!(timeout_millis(DEFAULT_TIMEOUT_SECS), 60_000);
    }

    #[test]
    fn test_timeout_millis_saturates() {
        assert_eq!(timeout_millis(u64::MAX), u32::MAX);
        assert_eq!(timeout_millis(5_000_000), u32::MAX);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_abort_timeout_reads_as_timeout() {
        let exception =
            DomException::new_with_message_and_name("signal timed out", "TimeoutError").unwrap();
        let message = js_error_message(&exception.into());
        assert!(message.starts_with("timeout"), "{}", message);
    }

    #[wasm_bindgen_test]
    fn test_plain_string_error() {
        assert_eq!(js_error_message(&JsValue::from_str("API error: 503")), "API error: 503");
    }
}
