//! Gemini API連携（reqwest）
//!
//! 1画像につき1リクエスト。リトライはしない（再送は利用者の操作）。

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use track_scout_common::{
    build_track_request, endpoint_url, parse_track_analysis, response_text,
    AnalysisError, ImageUpload, TrackAnalysis, TrackAnalyzer,
};

/// 解析クライアント設定（Configから生成して注入する）
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

pub struct GeminiClient {
    http: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AnalysisError::Transport(format!("HTTPクライアント初期化失敗: {}", e)))?;
        Ok(Self { http, settings })
    }

    /// Gemini API呼び出し（レスポンス本文を返す）
    async fn call_gemini_api(&self, upload: &ImageUpload) -> Result<String, AnalysisError> {
        let url = endpoint_url(&self.settings.base_url, &self.settings.model, &self.settings.api_key);
        let request = build_track_request(upload);

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(describe)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(AnalysisError::Transport(format!("API error: {} {}", status, preview)));
        }

        response
            .text()
            .await
            .map_err(describe)
    }
}

#[async_trait(?Send)]
impl TrackAnalyzer for GeminiClient {
    async fn analyze(&self, upload: &ImageUpload) -> Result<TrackAnalysis, AnalysisError> {
        debug!(
            "analyze: {} ({}, {} bytes) model={}",
            upload.file_name,
            upload.mime_type,
            upload.bytes.len(),
            self.settings.model
        );

        let body = self.call_gemini_api(upload).await?;
        debug!("response: {} bytes", body.len());

        let text = response_text(&body)?;
        parse_track_analysis(&text)
    }
}

/// reqwestエラーを変換（URLにAPIキーが含まれるので落とす）
fn describe(err: reqwest::Error) -> AnalysisError {
    let err = err.without_url();
    let message = if err.is_timeout() {
        format!("timeout: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };
    AnalysisError::Transport(message)
}
