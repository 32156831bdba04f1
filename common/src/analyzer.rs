//! 解析クライアントの契約
//!
//! 1回の呼び出しで1リクエスト。リトライ・フォールバック・キャッシュはしない。

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ImageUpload, TrackAnalysis};

/// 足跡画像の解析クライアント
///
/// CLIはreqwest、Webはfetchで実装する。WASMのFutureはSendでないため`?Send`。
#[async_trait(?Send)]
pub trait TrackAnalyzer {
    async fn analyze(&self, upload: &ImageUpload) -> Result<TrackAnalysis>;
}
