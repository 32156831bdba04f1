//! エラー型定義
//!
//! 解析クライアントとセッション状態機械のエラー

use thiserror::Error;

/// 解析クライアントのエラー
///
/// 利用者に見せるメッセージは原因によらず一つ（[`crate::session::ANALYSIS_FAILED_MESSAGE`]）。
/// ここでの区別はログ用。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("empty response from the analysis service")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::MalformedResponse(err.to_string())
    }
}

/// セッション状態機械のエラー（定義されていない遷移）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("an analysis is already in progress")]
    Busy,

    #[error("no analysis is in progress")]
    NotLoading,

    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: &'static str, action: &'static str },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, AnalysisError>;
