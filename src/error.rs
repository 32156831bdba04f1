use thiserror::Error;
use track_scout_common::{AnalysisError, SessionError};

#[derive(Error, Debug)]
pub enum TrackScoutError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`track-scout config --set-api-key YOUR_KEY` で設定するか GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("プレビュー作成エラー: {0}")]
    Preview(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("{0}")]
    AnalysisFailed(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackScoutError>;
