//! Track Scout Common Library
//!
//! CLIとWeb(WASM)で共有される型、Gemini契約、セッション状態機械

pub mod types;
pub mod error;
pub mod prompts;
pub mod gemini;
pub mod parser;
pub mod analyzer;
pub mod session;

pub use types::{
    Confidence, ImageUpload, TrackAnalysis, DISCLAIMER, GLOBAL_REGION, UNKNOWN_ANIMAL,
};
pub use error::{AnalysisError, Result, SessionError};
pub use prompts::{response_schema, CONFIDENCE_LEVELS, REQUIRED_FIELDS, TRACK_PROMPT};
pub use gemini::{build_track_request, endpoint_url, response_text, GeminiRequest};
pub use parser::{extract_json, parse_track_analysis};
pub use analyzer::TrackAnalyzer;
pub use session::{Phase, PreviewHandle, Session, SessionSnapshot, ANALYSIS_FAILED_MESSAGE};
