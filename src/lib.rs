//! Track Scout CLI
//!
//! 足跡写真をGeminiで識別する。状態機械と契約は track_scout_common にある。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod preview;
pub mod render;
pub mod upload;
