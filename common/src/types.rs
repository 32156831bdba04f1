//! 型定義
//!
//! 解析結果（TrackAnalysis）と送信画像（ImageUpload）

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 特定地域なしを示すhabitatRegionの値
pub const GLOBAL_REGION: &str = "Global";

/// 識別できなかったことを示すanimalNameの値
pub const UNKNOWN_ANIMAL: &str = "Unknown";

/// 結果表示に添える注意書き
pub const DISCLAIMER: &str = "Note: AI identification is not 100% accurate. Always exercise caution around wild animals and do not rely solely on this tool for safety.";

const MAP_EMBED_URL: &str = "https://maps.google.com/maps";

/// 識別の確信度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 足跡解析結果
///
/// 全フィールド必須。欠けていればレスポンス不正として扱う（serde defaultは付けない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackAnalysis {
    pub animal_name: String,          // 一般名（"Unknown" = 識別不能）
    pub scientific_name: String,      // 学名
    pub confidence: Confidence,       // 確信度
    pub characteristics: Vec<String>, // 足跡の視覚的特徴
    pub habitat: String,              // 生息環境
    pub habitat_region: String,       // 地図検索用の地域名（"Global" = 地域なし）
    pub behavior_note: String,        // 行動メモ
    pub safety_tip: String,           // 安全上の注意
}

impl TrackAnalysis {
    /// 識別できなかった結果か（エラーではない）
    pub fn is_unknown(&self) -> bool {
        self.animal_name.to_lowercase().contains("unknown")
    }

    /// 生息地マップを表示するか
    pub fn show_map(&self) -> bool {
        !self.habitat_region.trim().is_empty()
            && self.habitat_region != GLOBAL_REGION
            && !self.is_unknown()
    }

    /// 安全アドバイスを表示するか
    pub fn show_safety_tip(&self) -> bool {
        !self.safety_tip.trim().is_empty() && !self.is_unknown()
    }

    /// 生息地マップの埋め込みURL（表示しない場合はNone）
    pub fn map_embed_url(&self) -> Option<String> {
        if !self.show_map() {
            return None;
        }
        Some(format!(
            "{}?q={}&t=p&z=4&ie=UTF8&iwloc=&output=embed",
            MAP_EMBED_URL,
            urlencoding::encode(&self.habitat_region)
        ))
    }

    pub fn headline(&self) -> &'static str {
        if self.is_unknown() {
            "Analysis Result"
        } else {
            "Match Found"
        }
    }
}

/// 解析に送る画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// inline_data用のBase64文字列
    pub fn encode_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}
