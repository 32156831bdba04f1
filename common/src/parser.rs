//! APIレスポンスパーサー
//!
//! モデルの出力テキストからJSONオブジェクトを抽出し、
//! TrackAnalysisとして厳密にパースする

use crate::error::{AnalysisError, Result};
use crate::types::TrackAnalysis;

/// レスポンスからJSON部分を抽出
///
/// ```json ... ``` で囲まれていれば中身、それ以外はテキスト全体。
/// 前後の説明文から {...} を拾い出すことはしない。
///
/// # Examples
/// ```
/// use track_scout_common::extract_json;
///
/// let response = "```json\n{\"animalName\": \"Red Fox\"}\n```";
/// assert_eq!(extract_json(response), "{\"animalName\": \"Red Fox\"}");
/// ```
pub fn extract_json(response: &str) -> &str {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            return response[start..start + end_offset].trim();
        }
    }

    response.trim()
}

/// 解析レスポンスをパース
///
/// # Returns
/// * `Ok(TrackAnalysis)` - 値は加工せずそのまま返す
/// * `Err(EmptyResponse)` - テキストが空
/// * `Err(MalformedResponse)` - JSON不正、必須フィールド欠落、enum外の値、animalNameが空
pub fn parse_track_analysis(response: &str) -> Result<TrackAnalysis> {
    if response.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let json_str = extract_json(response);
    let analysis: TrackAnalysis = serde_json::from_str(json_str)?;

    if analysis.animal_name.trim().is_empty() {
        return Err(AnalysisError::MalformedResponse("animalName is empty".into()));
    }

    Ok(analysis)
}
