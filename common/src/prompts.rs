//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有される解析指示とレスポンススキーマ:
//! - TRACK_PROMPT: 足跡解析の固定指示
//! - CONFIDENCE_LEVELS: 確信度の列挙値
//! - response_schema: Gemini responseSchema

use serde_json::{json, Value};

/// 確信度の列挙値
pub const CONFIDENCE_LEVELS: &[&str] = &["High", "Medium", "Low"];

/// レスポンスの必須フィールド
pub const REQUIRED_FIELDS: &[&str] = &[
    "animalName",
    "scientificName",
    "confidence",
    "characteristics",
    "habitat",
    "habitatRegion",
    "behaviorNote",
    "safetyTip",
];

/// 足跡解析の固定指示
pub const TRACK_PROMPT: &str = r#"Analyze this image of an animal footprint/track.
Identify the animal most likely responsible for this track.
Provide the common name, scientific name, a confidence level (High, Medium, Low),
list specific visual characteristics of the print (toes, claws, pad shape, gait if visible),
the typical habitat for this animal, a brief behavioral note related to movement,
and a safety tip if encountering this animal.

Also identify a "habitatRegion" - a specific representative geographic region or major area where this animal is commonly found that would be suitable for a map search (e.g. "Rocky Mountains", "Everglades", "Siberia").

If the image does not appear to be an animal track, return "Unknown" for the animal name, "Global" for habitatRegion, and explanation in characteristics."#;

/// Gemini responseSchema生成
///
/// 8フィールドすべてrequired、confidenceは3値のenum、characteristicsは文字列配列
pub fn response_schema() -> Value {
    let string = || json!({ "type": "STRING" });

    json!({
        "type": "OBJECT",
        "properties": {
            "animalName": string(),
            "scientificName": string(),
            "confidence": { "type": "STRING", "enum": CONFIDENCE_LEVELS },
            "characteristics": { "type": "ARRAY", "items": string() },
            "habitat": string(),
            "habitatRegion": string(),
            "behaviorNote": string(),
            "safetyTip": string(),
        },
        "required": REQUIRED_FIELDS,
    })
}
