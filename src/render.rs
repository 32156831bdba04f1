//! 端末表示
//!
//! 解析結果カードとスピナー

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Duration;
use track_scout_common::{TrackAnalysis, DISCLAIMER};

/// 解析結果カード
///
/// 識別不能の場合は地図と安全アドバイスを出さない
pub struct AnalysisCard<'a> {
    pub result: &'a TrackAnalysis,
    pub image_preview: Option<&'a str>,
}

impl fmt::Display for AnalysisCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        writeln!(f, "🐾 {}", result.headline())?;
        if result.is_unknown() {
            writeln!(f, "   We couldn't confidently identify this track.")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", result.animal_name)?;
        if !result.scientific_name.trim().is_empty() {
            writeln!(f, "  {}", result.scientific_name)?;
        }
        writeln!(f, "  Confidence: {}", result.confidence)?;

        if !result.characteristics.is_empty() {
            writeln!(f, "\nVisual Identifiers")?;
            for item in &result.characteristics {
                writeln!(f, "  - {}", item)?;
            }
        }

        if !result.habitat.trim().is_empty() || result.show_map() {
            writeln!(f, "\nHabitat & Range")?;
            if !result.habitat.trim().is_empty() {
                writeln!(f, "  {}", result.habitat)?;
            }
            if let Some(url) = result.map_embed_url() {
                writeln!(f, "  Map ({}): {}", result.habitat_region, url)?;
            }
        }

        if !result.behavior_note.trim().is_empty() {
            writeln!(f, "\nBehavior Patterns")?;
            writeln!(f, "  {}", result.behavior_note)?;
        }

        if result.show_safety_tip() {
            writeln!(f, "\n⚠ Safety Advisory")?;
            writeln!(f, "  {}", result.safety_tip)?;
        }

        if let Some(path) = self.image_preview {
            writeln!(f, "\nImage: {}", path)?;
        }

        write!(f, "\n{}", DISCLAIMER)
    }
}

/// 解析結果を表示用テキストにする
pub fn render_analysis(result: &TrackAnalysis, image_preview: Option<&str>) -> String {
    AnalysisCard { result, image_preview }.to_string()
}

/// 解析中スピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
