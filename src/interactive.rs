//! 対話式セッション
//!
//! 写真パスを入力 → 解析 → 結果/エラー表示 → 次へ/再試行 を繰り返す。
//! 状態はSessionが持ち、ここは入力と表示だけを担当する。

use crate::error::{Result, TrackScoutError};
use crate::preview::FilePreview;
use crate::render::{render_analysis, spinner};
use crate::upload::load_image;
use dialoguer::Input;
use std::path::{Path, PathBuf};
use tracing::warn;
use track_scout_common::{Phase, Session, TrackAnalyzer};

/// 対話アクション
#[derive(Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// 写真を選択して解析
    Select(PathBuf),
    /// 結果を破棄して次の足跡へ
    Reset,
    /// エラーを閉じてやり直す
    DismissError,
    /// 終了
    Quit,
    /// 入力を読み直す
    Retry,
}

/// 入力文字列をフェーズに応じたアクションに変換
pub fn parse_action(phase: Phase, input: &str) -> SessionAction {
    let trimmed = input.trim();

    if matches!(trimmed, "q" | "Q") {
        return SessionAction::Quit;
    }

    match phase {
        Phase::Idle if trimmed.is_empty() => SessionAction::Retry,
        Phase::Idle => SessionAction::Select(PathBuf::from(trimmed)),
        Phase::Result if matches!(trimmed, "" | "n" | "N") => SessionAction::Reset,
        Phase::Error if matches!(trimmed, "" | "r" | "R") => SessionAction::DismissError,
        _ => SessionAction::Retry,
    }
}

fn prompt_for(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "足跡写真のパス (q:終了)",
        Phase::Result => "n:次の足跡 q:終了",
        Phase::Error => "r:もう一度 q:終了",
        Phase::Loading => "",
    }
}

/// 写真を読み込み、プレビューを作って解析する
///
/// 読み込みとプレビュー作成の失敗ではセッションは変化しない
pub async fn analyze_path<A>(
    session: &mut Session<FilePreview>,
    path: &Path,
    preview_dir: &Path,
    analyzer: &A,
) -> Result<Phase>
where
    A: TrackAnalyzer + ?Sized,
{
    let upload = load_image(path)?;
    let preview = FilePreview::create_in(&upload, preview_dir)?;

    let pb = spinner(&format!("{} を解析中...", upload.file_name));
    let outcome = session.submit(&upload, preview, analyzer).await;
    pb.finish_and_clear();

    Ok(outcome?)
}

/// 1枚だけ解析して表示用テキストを返す（analyzeコマンド）
///
/// 表示後はIdleに戻してプレビューを解放する。失敗時は固定メッセージのみ。
pub async fn analyze_once<A>(
    path: &Path,
    preview_dir: &Path,
    analyzer: &A,
    json: bool,
) -> Result<String>
where
    A: TrackAnalyzer + ?Sized,
{
    let mut session: Session<FilePreview> = Session::new();

    match analyze_path(&mut session, path, preview_dir, analyzer).await? {
        Phase::Result => {
            let snapshot = session.snapshot();
            let output = match &snapshot.result {
                Some(result) if json => serde_json::to_string_pretty(result)?,
                Some(result) => render_analysis(result, snapshot.image_preview.as_deref()),
                None => String::new(),
            };
            session.reset()?;
            Ok(output)
        }
        _ => {
            let message = session.error().unwrap_or_default().to_string();
            session.dismiss_error()?;
            Err(TrackScoutError::AnalysisFailed(message))
        }
    }
}

/// 対話式セッションを実行
pub async fn run_interactive_session<A>(analyzer: &A) -> Result<()>
where
    A: TrackAnalyzer + ?Sized,
{
    let mut session: Session<FilePreview> = Session::new();
    let preview_dir = std::env::temp_dir();

    loop {
        let phase = session.phase();
        if phase == Phase::Loading {
            // submitは完了まで待つのでここには来ない
            warn!("session left in loading state");
            break;
        }

        let input: String = Input::new()
            .with_prompt(prompt_for(phase))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| TrackScoutError::Prompt(e.to_string()))?;

        match parse_action(phase, &input) {
            SessionAction::Quit => break,
            SessionAction::Retry => continue,
            SessionAction::Reset => session.reset()?,
            SessionAction::DismissError => session.dismiss_error()?,
            SessionAction::Select(path) => {
                match analyze_path(&mut session, &path, &preview_dir, analyzer).await {
                    Ok(Phase::Result) => {
                        let snapshot = session.snapshot();
                        if let Some(result) = &snapshot.result {
                            println!("{}", render_analysis(result, snapshot.image_preview.as_deref()));
                        }
                    }
                    Ok(_) => {
                        if let Some(message) = session.error() {
                            println!("✖ Analysis Error: {}", message);
                        }
                    }
                    // 読み込み・プレビュー失敗は入力し直せばよい
                    Err(e) => println!("✖ {}", e),
                }
            }
        }
    }

    Ok(())
}
