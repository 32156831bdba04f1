//! セッション状態機械
//!
//! Idle → Loading → Result | Error の遷移と、プレビューハンドルの所有を管理する。
//!
//! | from | 操作 | to |
//! |---|---|---|
//! | Idle / Result / Error | `begin` | Loading |
//! | Loading | `complete(Ok)` | Result |
//! | Loading | `complete(Err)` | Error |
//! | Error | `dismiss_error` | Idle |
//! | Result | `reset` | Idle |
//!
//! Loading から Idle へ直接戻る遷移は無い。

use serde::Serialize;
use tracing::{debug, warn};

use crate::analyzer::TrackAnalyzer;
use crate::error::{AnalysisError, SessionError};
use crate::types::{ImageUpload, TrackAnalysis};

/// 解析失敗時に表示する固定メッセージ（原因によらず共通）
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze the image. Please try again with a clearer photo or check your internet connection.";

/// 送信画像のプレビュー資源（ブラウザのObject URL、CLIの一時ファイルなど）
///
/// `release`は値を消費するので二重解放は起きない。
pub trait PreviewHandle {
    /// 表示用の参照（URLまたはパス）
    fn uri(&self) -> String;

    /// 資源を解放
    fn release(self);
}

/// セッションのフェーズ（フィールドから導出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Loading,
    Result,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Result => "result",
            Phase::Error => "error",
        }
    }
}

/// 描画用のセッション状態
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub is_loading: bool,
    pub result: Option<TrackAnalysis>,
    pub error: Option<String>,
    pub image_preview: Option<String>,
}

/// 解析セッション
pub struct Session<P: PreviewHandle> {
    is_loading: bool,
    result: Option<TrackAnalysis>,
    error: Option<String>,
    preview: Option<P>,
}

impl<P: PreviewHandle> Default for Session<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PreviewHandle> Session<P> {
    pub fn new() -> Self {
        Self {
            is_loading: false,
            result: None,
            error: None,
            preview: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.result.is_some() {
            Phase::Result
        } else if self.error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn result(&self) -> Option<&TrackAnalysis> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preview(&self) -> Option<&P> {
        self.preview.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            is_loading: self.is_loading,
            result: self.result.clone(),
            error: self.error.clone(),
            image_preview: self.preview.as_ref().map(P::uri),
        }
    }

    /// ファイル選択: Loadingへ遷移し、プレビューを引き受ける
    ///
    /// 解析中に呼ばれた場合は`Busy`。渡されたプレビューはその場で解放する。
    pub fn begin(&mut self, preview: P) -> Result<(), SessionError> {
        if self.is_loading {
            preview.release();
            return Err(SessionError::Busy);
        }

        let from = self.phase();
        self.release_preview();
        self.result = None;
        self.error = None;
        self.is_loading = true;
        self.preview = Some(preview);
        debug!("session: {} -> loading", from.as_str());
        Ok(())
    }

    /// 解析完了: 成功ならResult、失敗ならError（プレビューは保持）
    pub fn complete(
        &mut self,
        outcome: Result<TrackAnalysis, AnalysisError>,
    ) -> Result<Phase, SessionError> {
        if !self.is_loading {
            return Err(SessionError::NotLoading);
        }

        self.is_loading = false;
        match outcome {
            Ok(analysis) => {
                debug!("session: loading -> result ({})", analysis.animal_name);
                self.result = Some(analysis);
            }
            Err(err) => {
                warn!("analysis failed: {}", err);
                self.error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
            }
        }
        Ok(self.phase())
    }

    /// エラーを閉じてIdleへ
    pub fn dismiss_error(&mut self) -> Result<(), SessionError> {
        match self.phase() {
            Phase::Idle => Ok(()),
            Phase::Error => {
                self.error = None;
                self.release_preview();
                debug!("session: error -> idle");
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition {
                phase: phase.as_str(),
                action: "dismiss the error",
            }),
        }
    }

    /// 結果を破棄してIdleへ
    pub fn reset(&mut self) -> Result<(), SessionError> {
        match self.phase() {
            Phase::Idle => Ok(()),
            Phase::Result => {
                self.result = None;
                self.release_preview();
                debug!("session: result -> idle");
                Ok(())
            }
            phase => Err(SessionError::InvalidTransition {
                phase: phase.as_str(),
                action: "reset",
            }),
        }
    }

    /// begin → analyze → complete を一括実行
    ///
    /// `&mut self`を保持したまま待つので、同時に走る解析は1件だけ。
    pub async fn submit<A>(
        &mut self,
        upload: &ImageUpload,
        preview: P,
        analyzer: &A,
    ) -> Result<Phase, SessionError>
    where
        A: TrackAnalyzer + ?Sized,
    {
        self.begin(preview)?;
        let outcome = analyzer.analyze(upload).await;
        self.complete(outcome)
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            preview.release();
        }
    }
}

impl<P: PreviewHandle> Drop for Session<P> {
    fn drop(&mut self) {
        self.release_preview();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 解放されたプレビュー名を記録する
    #[derive(Clone, Default)]
    struct ReleaseLog(Rc<RefCell<Vec<String>>>);

    impl ReleaseLog {
        fn preview(&self, name: &str) -> TestPreview {
            TestPreview { name: name.to_string(), log: self.clone() }
        }

        fn released(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    struct TestPreview {
        name: String,
        log: ReleaseLog,
    }

    impl PreviewHandle for TestPreview {
        fn uri(&self) -> String {
            format!("blob:{}", self.name)
        }

        fn release(self) {
            self.log.0.borrow_mut().push(self.name);
        }
    }

    struct FixedAnalyzer(Result<TrackAnalysis, AnalysisError>);

    #[async_trait(?Send)]
    impl TrackAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _upload: &ImageUpload) -> crate::error::Result<TrackAnalysis> {
            self.0.clone()
        }
    }

    fn wolf() -> TrackAnalysis {
        TrackAnalysis {
            animal_name: "Gray Wolf".to_string(),
            scientific_name: "Canis lupus".to_string(),
            confidence: Confidence::High,
            characteristics: vec!["four toes".to_string(), "claw marks".to_string()],
            habitat: "Forests and tundra".to_string(),
            habitat_region: "Yellowstone".to_string(),
            behavior_note: "Travels in packs".to_string(),
            safety_tip: "Do not approach; make noise to avoid surprise encounters.".to_string(),
        }
    }

    fn upload() -> ImageUpload {
        ImageUpload::new("a.jpg", "image/jpeg", vec![1, 2, 3])
    }

    #[test]
    fn test_new_session_is_idle() {
        let session: Session<TestPreview> = Session::new();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert!(!snapshot.is_loading);
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_none());
        assert!(snapshot.image_preview.is_none());
    }

    #[test]
    fn test_begin_enters_loading() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();

        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.snapshot().image_preview.as_deref(), Some("blob:a"));
        assert!(log.released().is_empty());
    }

    #[test]
    fn test_success_then_reset_releases_once() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();

        assert_eq!(session.complete(Ok(wolf())).unwrap(), Phase::Result);
        assert_eq!(session.result(), Some(&wolf()));
        assert!(session.error().is_none());

        session.reset().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.result().is_none());
        assert!(session.preview().is_none());
        assert_eq!(log.released(), vec!["a"]);

        drop(session);
        assert_eq!(log.released(), vec!["a"]);
    }

    #[test]
    fn test_failure_keeps_preview_and_uses_fixed_message() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();

        let phase = session
            .complete(Err(AnalysisError::MalformedResponse("missing field".into())))
            .unwrap();
        assert_eq!(phase, Phase::Error);
        assert_eq!(session.error(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(session.result().is_none());
        assert!(session.preview().is_some());
        assert!(log.released().is_empty());
    }

    #[test]
    fn test_every_failure_cause_yields_same_message() {
        let causes = vec![
            AnalysisError::EmptyResponse,
            AnalysisError::MalformedResponse("x".into()),
            AnalysisError::Transport("timeout".into()),
        ];
        for cause in causes {
            let log = ReleaseLog::default();
            let mut session = Session::new();
            session.begin(log.preview("a")).unwrap();
            session.complete(Err(cause)).unwrap();
            assert_eq!(session.error(), Some(ANALYSIS_FAILED_MESSAGE));
        }
    }

    #[test]
    fn test_dismiss_error_releases_preview() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();
        session.complete(Err(AnalysisError::EmptyResponse)).unwrap();

        session.dismiss_error().unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.error().is_none());
        assert_eq!(log.released(), vec!["a"]);
    }

    #[test]
    fn test_reselect_from_result_supersedes_preview() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();
        session.complete(Ok(wolf())).unwrap();

        session.begin(log.preview("b")).unwrap();
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.result().is_none());
        assert_eq!(log.released(), vec!["a"]);
        assert_eq!(session.snapshot().image_preview.as_deref(), Some("blob:b"));
    }

    #[test]
    fn test_reselect_from_error_clears_error() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();
        session.complete(Err(AnalysisError::EmptyResponse)).unwrap();

        session.begin(log.preview("b")).unwrap();
        assert!(session.error().is_none());
        assert_eq!(log.released(), vec!["a"]);
    }

    #[test]
    fn test_begin_while_loading_is_busy() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();

        assert_eq!(session.begin(log.preview("b")), Err(SessionError::Busy));
        // 拒否されたプレビューだけ解放され、進行中のものは残る
        assert_eq!(log.released(), vec!["b"]);
        assert_eq!(session.snapshot().image_preview.as_deref(), Some("blob:a"));
        assert_eq!(session.phase(), Phase::Loading);
    }

    #[test]
    fn test_complete_outside_loading() {
        let mut session: Session<TestPreview> = Session::new();
        assert_eq!(session.complete(Ok(wolf())), Err(SessionError::NotLoading));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_no_transition_from_loading_to_idle() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();

        assert!(matches!(session.reset(), Err(SessionError::InvalidTransition { .. })));
        assert!(matches!(session.dismiss_error(), Err(SessionError::InvalidTransition { .. })));
        assert_eq!(session.phase(), Phase::Loading);
        assert!(log.released().is_empty());
    }

    #[test]
    fn test_reset_and_dismiss_are_noops_when_idle() {
        let mut session: Session<TestPreview> = Session::new();
        assert!(session.reset().is_ok());
        assert!(session.dismiss_error().is_ok());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_from_error_is_rejected() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();
        session.complete(Err(AnalysisError::EmptyResponse)).unwrap();

        assert!(matches!(session.reset(), Err(SessionError::InvalidTransition { .. })));
        assert_eq!(session.phase(), Phase::Error);
    }

    #[test]
    fn test_drop_releases_held_preview() {
        let log = ReleaseLog::default();
        {
            let mut session = Session::new();
            session.begin(log.preview("a")).unwrap();
            session.complete(Ok(wolf())).unwrap();
        }
        assert_eq!(log.released(), vec!["a"]);
    }

    #[test]
    fn test_submit_success() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        let analyzer = FixedAnalyzer(Ok(wolf()));

        let phase = block_on(session.submit(&upload(), log.preview("a"), &analyzer)).unwrap();
        assert_eq!(phase, Phase::Result);
        let result = session.result().unwrap();
        assert!(result.show_map());
        assert_eq!(result, &wolf());
    }

    #[test]
    fn test_submit_failure() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        let analyzer = FixedAnalyzer(Err(AnalysisError::EmptyResponse));

        let phase = block_on(session.submit(&upload(), log.preview("a"), &analyzer)).unwrap();
        assert_eq!(phase, Phase::Error);
        assert!(session.result().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_snapshot_serialize() {
        let log = ReleaseLog::default();
        let mut session = Session::new();
        session.begin(log.preview("a")).unwrap();
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"], "Loading");
        assert_eq!(json["isLoading"], true);
        assert_eq!(json["imagePreview"], "blob:a");
    }
}
