//! メインアプリケーションコンポーネント
//!
//! 1つの`Session`を保持し、スナップショットから再描画する

use leptos::prelude::*;
use track_scout_common::{Phase, Session, TrackAnalyzer, DISCLAIMER};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, File};

use crate::api::gemini::{read_upload, GeminiClient};
use crate::components::{
    analysis_view::AnalysisView, api_key_field::ApiKeyField, error_banner::ErrorBanner,
    header::Header, upload_area::UploadArea,
};
use crate::preview::ObjectUrlPreview;

fn log_warn(message: &str) {
    console::warn_1(&JsValue::from_str(message));
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (api_key, set_api_key) = signal(String::new());
    let session = RwSignal::new(Session::<ObjectUrlPreview>::new());

    let snapshot = Memo::new(move |_| session.with(|s| s.snapshot()));
    let is_loading = Signal::derive(move || snapshot.with(|s| s.is_loading));
    let enabled = Signal::derive(move || {
        !api_key.with(|key| key.trim().is_empty()) && !snapshot.with(|s| s.is_loading)
    });

    // ファイル選択 → begin → 解析 → complete
    let on_file_selected = move |file: File| {
        let key = api_key.get_untracked();
        if key.trim().is_empty() {
            return;
        }

        let preview = match ObjectUrlPreview::create(&file) {
            Ok(preview) => preview,
            Err(e) => {
                console::error_2(&JsValue::from_str("createObjectURL failed"), &e);
                return;
            }
        };

        match session.try_update(|s| s.begin(preview)) {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                log_warn(&e.to_string());
                return;
            }
            None => return,
        }

        spawn_local(async move {
            let outcome = match read_upload(&file).await {
                Ok(upload) => GeminiClient::new(key).analyze(&upload).await,
                Err(e) => Err(e),
            };

            if let Some(Err(e)) = session.try_update(|s| s.complete(outcome)) {
                log_warn(&e.to_string());
            }
        });
    };

    let on_reset = move |_: ()| {
        if let Some(Err(e)) = session.try_update(|s| s.reset()) {
            log_warn(&e.to_string());
        }
    };

    let on_dismiss = move |_: ()| {
        if let Some(Err(e)) = session.try_update(|s| s.dismiss_error()) {
            log_warn(&e.to_string());
        }
    };

    view! {
        <div class="container">
            <Header />

            <ApiKeyField api_key=api_key set_api_key=set_api_key />

            {move || {
                let snap = snapshot.get();
                match (snap.result, snap.error) {
                    (Some(result), _) => {
                        view! {
                            <AnalysisView
                                result=result
                                image_preview=snap.image_preview
                                on_reset=on_reset
                            />
                        }
                        .into_any()
                    }
                    (None, error) => {
                        let intro = (snap.phase == Phase::Idle).then(|| {
                            view! {
                                <div class="intro">
                                    <h2>"Identify Wildlife Tracks"</h2>
                                    <p>
                                        "Upload a photo of a footprint, paw print or trail. "
                                        "We'll identify the animal and tell you about its habits."
                                    </p>
                                </div>
                            }
                        });
                        let banner = error.map(|message| {
                            view! { <ErrorBanner message=message on_dismiss=on_dismiss /> }
                        });
                        let preview = snap
                            .image_preview
                            .filter(|_| snap.is_loading)
                            .map(|src| {
                                view! {
                                    <img src=src alt="Track being analyzed" class="track-image loading" />
                                }
                            });

                        view! {
                            <div class="upload-section">
                                {intro}
                                {banner}
                                {preview}
                                <UploadArea
                                    enabled=enabled
                                    is_loading=is_loading
                                    on_file_selected=on_file_selected
                                />
                            </div>
                        }
                        .into_any()
                    }
                }
            }}

            <footer class="footer">
                <p class="text-muted">{DISCLAIMER}</p>
            </footer>
        </div>
    }
}
