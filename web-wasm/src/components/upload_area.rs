//! アップロードエリアコンポーネント
//!
//! クリックまたはドラッグ&ドロップで画像を1枚選ぶ。解析中とAPIキー未入力時は無効。

use leptos::html;
use leptos::prelude::*;
use web_sys::{DragEvent, File, FileList, HtmlInputElement};

/// 受け付けるMIMEタイプ（image/*）
pub fn accepts(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

fn first_image(files: &FileList) -> Option<File> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .find(|file| accepts(&file.type_()))
}

#[component]
pub fn UploadArea<F>(
    enabled: Signal<bool>,
    is_loading: Signal<bool>,
    on_file_selected: F,
) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    let on_drop = {
        let on_file_selected = on_file_selected.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            if !enabled.get_untracked() {
                return;
            }

            if let Some(file) = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| first_image(&files))
            {
                on_file_selected(file);
            }
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        if enabled.get_untracked() {
            set_is_dragover.set(true);
        }
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if !enabled.get_untracked() {
            return;
        }
        // ファイル選択ダイアログを開く
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| first_image(&files)) {
            on_file_selected(file);
        }
        // 同じファイルを選び直せるようにする
        input.set_value("");
    };

    view! {
        <div class="upload-wrapper">
            <div
                class=move || {
                    let mut classes = vec!["upload-area"];
                    if is_dragover.get() {
                        classes.push("dragover");
                    }
                    if !enabled.get() {
                        classes.push("disabled");
                    }
                    classes.join(" ")
                }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:click=on_click
            >
                {move || {
                    if is_loading.get() {
                        view! {
                            <div class="upload-content">
                                <div class="spinner"></div>
                                <p>"Analyzing track..."</p>
                            </div>
                        }
                        .into_any()
                    } else if enabled.get() {
                        view! {
                            <div class="upload-content">
                                <div class="upload-icon">"📷"</div>
                                <p>"Drop a track photo here or click to select"</p>
                                <p class="text-muted">"Any image format (JPEG, PNG, WebP, ...)"</p>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="upload-content">
                                <div class="upload-icon">"🔑"</div>
                                <p>"Enter your Gemini API key to start"</p>
                            </div>
                        }
                        .into_any()
                    }
                }}
            </div>
            <input
                type="file"
                accept="image/*"
                class="hidden"
                node_ref=input_ref
                on:change=on_change
            />
        </div>
    }
}
