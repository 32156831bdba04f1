//! 画像ファイル読み込み
//!
//! ファイルを読み、MIMEタイプを判定してImageUploadにする。
//! 形式の検証はしない（image/*であることだけ確認する）。

use crate::error::{Result, TrackScoutError};
use std::path::Path;
use track_scout_common::ImageUpload;

pub fn load_image(path: &Path) -> Result<ImageUpload> {
    if !path.is_file() {
        return Err(TrackScoutError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| TrackScoutError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let mime_type = detect_mime_type(path, &bytes)
        .ok_or_else(|| TrackScoutError::UnsupportedImage(path.display().to_string()))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImageUpload::new(file_name, mime_type, bytes))
}

/// 内容から判定し、だめなら拡張子から判定する
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> Option<String> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type().to_string());
    }

    mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
}
