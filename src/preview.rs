//! CLI用プレビューハンドル
//!
//! 送信画像のサムネイルを一時ファイルに書き出す。解放時に削除。
//! デコードできない形式は元のバイト列をそのまま書く。

use crate::error::{Result, TrackScoutError};
use image::ImageFormat;
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;
use tracing::{debug, warn};
use track_scout_common::{ImageUpload, PreviewHandle};

const PREVIEW_SIZE: u32 = 512;
const PREFIX: &str = "track-scout-preview-";

#[derive(Debug)]
pub struct FilePreview {
    path: TempPath,
}

impl FilePreview {
    /// システムの一時ディレクトリに作成
    pub fn create(upload: &ImageUpload) -> Result<Self> {
        Self::create_in(upload, &std::env::temp_dir())
    }

    pub fn create_in(upload: &ImageUpload, dir: &Path) -> Result<Self> {
        let path = match image::load_from_memory(&upload.bytes) {
            Ok(img) => {
                let file = tempfile::Builder::new().prefix(PREFIX).suffix(".png").tempfile_in(dir)?;
                let path = file.into_temp_path();
                img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE)
                    .save_with_format(&path, ImageFormat::Png)
                    .map_err(|e| TrackScoutError::Preview(e.to_string()))?;
                path
            }
            Err(e) => {
                debug!("preview: {} をデコードできないため元データを使用 ({})", upload.file_name, e);
                let suffix = mime_guess::get_mime_extensions_str(&upload.mime_type)
                    .and_then(|exts| exts.first())
                    .map(|ext| format!(".{}", ext))
                    .unwrap_or_default();
                let mut file = tempfile::Builder::new()
                    .prefix(PREFIX)
                    .suffix(&suffix)
                    .tempfile_in(dir)?;
                file.write_all(&upload.bytes)?;
                file.into_temp_path()
            }
        };

        debug!("preview: {}", path.display());
        Ok(Self { path })
    }
}

impl PreviewHandle for FilePreview {
    fn uri(&self) -> String {
        self.path.display().to_string()
    }

    fn release(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            warn!("プレビュー削除失敗 {}: {}", shown, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    fn png_upload(width: u32, height: u32) -> ImageUpload {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 90, 60]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        ImageUpload::new("paw.png", "image/png", bytes)
    }

    #[test]
    fn test_thumbnail_written_and_released() {
        let preview = FilePreview::create(&png_upload(1024, 768)).unwrap();
        let path = PathBuf::from(preview.uri());
        assert!(path.exists());

        let thumb = image::open(&path).unwrap();
        assert!(thumb.width() <= PREVIEW_SIZE);
        assert!(thumb.height() <= PREVIEW_SIZE);

        preview.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_release_after_external_delete() {
        let preview = FilePreview::create(&png_upload(16, 16)).unwrap();
        let path = PathBuf::from(preview.uri());
        std::fs::remove_file(&path).unwrap();

        // 削除失敗はログのみ
        preview.release();
        assert!(!path.exists());
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let result = FilePreview::create_in(&png_upload(16, 16), &missing);
        assert!(matches!(result, Err(TrackScoutError::Io(_))));
    }

    #[test]
    fn test_undecodable_image_copied() {
        let upload = ImageUpload::new("paw.webp", "image/webp", b"opaque webp data".to_vec());
        let preview = FilePreview::create(&upload).unwrap();
        let path = PathBuf::from(preview.uri());

        assert_eq!(std::fs::read(&path).unwrap(), b"opaque webp data");
        preview.release();
        assert!(!path.exists());
    }
}
