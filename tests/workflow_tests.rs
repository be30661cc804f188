// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end tests for the capture-adjust-save workflow

use futures::FutureExt;
use futures::future::BoxFuture;
use image::{Rgba, RgbaImage};
use photo_express::app::SaveOutcome;
use photo_express::backends::camera::{CameraFacility, FileImportCamera};
use photo_express::errors::StorageError;
use photo_express::storage::{DirectoryMediaStore, MediaHandle, MediaMetadata, MediaStore};
use photo_express::{AppModel, Config, Message, Notification, WorkflowState};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const SOURCE_COLOR: Rgba<u8> = Rgba([200, 120, 40, 255]);

struct BrokenMediaStore;

impl MediaStore for BrokenMediaStore {
    fn insert(&self, metadata: &MediaMetadata) -> Result<MediaHandle, StorageError> {
        Err(StorageError::InsertFailed(format!(
            "{}: catalog unavailable",
            metadata.display_name
        )))
    }

    fn open_writer(&self, handle: &MediaHandle) -> Result<Box<dyn Write + Send>, StorageError> {
        Err(StorageError::OpenFailed(handle.to_string()))
    }
}

/// Copies the source on the first request; later requests clobber their
/// destination and report failure
struct FlakyCamera {
    source: PathBuf,
    requests: AtomicUsize,
}

impl CameraFacility for FlakyCamera {
    fn request_capture(&self, destination: PathBuf) -> BoxFuture<'static, bool> {
        let first = self.requests.fetch_add(1, Ordering::SeqCst) == 0;
        let source = self.source.clone();

        async move {
            if first {
                std::fs::copy(&source, &destination).is_ok()
            } else {
                let _ = std::fs::write(&destination, b"");
                false
            }
        }
        .boxed()
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

fn write_source(dir: &Path) -> PathBuf {
    let source = dir.join("source.png");
    RgbaImage::from_pixel(64, 48, SOURCE_COLOR)
        .save(&source)
        .unwrap();
    source
}

fn config(dir: &Path) -> Config {
    Config {
        working_dir: Some(dir.join("private")),
        preview_width: 64,
        preview_height: 48,
        ..Config::default()
    }
}

fn model(dir: &Path, source: &Path, store: Arc<dyn MediaStore>) -> AppModel {
    AppModel::new(
        config(dir),
        Arc::new(FileImportCamera::new(source)),
        store,
    )
}

#[tokio::test]
async fn test_capture_shows_unmodified_preview() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let store = Arc::new(DirectoryMediaStore::new(dir.path().join("shared")));
    let mut app = model(dir.path(), &source, store);

    assert_eq!(app.state, WorkflowState::Idle);
    assert!(!app.controls.save_enabled);
    assert!(!app.controls.slider_visible);

    app.dispatch(Message::CapturePhoto).await;

    assert_eq!(app.state, WorkflowState::Previewing);
    assert!(app.controls.save_enabled);
    assert!(app.controls.slider_visible);
    assert_eq!(app.controls.slider_level, 100);

    let photo = app.photo_file.clone().unwrap();
    assert_eq!(photo.parent().unwrap(), dir.path().join("private"));
    assert_eq!(std::fs::read(&photo).unwrap(), std::fs::read(&source).unwrap());

    let preview = app.preview.as_ref().unwrap();
    assert_eq!(preview.image.sample_factor, 1);
    assert_eq!(
        preview.displayed(),
        RgbaImage::from_pixel(64, 48, SOURCE_COLOR)
    );
}

#[tokio::test]
async fn test_preview_is_bounded_by_view() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let mut config = config(dir.path());
    config.preview_width = 16;
    config.preview_height = 16;
    let mut app = AppModel::new(
        config,
        Arc::new(FileImportCamera::new(&source)),
        Arc::new(DirectoryMediaStore::new(dir.path().join("shared"))),
    );

    app.dispatch(Message::CapturePhoto).await;

    let preview = app.preview.as_ref().unwrap();
    // min(64 / 16, 48 / 16) = 3
    assert_eq!(preview.image.sample_factor, 3);
    assert_eq!(preview.image.image.dimensions(), (21, 16));
    assert_eq!((preview.image.source_width, preview.image.source_height), (64, 48));
}

#[tokio::test]
async fn test_adjust_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let shared = dir.path().join("shared");
    let mut app = model(
        dir.path(),
        &source,
        Arc::new(DirectoryMediaStore::new(&shared)),
    );

    app.dispatch(Message::CapturePhoto).await;
    app.dispatch(Message::BrightnessChanged(50)).await;

    // Only the display filter changes
    let preview = app.preview.as_ref().unwrap();
    assert_eq!(preview.image.image.get_pixel(0, 0), &SOURCE_COLOR);
    assert_eq!(preview.displayed().get_pixel(0, 0), &Rgba([100, 60, 20, 255]));

    let task = app.update(Message::SavePhoto);
    assert_eq!(app.state, WorkflowState::Saving);
    assert!(!app.controls.save_enabled);

    // A second save request while saving is ignored
    assert!(app.update(Message::SavePhoto).is_none());

    let finished = task.into_future().unwrap().await;
    let _ = app.update(finished);

    assert_eq!(app.state, WorkflowState::Previewing);
    assert!(app.controls.save_enabled);
    assert_eq!(app.take_notifications(), vec![Notification::PhotoSaved]);

    let Some(SaveOutcome::Saved(location)) = app.last_save_outcome.clone() else {
        panic!("expected a saved photo, got {:?}", app.last_save_outcome);
    };
    let location = PathBuf::from(location);
    assert_eq!(location.parent().unwrap(), shared.join("Pictures"));
    assert_eq!(
        location.file_name(),
        app.photo_file.as_ref().unwrap().file_name()
    );

    let saved = image::open(&location).unwrap().to_rgb8();
    assert_eq!(saved.dimensions(), (64, 48));
    let [r, g, b] = saved.get_pixel(32, 24).0;
    for (actual, expected) in [(r, 100u8), (g, 60), (b, 20)] {
        assert!(
            actual.abs_diff(expected) <= 3,
            "saved channel {} too far from {}",
            actual,
            expected
        );
    }

    // The working file keeps the unadjusted capture
    let photo = app.photo_file.clone().unwrap();
    assert_eq!(std::fs::read(&photo).unwrap(), std::fs::read(&source).unwrap());
}

#[tokio::test]
async fn test_failed_save_still_confirms() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let mut app = model(dir.path(), &source, Arc::new(BrokenMediaStore));

    app.dispatch(Message::CapturePhoto).await;
    app.dispatch(Message::SavePhoto).await;

    assert_eq!(app.notifications(), &[Notification::PhotoSaved]);
    assert!(matches!(app.last_save_outcome, Some(SaveOutcome::Failed(_))));
    assert!(app.controls.save_enabled);
    assert_eq!(app.state, WorkflowState::Previewing);
}

#[tokio::test]
async fn test_failed_capture_without_photo() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirectoryMediaStore::new(dir.path().join("shared")));
    let mut app = model(dir.path(), &dir.path().join("missing.png"), store);

    app.dispatch(Message::CapturePhoto).await;

    assert_eq!(app.state, WorkflowState::Idle);
    assert!(app.photo_file.is_none());
    assert!(app.preview.is_none());
    assert!(!app.controls.save_enabled);
    assert!(!app.controls.slider_visible);

    // Nothing to save
    app.dispatch(Message::SavePhoto).await;
    assert!(app.notifications().is_empty());
}

#[tokio::test]
async fn test_failed_recapture_keeps_previous_photo() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let store = Arc::new(DirectoryMediaStore::new(dir.path().join("shared")));
    let mut app = model(dir.path(), &source, store);

    app.dispatch(Message::CapturePhoto).await;
    app.dispatch(Message::BrightnessChanged(150)).await;
    let photo = app.photo_file.clone().unwrap();

    // Camera now fails
    std::fs::remove_file(&source).unwrap();
    app.dispatch(Message::CapturePhoto).await;

    assert_eq!(app.state, WorkflowState::Previewing);
    assert_eq!(app.photo_file, Some(photo));
    assert!(app.controls.save_enabled);
    assert_eq!(app.controls.slider_level, 150);
}

#[tokio::test]
async fn test_new_capture_resets_brightness() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let store = Arc::new(DirectoryMediaStore::new(dir.path().join("shared")));
    let mut app = model(dir.path(), &source, store);

    app.dispatch(Message::CapturePhoto).await;
    app.dispatch(Message::BrightnessChanged(180)).await;
    assert_eq!(app.controls.slider_level, 180);

    app.dispatch(Message::CapturePhoto).await;

    assert_eq!(app.controls.slider_level, 100);
    assert!(app.filter.is_neutral());
    assert!(app.preview.as_ref().unwrap().filter.is_neutral());
}

#[tokio::test]
async fn test_failed_recapture_leaves_original_intact() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path());
    let shared = dir.path().join("shared");
    let camera = FlakyCamera {
        source: source.clone(),
        requests: AtomicUsize::new(0),
    };
    let mut app = AppModel::new(
        config(dir.path()),
        Arc::new(camera),
        Arc::new(DirectoryMediaStore::new(&shared)),
    );

    app.dispatch(Message::CapturePhoto).await;
    let photo = app.photo_file.clone().unwrap();

    let task = app.update(Message::CapturePhoto);
    let retry = app.state.pending_destination().unwrap().clone();
    assert_ne!(retry, photo);

    let finished = task.into_future().unwrap().await;
    let _ = app.update(finished);

    assert_eq!(app.state, WorkflowState::Previewing);
    assert_eq!(app.photo_file, Some(photo.clone()));
    assert_eq!(std::fs::read(&photo).unwrap(), std::fs::read(&source).unwrap());

    app.dispatch(Message::SavePhoto).await;
    assert!(matches!(app.last_save_outcome, Some(SaveOutcome::Saved(_))));
}
