// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the capture-adjust-save workflow
//!
//! This module provides command-line functionality for:
//! - Adjusting and saving an existing image (`edit`)
//! - Taking a photo through an external capture command (`capture`)
//! - Printing the lighting tints for a brightness level (`tints`)

use photo_express::app::SaveOutcome;
use photo_express::backends::camera::{CameraFacility, CommandCamera, FileImportCamera};
use photo_express::color::{LightingFilter, clamp_level};
use photo_express::storage::DirectoryMediaStore;
use photo_express::{AppModel, Config, Message, Notification};
use std::path::PathBuf;
use std::sync::Arc;

/// Options shared by the `edit` and `capture` commands
pub struct SessionOptions {
    pub brightness: i32,
    pub view: Option<(u32, u32)>,
    pub output_root: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

/// Parse a `WIDTHxHEIGHT` view size
pub fn parse_view_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{}'", width))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{}'", height))?;

    if width == 0 || height == 0 {
        return Err("view size must be non-zero".to_string());
    }
    Ok((width, height))
}

/// Import `input` as the captured photo, adjust and save it
pub fn edit_photo(
    input: PathBuf,
    options: SessionOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&options);
    println!("Importing {}...", input.display());
    run_session(Arc::new(FileImportCamera::new(input)), config, options)
}

/// Take a photo with an external capture command, adjust and save it
pub fn capture_photo(
    command: Option<String>,
    options: SessionOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&options);

    let command_line = command
        .or_else(|| config.capture_command.clone())
        .ok_or("No capture command given and none configured (capture_command)")?;
    let camera = CommandCamera::from_command_line(&command_line)?;

    println!("Capturing with {}...", camera.program());
    run_session(Arc::new(camera), config, options)
}

/// Print the tints the lighting filter uses for `level`
pub fn print_tints(level: i32) {
    let clamped = clamp_level(level);
    let filter = LightingFilter::from_brightness(level);

    if i32::from(clamped) != level {
        println!("Level {} clamped to {}", level, clamped);
    }
    println!("Level:    {}", clamped);
    println!("Multiply: {}", filter.multiply);
    println!("Add:      {}", filter.add);
}

fn load_config(options: &SessionOptions) -> Config {
    let mut config = match &options.config_path {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    };
    if let Some((width, height)) = options.view {
        config.preview_width = width;
        config.preview_height = height;
    }
    config
}

fn run_session(
    camera: Arc<dyn CameraFacility>,
    config: Config,
    options: SessionOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let media_store = match options.output_root.clone().or_else(|| config.media_root.clone()) {
        Some(root) => DirectoryMediaStore::new(root),
        None => DirectoryMediaStore::user_default(),
    };
    println!("Saving to {}", media_store.root().join("Pictures").display());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let mut app = AppModel::new(config, camera, Arc::new(media_store));

        app.dispatch(Message::CapturePhoto).await;
        let Some(preview) = app.preview.as_ref() else {
            return Err::<(), Box<dyn std::error::Error>>(
                "Capture failed or was cancelled, nothing to save".into(),
            );
        };

        println!(
            "Captured {}x{} (preview {}x{}, 1/{} scale)",
            preview.image.source_width,
            preview.image.source_height,
            preview.image.image.width(),
            preview.image.image.height(),
            preview.image.sample_factor,
        );

        app.dispatch(Message::BrightnessChanged(options.brightness)).await;
        println!(
            "Brightness {} (multiply {}, add {})",
            app.controls.slider_level, app.filter.multiply, app.filter.add
        );

        app.dispatch(Message::SavePhoto).await;

        for notification in app.take_notifications() {
            match notification {
                Notification::PhotoSaved => println!("Photo Saved"),
                Notification::SaveFailed(e) => eprintln!("Saving failed: {}", e),
            }
        }

        match &app.last_save_outcome {
            Some(SaveOutcome::Saved(location)) => println!("Location: {}", location),
            Some(SaveOutcome::Failed(e)) => tracing::debug!(error = %e, "Save outcome"),
            None => {}
        }

        Ok(())
    })
}
