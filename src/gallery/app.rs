/// Wedding album window
use std::path::{Path, PathBuf};

use iced::widget::image::Handle;
use iced::{keyboard, time, Element, Subscription, Task, Theme};
use tracing::info;

use super::controller::{Effect, GalleryController};
use super::model::Photo;
use super::view;
use crate::config::GalleryConfig;
use crate::error::AppError;
use crate::gateway::{ImageHost, SheetClient, WriteAck};

/// Longest edge of the upload preview
const PREVIEW_EDGE: u32 = 480;
const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "heic"];

pub struct Album {
    controller: GalleryController,
    sheet: SheetClient,
    host: ImageHost,
    config: GalleryConfig,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    PhotosLoaded(Result<Vec<Photo>, AppError>),
    ImageLoaded(String, Result<Handle, AppError>),
    OpenLightbox(String),
    CloseLightbox,
    OpenUpload,
    CloseUpload,
    PickFile,
    FilePicked(Option<PathBuf>),
    PreviewLoaded(PathBuf, Result<Handle, AppError>),
    SubmitUpload,
    Uploaded(Result<String, AppError>),
    Recorded(Result<WriteAck, AppError>),
    CloseDue,
    Escape,
}

impl Album {
    pub fn new(config: GalleryConfig) -> (Self, Task<Message>) {
        info!(
            endpoint = %config.script_url,
            every = ?config.poll_interval(),
            "starting album"
        );

        let mut app = Album {
            controller: GalleryController::new(config.clone()),
            sheet: SheetClient::new(&config.script_url),
            host: ImageHost::new(&config),
            config,
        };

        let effects = app.controller.start();
        let task = app.run(effects);
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let controller = &mut self.controller;

        let effects = match message {
            Message::Tick => controller.poll_tick(),
            Message::PhotosLoaded(result) => controller.photos_loaded(result),
            Message::ImageLoaded(url, result) => {
                controller.image_loaded(url, result);
                Vec::new()
            }
            Message::OpenLightbox(url) => controller.open_lightbox(url),
            Message::CloseLightbox => {
                controller.close_lightbox();
                Vec::new()
            }
            Message::OpenUpload => {
                controller.open_upload();
                Vec::new()
            }
            Message::CloseUpload => {
                controller.close_upload();
                Vec::new()
            }
            Message::PickFile => controller.pick_file(),
            Message::FilePicked(path) => controller.file_picked(path),
            Message::PreviewLoaded(path, result) => {
                controller.preview_loaded(path, result);
                Vec::new()
            }
            Message::SubmitUpload => controller.submit_upload(),
            Message::Uploaded(result) => controller.uploaded(result),
            Message::Recorded(result) => controller.recorded(result),
            Message::CloseDue => {
                controller.close_due();
                Vec::new()
            }
            Message::Escape => {
                controller.escape();
                Vec::new()
            }
        };

        self.run(effects)
    }

    pub fn view(&self) -> Element<Message> {
        view::view(&self.controller)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            time::every(self.config.poll_interval()).map(|_| Message::Tick),
            keyboard::on_key_press(|key, _modifiers| match key {
                keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::Escape),
                _ => None,
            }),
        ])
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn run(&mut self, effects: Vec<Effect>) -> Task<Message> {
        Task::batch(effects.into_iter().map(|effect| self.perform(effect)))
    }

    fn perform(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::FetchPhotos => {
                let sheet = self.sheet.clone();
                Task::perform(
                    async move { sheet.list_photos().await.map_err(AppError::from) },
                    Message::PhotosLoaded,
                )
            }
            Effect::LoadImages(urls) => Task::batch(urls.into_iter().map(|url| {
                let host = self.host.clone();
                let target = url.clone();
                Task::perform(
                    async move {
                        host.download(target)
                            .await
                            .map(Handle::from_bytes)
                            .map_err(AppError::from)
                    },
                    move |result| Message::ImageLoaded(url.clone(), result),
                )
            })),
            Effect::PickFile => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .set_title("Elige una foto")
                        .add_filter("Imágenes", &IMAGE_EXTENSIONS)
                        .pick_file()
                        .await
                        .map(|file| file.path().to_path_buf())
                },
                Message::FilePicked,
            ),
            Effect::LoadPreview(path) => {
                let source = path.clone();
                Task::perform(
                    async move {
                        tokio::task::spawn_blocking(move || decode_preview(&source))
                            .await
                            .map_err(|e| AppError::Io(format!("preview task failed: {}", e)))?
                    },
                    move |result| Message::PreviewLoaded(path.clone(), result),
                )
            }
            Effect::UploadImage(selection) => {
                let host = self.host.clone();
                Task::perform(
                    async move {
                        let bytes = tokio::fs::read(&selection.path).await.map_err(|e| {
                            AppError::Io(format!("{}: {}", selection.path.display(), e))
                        })?;
                        host.upload(selection.file_name, bytes)
                            .await
                            .map_err(AppError::from)
                    },
                    Message::Uploaded,
                )
            }
            Effect::RecordPhoto(url) => {
                let sheet = self.sheet.clone();
                Task::perform(
                    async move { sheet.add_photo(&url).await.map_err(AppError::from) },
                    Message::Recorded,
                )
            }
            Effect::CloseUploadAfter(after) => {
                Task::perform(tokio::time::sleep(after), |_| Message::CloseDue)
            }
        }
    }
}

/// Decode a local photo and shrink it for the upload dialog
fn decode_preview(path: &Path) -> Result<Handle, AppError> {
    let decoded = ::image::open(path)
        .map_err(|e| AppError::Io(format!("{}: {}", path.display(), e)))?;
    let rgba = decoded.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE).to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preview_shrinks_large_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grande.png");
        ::image::RgbaImage::from_pixel(1200, 600, ::image::Rgba([200, 50, 50, 255]))
            .save(&path)
            .unwrap();

        assert!(decode_preview(&path).is_ok());
    }

    #[test]
    fn test_decode_preview_reports_missing_file() {
        let err = decode_preview(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, AppError::Io(ref msg) if msg.contains("here.jpg")));
    }

    #[tokio::test]
    async fn test_preview_runs_on_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chica.png");
        ::image::RgbaImage::from_pixel(10, 10, ::image::Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let result = tokio::task::spawn_blocking(move || decode_preview(&path))
            .await
            .unwrap();
        assert!(result.is_ok());
    }
}
