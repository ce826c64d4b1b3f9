/// Wedding album controller
///
/// Owns the photo feed, the image caches, the lightbox and the upload
/// dialog. Like the recipe controller it returns `Effect`s instead of doing
/// I/O itself.
///
/// Upload flow:
///
/// ```text
/// Idle ── submit ──> Uploading ── url ──> Saving ── recorded ──> Done ── delay ──> (dialog closed)
///              │              │                    │
///              └── no file: nothing   └── error ──> Failed <──┘  (retry = submit again)
/// ```
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use iced::widget::image;
use tracing::{debug, error, info, warn};

use super::model::Photo;
use super::poll::{PhotoFeed, PollOutcome};
use crate::config::GalleryConfig;
use crate::error::AppError;
use crate::gateway::WriteAck;

const LOADING_TEXT: &str = "Cargando fotos...";
const EMPTY_TEXT: &str = "Sé el primero en subir una foto...";
const PICK_PROMPT: &str = "Toca para Tomar Foto o Elegir de Galería";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadStage {
    #[default]
    Idle,
    Uploading,
    Saving,
    Done,
    Failed,
}

impl UploadStage {
    pub fn is_busy(self) -> bool {
        matches!(self, UploadStage::Uploading | UploadStage::Saving)
    }

    pub fn status(self) -> Option<&'static str> {
        match self {
            UploadStage::Idle => None,
            UploadStage::Uploading => Some("⏳ Subiendo a la nube..."),
            UploadStage::Saving => Some("📝 Guardando en el álbum..."),
            UploadStage::Done => Some("¡Listo! Foto añadida ❤️"),
            UploadStage::Failed => Some("Error. Intenta de nuevo."),
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            UploadStage::Uploading | UploadStage::Saving => "Subiendo...",
            UploadStage::Failed => "REINTENTAR",
            UploadStage::Idle | UploadStage::Done => "ENVIAR RECUERDO",
        }
    }
}

/// File chosen for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub file_name: String,
}

impl Selection {
    pub fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "foto".to_string());
        Self { path, file_name }
    }
}

/// Full-size view of one photo
#[derive(Debug, Clone)]
pub struct Lightbox {
    pub url: String,
    pub image: Option<image::Handle>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchPhotos,
    PickFile,
    LoadPreview(PathBuf),
    UploadImage(Selection),
    RecordPhoto(String),
    /// Download these image URLs for display
    LoadImages(Vec<String>),
    CloseUploadAfter(Duration),
}

pub struct GalleryController {
    feed: PhotoFeed,
    loaded: bool,
    last_refresh: Option<DateTime<Local>>,
    /// Decoded thumbnails by URL
    images: HashMap<String, image::Handle>,
    /// URLs requested but not yet answered
    pending: HashSet<String>,
    lightbox: Option<Lightbox>,
    upload_open: bool,
    selection: Option<Selection>,
    preview: Option<image::Handle>,
    stage: UploadStage,
    config: GalleryConfig,
}

impl GalleryController {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            feed: PhotoFeed::new(),
            loaded: false,
            last_refresh: None,
            images: HashMap::new(),
            pending: HashSet::new(),
            lightbox: None,
            upload_open: false,
            selection: None,
            preview: None,
            stage: UploadStage::Idle,
            config,
        }
    }

    // ========== Accessors for the view ==========

    pub fn photos(&self) -> &[Photo] {
        self.feed.photos()
    }

    /// Text shown instead of the grid, if any
    pub fn placeholder(&self) -> Option<&'static str> {
        if !self.loaded {
            Some(LOADING_TEXT)
        } else if self.feed.photos().is_empty() {
            Some(EMPTY_TEXT)
        } else {
            None
        }
    }

    pub fn last_refresh(&self) -> Option<DateTime<Local>> {
        self.last_refresh
    }

    pub fn thumbnail_url(&self, photo: &Photo) -> String {
        photo.thumbnail_url(self.config.thumbnail_width)
    }

    pub fn image(&self, url: &str) -> Option<&image::Handle> {
        self.images.get(url)
    }

    pub fn lightbox(&self) -> Option<&Lightbox> {
        self.lightbox.as_ref()
    }

    pub fn is_upload_open(&self) -> bool {
        self.upload_open
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn preview(&self) -> Option<&image::Handle> {
        self.preview.as_ref()
    }

    pub fn stage(&self) -> UploadStage {
        self.stage
    }

    pub fn file_label(&self) -> String {
        match &self.selection {
            Some(selection) => format!("Foto seleccionada: {}", selection.file_name),
            None => PICK_PROMPT.to_string(),
        }
    }

    // ========== Polling ==========

    pub fn start(&mut self) -> Vec<Effect> {
        vec![Effect::FetchPhotos]
    }

    /// Fixed-interval poll; no backoff, runs for the window lifetime
    pub fn poll_tick(&mut self) -> Vec<Effect> {
        vec![Effect::FetchPhotos]
    }

    pub fn photos_loaded(&mut self, result: Result<Vec<Photo>, AppError>) -> Vec<Effect> {
        let photos = match result {
            Ok(photos) => photos,
            Err(err) if err.is_network() => {
                warn!(error = %err, "album unreachable, retrying on next poll");
                return Vec::new();
            }
            Err(err) => {
                error!(error = %err, "failed to load photos");
                return Vec::new();
            }
        };

        self.loaded = true;
        self.last_refresh = Some(Local::now());

        match self.feed.apply(photos) {
            PollOutcome::Empty => {
                debug!("album is empty");
                Vec::new()
            }
            // Same count still retries thumbnails whose download failed
            PollOutcome::Unchanged => self.request_thumbnails(),
            PollOutcome::Rebuilt => {
                info!(count = self.feed.last_count(), "photo grid rebuilt");
                self.request_thumbnails()
            }
        }
    }

    fn thumbnail_urls(&self) -> Vec<String> {
        self.feed
            .photos()
            .iter()
            .map(|photo| photo.thumbnail_url(self.config.thumbnail_width))
            .collect()
    }

    fn request_thumbnails(&mut self) -> Vec<Effect> {
        let urls = self.thumbnail_urls();
        self.request_images(urls)
    }

    fn request_images(&mut self, urls: Vec<String>) -> Vec<Effect> {
        let missing: Vec<String> = urls
            .into_iter()
            .filter(|url| !self.images.contains_key(url) && !self.pending.contains(url))
            .collect();

        if missing.is_empty() {
            return Vec::new();
        }

        self.pending.extend(missing.iter().cloned());
        vec![Effect::LoadImages(missing)]
    }

    pub fn image_loaded(&mut self, url: String, result: Result<image::Handle, AppError>) {
        self.pending.remove(&url);

        match result {
            Ok(handle) => {
                if let Some(lightbox) = self.lightbox.as_mut().filter(|lb| lb.url == url) {
                    lightbox.image = Some(handle.clone());
                }
                // Full-size images live only as long as the lightbox
                if self.thumbnail_urls().contains(&url) {
                    self.images.insert(url, handle);
                }
            }
            Err(err) => warn!(url = %url, error = %err, "failed to load image"),
        }
    }

    // ========== Lightbox ==========

    pub fn open_lightbox(&mut self, url: String) -> Vec<Effect> {
        let image = self.images.get(&url).cloned();
        let needs_load = image.is_none();
        self.lightbox = Some(Lightbox {
            url: url.clone(),
            image,
        });

        if needs_load {
            self.request_images(vec![url])
        } else {
            Vec::new()
        }
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = None;
    }

    // ========== Upload dialog ==========

    pub fn open_upload(&mut self) {
        self.upload_open = true;
        if !self.stage.is_busy() {
            self.stage = UploadStage::Idle;
        }
    }

    /// Close the dialog and forget the selection. An upload in flight is
    /// not cancelled.
    pub fn close_upload(&mut self) {
        self.upload_open = false;
        self.selection = None;
        self.preview = None;
        if !self.stage.is_busy() {
            self.stage = UploadStage::Idle;
        }
    }

    pub fn pick_file(&mut self) -> Vec<Effect> {
        if self.stage.is_busy() {
            return Vec::new();
        }
        vec![Effect::PickFile]
    }

    pub fn file_picked(&mut self, path: Option<PathBuf>) -> Vec<Effect> {
        let Some(path) = path else {
            return Vec::new();
        };

        debug!(path = %path.display(), "photo selected");
        self.selection = Some(Selection::new(path.clone()));
        self.preview = None;
        vec![Effect::LoadPreview(path)]
    }

    pub fn preview_loaded(&mut self, path: PathBuf, result: Result<image::Handle, AppError>) {
        if self.selection.as_ref().map(|s| &s.path) != Some(&path) {
            return;
        }

        match result {
            Ok(handle) => self.preview = Some(handle),
            Err(err) => warn!(path = %path.display(), error = %err, "could not preview photo"),
        }
    }

    pub fn submit_upload(&mut self) -> Vec<Effect> {
        if self.stage.is_busy() {
            return Vec::new();
        }
        let Some(selection) = self.selection.clone() else {
            return Vec::new();
        };

        info!(file = %selection.file_name, "uploading photo");
        self.stage = UploadStage::Uploading;
        vec![Effect::UploadImage(selection)]
    }

    pub fn uploaded(&mut self, result: Result<String, AppError>) -> Vec<Effect> {
        match result {
            Ok(url) => {
                self.stage = UploadStage::Saving;
                vec![Effect::RecordPhoto(url)]
            }
            Err(err) => {
                error!(error = %err, "photo upload failed");
                self.stage = UploadStage::Failed;
                Vec::new()
            }
        }
    }

    pub fn recorded(&mut self, result: Result<WriteAck, AppError>) -> Vec<Effect> {
        match result {
            Ok(ack) => {
                info!(?ack, "photo recorded in album");
                self.stage = UploadStage::Done;
                vec![
                    Effect::FetchPhotos,
                    Effect::CloseUploadAfter(self.config.close_after_upload()),
                ]
            }
            Err(err) => {
                error!(error = %err, "failed to record photo");
                self.stage = UploadStage::Failed;
                Vec::new()
            }
        }
    }

    /// Delayed close after a successful upload
    pub fn close_due(&mut self) {
        if self.stage == UploadStage::Done {
            self.close_upload();
        }
    }

    pub fn escape(&mut self) {
        self.close_lightbox();
        if self.upload_open {
            self.close_upload();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;

    fn controller() -> GalleryController {
        GalleryController::new(GalleryConfig::default())
    }

    fn listing(n: usize) -> Vec<Photo> {
        (0..n)
            .map(|i| Photo::new(format!("https://res.cloudinary.com/d/image/upload/{}.jpg", i)))
            .collect()
    }

    fn handle() -> image::Handle {
        image::Handle::from_rgba(1, 1, vec![0u8, 0, 0, 255])
    }

    #[test]
    fn test_placeholder_progression() {
        let mut gallery = controller();
        assert_eq!(gallery.start(), vec![Effect::FetchPhotos]);
        assert_eq!(gallery.placeholder(), Some(LOADING_TEXT));

        gallery.photos_loaded(Ok(Vec::new()));
        assert_eq!(gallery.placeholder(), Some(EMPTY_TEXT));

        gallery.photos_loaded(Ok(listing(1)));
        assert_eq!(gallery.placeholder(), None);
        assert!(gallery.last_refresh().is_some());
    }

    #[test]
    fn test_same_count_poll_requests_nothing() {
        let mut gallery = controller();
        let effects = gallery.photos_loaded(Ok(listing(2)));
        match effects.as_slice() {
            [Effect::LoadImages(urls)] => {
                assert_eq!(urls.len(), 2);
                assert!(urls[0].contains("/upload/w_400,c_scale/1.jpg"));
            }
            other => panic!("unexpected effects {:?}", other),
        }

        assert_eq!(gallery.poll_tick(), vec![Effect::FetchPhotos]);
        assert!(gallery.photos_loaded(Ok(listing(2))).is_empty());
    }

    #[test]
    fn test_rebuild_only_requests_missing_images() {
        let mut gallery = controller();
        gallery.photos_loaded(Ok(listing(1)));
        let first = gallery.thumbnail_url(&listing(1)[0]);
        gallery.image_loaded(first.clone(), Ok(handle()));
        assert!(gallery.image(&first).is_some());

        let effects = gallery.photos_loaded(Ok(listing(2)));
        match effects.as_slice() {
            [Effect::LoadImages(urls)] => {
                assert_eq!(urls.len(), 1);
                assert_ne!(urls[0], first);
            }
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn test_failed_poll_keeps_grid() {
        let mut gallery = controller();
        gallery.photos_loaded(Ok(listing(3)));
        let effects = gallery.photos_loaded(Err(GatewayError::Status(502).into()));
        assert!(effects.is_empty());
        assert_eq!(gallery.photos().len(), 3);
    }

    #[test]
    fn test_submit_without_file_does_nothing() {
        let mut gallery = controller();
        gallery.open_upload();
        assert!(gallery.submit_upload().is_empty());
        assert_eq!(gallery.stage(), UploadStage::Idle);
        assert_eq!(gallery.file_label(), PICK_PROMPT);
    }

    #[test]
    fn test_upload_happy_path() {
        let mut gallery = controller();
        gallery.open_upload();
        let path = PathBuf::from("/tmp/boda/beso.jpg");

        assert_eq!(
            gallery.file_picked(Some(path.clone())),
            vec![Effect::LoadPreview(path.clone())]
        );
        assert_eq!(gallery.file_label(), "Foto seleccionada: beso.jpg");
        gallery.preview_loaded(path.clone(), Ok(handle()));
        assert!(gallery.preview().is_some());

        let effects = gallery.submit_upload();
        assert!(matches!(effects.as_slice(), [Effect::UploadImage(s)] if s.path == path));
        assert_eq!(gallery.stage().button_label(), "Subiendo...");
        assert!(gallery.pick_file().is_empty());

        let effects = gallery.uploaded(Ok("https://res.cloudinary.com/d/image/upload/v1/beso.jpg".into()));
        assert!(matches!(effects.as_slice(), [Effect::RecordPhoto(url)] if url.ends_with("beso.jpg")));
        assert_eq!(gallery.stage(), UploadStage::Saving);

        let effects = gallery.recorded(Ok(WriteAck::Unconfirmed));
        assert_eq!(
            effects,
            vec![
                Effect::FetchPhotos,
                Effect::CloseUploadAfter(Duration::from_millis(1500))
            ]
        );
        assert_eq!(gallery.stage(), UploadStage::Done);

        gallery.close_due();
        assert!(!gallery.is_upload_open());
        assert!(gallery.selection().is_none());
        assert!(gallery.preview().is_none());
        assert_eq!(gallery.stage(), UploadStage::Idle);
    }

    #[test]
    fn test_failed_upload_allows_retry() {
        let mut gallery = controller();
        gallery.open_upload();
        gallery.file_picked(Some(PathBuf::from("foto.png")));
        gallery.submit_upload();

        gallery.uploaded(Err(AppError::Io("permission denied".into())));
        assert_eq!(gallery.stage(), UploadStage::Failed);
        assert_eq!(gallery.stage().button_label(), "REINTENTAR");

        assert!(matches!(gallery.submit_upload().as_slice(), [Effect::UploadImage(_)]));
    }

    #[test]
    fn test_stale_preview_is_ignored() {
        let mut gallery = controller();
        gallery.file_picked(Some(PathBuf::from("a.jpg")));
        gallery.file_picked(Some(PathBuf::from("b.jpg")));
        gallery.preview_loaded(PathBuf::from("a.jpg"), Ok(handle()));
        assert!(gallery.preview().is_none());
    }

    #[test]
    fn test_lightbox_image_is_dropped_on_close() {
        let mut gallery = controller();
        gallery.photos_loaded(Ok(listing(1)));
        let url = listing(1)[0].url.clone();

        assert_eq!(
            gallery.open_lightbox(url.clone()),
            vec![Effect::LoadImages(vec![url.clone()])]
        );
        gallery.image_loaded(url.clone(), Ok(handle()));
        assert!(gallery.lightbox().unwrap().image.is_some());
        assert!(gallery.image(&url).is_none());

        gallery.close_lightbox();
        assert_eq!(
            gallery.open_lightbox(url.clone()),
            vec![Effect::LoadImages(vec![url])]
        );
        assert!(gallery.lightbox().unwrap().image.is_none());
    }

    #[test]
    fn test_late_lightbox_image_is_not_kept() {
        let mut gallery = controller();
        let url = "https://res.cloudinary.com/d/image/upload/7.jpg".to_string();
        gallery.open_lightbox(url.clone());
        gallery.close_lightbox();

        gallery.image_loaded(url.clone(), Ok(handle()));
        assert!(gallery.image(&url).is_none());
    }

    #[test]
    fn test_failed_thumbnail_is_retried_on_next_poll() {
        let mut gallery = controller();
        gallery.photos_loaded(Ok(listing(2)));
        let thumbs: Vec<String> = gallery
            .photos()
            .iter()
            .map(|photo| gallery.thumbnail_url(photo))
            .collect();

        gallery.image_loaded(thumbs[0].clone(), Ok(handle()));
        gallery.image_loaded(thumbs[1].clone(), Err(GatewayError::Status(503).into()));

        assert_eq!(
            gallery.photos_loaded(Ok(listing(2))),
            vec![Effect::LoadImages(vec![thumbs[1].clone()])]
        );
        // Still in flight: the next poll does not ask twice
        assert!(gallery.photos_loaded(Ok(listing(2))).is_empty());
    }
}
