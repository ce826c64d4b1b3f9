/// Album rendering
use iced::widget::{
    button, column, container, horizontal_space, image, mouse_area, row, scrollable, text,
};
use iced::{Alignment, Color, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::app::Message;
use super::controller::{GalleryController, UploadStage};
use super::model::Photo;
use crate::ui::modal;

const TILE: f32 = 220.0;
const DONE_GREEN: Color = Color {
    r: 0.30,
    g: 0.75,
    b: 0.40,
    a: 1.0,
};
const FAILED_RED: Color = Color {
    r: 0.90,
    g: 0.30,
    b: 0.30,
    a: 1.0,
};

pub fn view(gallery: &GalleryController) -> Element<'_, Message> {
    let content: Element<'_, Message> = match gallery.placeholder() {
        Some(message) => container(text(message).size(18))
            .width(Length::Fill)
            .padding(60)
            .center_x(Length::Fill)
            .into(),
        None => Wrap::with_elements(
            gallery
                .photos()
                .iter()
                .map(|photo| tile(gallery, photo))
                .collect(),
        )
        .spacing(10.0)
        .line_spacing(10.0)
        .into(),
    };

    let base: Element<'_, Message> = column![
        header(gallery),
        scrollable(content).height(Length::Fill)
    ]
    .spacing(20)
    .padding(24)
    .into();

    let base = if gallery.is_upload_open() {
        modal(base, upload_dialog(gallery), Message::CloseUpload)
    } else {
        base
    };

    match gallery.lightbox() {
        Some(lightbox) => {
            let shown: Element<'_, Message> = match &lightbox.image {
                Some(handle) => image(handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .into(),
                None => text("Cargando...").size(20).color(Color::WHITE).into(),
            };
            // Click anywhere on the enlarged photo to close it
            let enlarged = mouse_area(container(shown).padding(40).center(Length::Fill))
                .on_press(Message::CloseLightbox);
            modal(base, enlarged, Message::CloseLightbox)
        }
        None => base,
    }
}

fn header(gallery: &GalleryController) -> Element<'_, Message> {
    let refreshed = gallery
        .last_refresh()
        .map(|at| format!("Actualizado a las {}", at.format("%H:%M:%S")))
        .unwrap_or_default();

    row![
        column![
            text("Nuestra Boda 💍").size(34),
            text("Comparte tus momentos favoritos").size(15),
        ]
        .spacing(4),
        horizontal_space(),
        text(refreshed).size(12),
        button(text("📷 Subir foto"))
            .on_press(Message::OpenUpload)
            .padding([10, 18])
            .style(button::primary),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
    .into()
}

fn tile<'a>(gallery: &'a GalleryController, photo: &'a Photo) -> Element<'a, Message> {
    let thumbnail = gallery.thumbnail_url(photo);

    let face: Element<'a, Message> = match gallery.image(&thumbnail) {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Cover)
            .width(Length::Fixed(TILE))
            .height(Length::Fixed(TILE))
            .into(),
        None => container(text("…").size(24))
            .center(Length::Fixed(TILE))
            .style(container::rounded_box)
            .into(),
    };

    button(face)
        .on_press(Message::OpenLightbox(photo.url.clone()))
        .padding(0)
        .style(button::text)
        .into()
}

fn upload_dialog(gallery: &GalleryController) -> Element<'_, Message> {
    let stage = gallery.stage();

    let picker = button(
        container(text(gallery.file_label()).size(15))
            .padding(24)
            .center_x(Length::Fill),
    )
    .on_press_maybe((!stage.is_busy()).then_some(Message::PickFile))
    .width(Length::Fill)
    .style(button::secondary);

    let mut body = column![text("Subir un recuerdo").size(24), picker]
        .spacing(14)
        .align_x(Alignment::Center);

    if let Some(preview) = gallery.preview() {
        body = body.push(
            image(preview.clone())
                .content_fit(ContentFit::Contain)
                .height(Length::Fixed(240.0)),
        );
    }

    if let Some(status) = stage.status() {
        let status = match stage {
            UploadStage::Done => text(status).color(DONE_GREEN),
            UploadStage::Failed => text(status).color(FAILED_RED),
            _ => text(status),
        };
        body = body.push(status.size(15));
    }

    let can_send = !stage.is_busy() && stage != UploadStage::Done;
    body = body.push(
        row![
            button(text("Cancelar"))
                .on_press(Message::CloseUpload)
                .padding(10)
                .style(button::secondary),
            horizontal_space(),
            button(text(stage.button_label()))
                .on_press_maybe(can_send.then_some(Message::SubmitUpload))
                .padding(10)
                .style(button::primary),
        ]
        .spacing(10),
    );

    container(body)
        .width(Length::Fixed(440.0))
        .padding(24)
        .style(container::rounded_box)
        .into()
}
