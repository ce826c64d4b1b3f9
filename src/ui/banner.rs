/// Transient status banners
///
/// At most one banner per kind is visible. Each banner gets a fresh id so a
/// late expiry timer for an older banner never hides a newer one.
use iced::widget::{container, text};
use iced::{Color, Element, Length};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Banners {
    current: Vec<Banner>,
    next_id: u64,
}

impl Banners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a banner, replacing any banner of the same kind; returns its id
    pub fn push(&mut self, kind: BannerKind, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        self.current.retain(|banner| banner.kind != kind);
        self.current.push(Banner {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    /// Dismiss a banner if it is still showing
    pub fn expire(&mut self, id: u64) {
        self.current.retain(|banner| banner.id != id);
    }

    pub fn hide(&mut self, kind: BannerKind) {
        self.current.retain(|banner| banner.kind != kind);
    }

    pub fn get(&self, kind: BannerKind) -> Option<&Banner> {
        self.current.iter().find(|banner| banner.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Banner> {
        self.current.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

impl Banner {
    pub fn view<'a, Message: 'a>(&'a self) -> Element<'a, Message> {
        let background = match self.kind {
            BannerKind::Success => Color::from_rgb(0.18, 0.55, 0.34),
            BannerKind::Error => Color::from_rgb(0.75, 0.22, 0.22),
        };

        container(text(&self.text).size(16).color(Color::WHITE))
            .padding(12)
            .width(Length::Fill)
            .style(move |_theme| container::Style {
                background: Some(background.into()),
                ..container::Style::default()
            })
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_replaces_same_kind() {
        let mut banners = Banners::new();
        let first = banners.push(BannerKind::Success, "Receta guardada");
        let second = banners.push(BannerKind::Success, "Receta eliminada");
        banners.push(BannerKind::Error, "Error");

        assert_ne!(first, second);
        assert_eq!(banners.iter().count(), 2);
        assert_eq!(banners.get(BannerKind::Success).unwrap().text, "Receta eliminada");
    }

    #[test]
    fn test_stale_expiry_keeps_newer_banner() {
        let mut banners = Banners::new();
        let old = banners.push(BannerKind::Error, "uno");
        let new = banners.push(BannerKind::Error, "dos");

        banners.expire(old);
        assert_eq!(banners.get(BannerKind::Error).unwrap().id, new);

        banners.expire(new);
        assert!(banners.is_empty());
    }
}
