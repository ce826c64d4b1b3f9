/// Widgets and view state shared by both windows
///
/// - `banner.rs` - auto-dismissing success/error banners
/// - `modal.rs` - dimmed overlay used by every dialog
pub mod banner;
pub mod modal;

pub use banner::{Banner, BannerKind, Banners};
pub use modal::modal;
