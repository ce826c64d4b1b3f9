/// Recipe book
///
/// - `model.rs` - recipes, categories and card previews
/// - `store.rs` - listing snapshot, filters and edit session
/// - `controller.rs` - event handling and the password-gated write flow
/// - `view.rs` - widgets
/// - `app.rs` - iced window glue
pub mod app;
pub mod controller;
pub mod model;
pub mod store;
pub mod view;

pub use app::RecipeBook;
