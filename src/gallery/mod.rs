pub mod app;
pub mod controller;
pub mod model;
pub mod poll;
pub mod view;

pub use app::Album;
