/// Remote data gateway
///
/// This module talks to the two external services the apps depend on:
/// - the spreadsheet script API (`sheet.rs`): list, write, password check
/// - the image host (`image_host.rs`): upload and thumbnail download
///
/// Response decoding lives in `wire.rs` so it can be tested offline.
pub mod image_host;
pub mod sheet;
pub mod wire;

pub use image_host::ImageHost;
pub use sheet::SheetClient;

/// Outcome of a write request.
///
/// The script endpoint does not reliably answer writes with a readable
/// body. A write that went through at the transport level but could not be
/// confirmed is `Unconfirmed`; callers reconcile by listing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAck {
    Confirmed,
    Unconfirmed,
}
