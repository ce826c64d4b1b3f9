//! Hearth: a native recipe book and a shared wedding photo album, both
//! backed by a spreadsheet web-script API.
//!
//! The two windows ship as separate binaries (`hearth-recipes` and
//! `hearth-gallery`) over this shared library.

pub mod config;
pub mod error;
pub mod gallery;
pub mod gateway;
pub mod logging;
pub mod recipes;
pub mod ui;
