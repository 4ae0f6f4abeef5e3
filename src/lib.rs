//! Retro monochrome display filter for the HFS file browser
//!
//! Holds the persisted filter preference, synthesizes the SVG filter that
//! quantizes the page into a single color tone, and keeps storage, the page
//! and the option controls in agreement.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod controller;
pub mod filter;
pub mod gui;
pub mod persistence;
pub mod tables;
pub mod target;

pub use config::Configuration;
pub use controller::{ControlEvent, ReconciliationController};
pub use persistence::{ConfigStore, FileStore, MemoryStore};
pub use target::{DocumentRoot, RenderTarget};
