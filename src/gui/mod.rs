//! egui front end: the option controls and a preview window hosting them

pub mod components;
pub mod constants;
pub mod observer;
pub mod preview;

pub use observer::DialogObserver;
pub use preview::run_preview;
