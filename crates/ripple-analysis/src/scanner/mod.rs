//! Repository walking and language detection.

pub mod language_detect;
pub mod walker;

pub use language_detect::Language;
pub use walker::{ScannedFile, Walker};
