//! Configuration system for Ripple.
//! TOML-based, layered resolution: env > project > user > defaults.

pub mod analysis_config;
pub mod ripple_config;
pub mod scan_config;

pub use analysis_config::AnalysisConfig;
pub use ripple_config::RippleConfig;
pub use scan_config::ScanConfig;
