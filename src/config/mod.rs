//! Configuration management for portprobe.

mod settings;

pub use settings::{default_settings_file, AppSettings};
