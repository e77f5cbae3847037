//! Configuration loading and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `SLATE_` (nested keys separated by
//! `__`, e.g. `SLATE_COLLECT_AUDIO__PRODUCT_NAME`). Later layers win.

pub mod error;
mod settings;

pub use crate::settings::{AnatomySettings, CollectAudioSettings, Settings, StoreSettings};
