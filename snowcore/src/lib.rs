//! snowcore — snowfall overlay library for slow computer applications
//!
//! A gentle decorative snowfall painted behind an application's content.
//! Apps own a [`Snowfall`] instance, boot it once from the persisted
//! preference, drive it every frame, and wire [`Snowfall::toggle`] to
//! whatever control they expose.

pub mod config;
pub mod flake;
pub mod overlay;
pub mod prefs;
pub mod storage;
pub mod surface;

pub use config::SnowfallConfig;
pub use overlay::Snowfall;
pub use prefs::{PrefKeys, PrefStore};
