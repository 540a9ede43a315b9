//! Snowfall tuning — all knobs fixed at construction.

use egui::Color32;
use std::time::Duration;

/// Configuration for one [`Snowfall`](crate::overlay::Snowfall) instance.
///
/// The defaults give mild snow: bigger flakes, fewer, slower. Speeds are
/// expressed in points per 60 Hz step; the overlay rescales them to the
/// actual frame time.
#[derive(Clone, Debug)]
pub struct SnowfallConfig {
    /// Number of flakes in the pool.
    pub flake_count: usize,
    /// Flake radius bounds in points.
    pub radius_min: f32,
    pub radius_max: f32,
    /// Vertical fall speed bounds.
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    /// Horizontal base speed bound; each flake gets a value in ±`side_speed`.
    pub side_speed: f32,
    /// Drift factor bounds; drift scales both sway and phase advance.
    pub drift_min: f32,
    pub drift_max: f32,
    /// Amplitude of the sinusoidal sway term.
    pub sway_amplitude: f32,
    /// Phase advance per step, before the drift factor.
    pub phase_step: f32,
    /// Fill color for every flake. Soft white that suits glass panels.
    pub flake_color: Color32,
    /// Opacity fade duration when the surface is shown or hidden.
    pub fade: Duration,
    /// Delay between hiding the surface and stopping the loop.
    /// Must exceed `fade` or the fade-out gets cut short.
    pub teardown_delay: Duration,
    /// A flake is recycled once it falls this far below the viewport,
    /// or drifts this far past either side.
    pub bottom_margin: f32,
    pub side_margin: f32,
    /// Recycled flakes restart in a band above the top edge, from
    /// `top_band_min` points up to `top_band_frac` of the viewport height.
    pub top_band_min: f32,
    pub top_band_frac: f32,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            flake_count: 70,
            radius_min: 0.9,
            radius_max: 2.4,
            fall_speed_min: 0.35,
            fall_speed_max: 1.05,
            side_speed: 0.12,
            drift_min: 0.6,
            drift_max: 1.35,
            sway_amplitude: 0.18,
            phase_step: 0.008,
            flake_color: Color32::from_rgba_unmultiplied(255, 255, 255, 158),
            fade: Duration::from_millis(260),
            teardown_delay: Duration::from_millis(280),
            bottom_margin: 12.0,
            side_margin: 20.0,
            top_band_min: 10.0,
            top_band_frac: 0.15,
        }
    }
}
