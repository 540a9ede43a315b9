//! Flake — one particle in the snowfall pool.

use rand::Rng;

use crate::config::SnowfallConfig;

/// Where a freshly made flake is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnArea {
    /// Anywhere in the viewport. Only used when the pool is first filled.
    Anywhere,
    /// In a band just above the top edge. Used when recycling.
    AboveTop,
}

/// One particle. Radius, speeds and drift are fixed at creation; only
/// position and phase change while it falls.
#[derive(Clone, Copy, Debug)]
pub struct Flake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Vertical speed, points per 60 Hz step.
    pub vy: f32,
    /// Horizontal base speed.
    pub vx: f32,
    /// Drift factor; scales sway amplitude and phase advance.
    pub drift: f32,
    /// Sway oscillation phase in radians.
    pub phase: f32,
}

impl Flake {
    /// Make a flake for a `width` × `height` viewport.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        config: &SnowfallConfig,
        width: f32,
        height: f32,
        area: SpawnArea,
    ) -> Self {
        let y = match area {
            SpawnArea::Anywhere => rng.gen_range(0.0..height.max(1.0)),
            SpawnArea::AboveTop => {
                // Band is [-frac * height, -min); min wins on short viewports.
                let high = -config.top_band_min;
                let low = (-height * config.top_band_frac).min(high - 1.0);
                rng.gen_range(low..high)
            }
        };
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y,
            radius: rng.gen_range(config.radius_min..config.radius_max),
            vy: rng.gen_range(config.fall_speed_min..config.fall_speed_max),
            vx: rng.gen_range(-config.side_speed..config.side_speed),
            drift: rng.gen_range(config.drift_min..config.drift_max),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
        }
    }

    /// Advance one animation step. `step_scale` is the elapsed time relative
    /// to a 60 Hz step, so motion speed is independent of repaint cadence.
    pub fn advance(&mut self, config: &SnowfallConfig, step_scale: f32) {
        self.phase += config.phase_step * self.drift * step_scale;
        let sway = self.phase.sin() * config.sway_amplitude * self.drift;
        self.x += (self.vx + sway) * step_scale;
        self.y += self.vy * step_scale;
    }

    /// Whether the flake has left the visible viewport and should be
    /// recycled into its slot.
    pub fn is_offscreen(&self, config: &SnowfallConfig, width: f32, height: f32) -> bool {
        self.y > height + config.bottom_margin
            || self.x < -config.side_margin
            || self.x > width + config.side_margin
    }
}
