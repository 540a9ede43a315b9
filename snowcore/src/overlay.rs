//! Snowfall overlay controller — flake pool, frame loop, toggle API.
//!
//! One instance per embedding UI layer. The host constructs it with its
//! config, store and viewer identity, calls [`Snowfall::boot`] once, then
//! [`Snowfall::frame`] every egui frame with a painter for the layer the
//! snow should land on (beneath interactive content, above the backdrop).
//! Toggling goes through [`Snowfall::toggle`] and friends; every change is
//! persisted immediately.

use std::time::{Duration, Instant};

use egui::{Painter, Pos2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SnowfallConfig;
use crate::flake::{Flake, SpawnArea};
use crate::prefs::{PrefKeys, PrefStore};
use crate::surface::Surface;

/// Reference step the motion constants are tuned for.
const BASE_STEP: f32 = 1.0 / 60.0;

/// Per-frame step ratio clamp; a long stall must not teleport flakes.
const STEP_RATIO_MIN: f32 = 0.1;
const STEP_RATIO_MAX: f32 = 3.5;

/// Repaint cadence while the loop runs.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// The snowfall overlay.
pub struct Snowfall {
    config: SnowfallConfig,
    store: PrefStore,
    keys: PrefKeys,
    rng: StdRng,
    /// The viewer's preference, mirrored to the store on every change.
    enabled: bool,
    /// Whether the animation loop is advancing.
    running: bool,
    booted: bool,
    /// Deadline for the deferred loop stop after a disable. The enabled
    /// flag is re-checked when it expires, not when it is scheduled.
    pending_stop: Option<Instant>,
    surface: Option<Surface>,
    flakes: Vec<Flake>,
    last_frame: Option<Instant>,
}

impl Snowfall {
    /// A controller for the viewer identified by `user_id` (`None` for
    /// anonymous hosts).
    pub fn new(config: SnowfallConfig, store: PrefStore, user_id: Option<&str>) -> Self {
        Self {
            keys: PrefKeys::for_user(user_id),
            config,
            store,
            rng: StdRng::from_entropy(),
            enabled: true,
            running: false,
            booted: false,
            pending_stop: None,
            surface: None,
            flakes: Vec::new(),
            last_frame: None,
        }
    }

    /// Read the persisted preference and bring the overlay up, or pre-create
    /// it hidden so a later enable is cheap. Runs once; later calls no-op.
    pub fn boot(&mut self) {
        if self.booted {
            return;
        }
        self.booted = true;
        self.enabled = self.store.read_stored(&self.keys);
        if self.enabled {
            self.start();
        } else {
            self.set_surface_visible(false);
            self.stop();
        }
    }

    /// Turn the snow on: persist, show, run. Returns the new state.
    pub fn enable(&mut self) -> bool {
        self.enabled = true;
        self.store.store(&self.keys, true);
        self.set_surface_visible(true);
        self.start();
        true
    }

    /// Turn the snow off. The surface hides immediately; the loop keeps
    /// running through the teardown delay so the fade-out is not cut short.
    pub fn disable(&mut self) -> bool {
        self.disable_at(Instant::now())
    }

    fn disable_at(&mut self, now: Instant) -> bool {
        self.enabled = false;
        self.store.store(&self.keys, false);
        self.set_surface_visible(false);
        self.pending_stop = Some(now + self.config.teardown_delay);
        false
    }

    /// Flip the preference; returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.enabled {
            self.disable()
        } else {
            self.enable()
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if enabled {
            self.enable()
        } else {
            self.disable()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &SnowfallConfig {
        &self.config
    }

    /// Drive one egui frame: advance the simulation, paint the flakes and
    /// keep repaints coming while anything is moving.
    ///
    /// The painter decides the stacking order — hand in one for a layer
    /// beneath the host's interactive content.
    pub fn frame(&mut self, ctx: &egui::Context, painter: &Painter) {
        let rect = ctx.screen_rect();
        self.advance(
            Instant::now(),
            rect.width(),
            rect.height(),
            ctx.pixels_per_point(),
        );
        self.paint(painter);
        if self.wants_frames() {
            ctx.request_repaint_after(FRAME_INTERVAL);
        }
    }

    /// Idempotent.
    fn start(&mut self) {
        self.ensure_surface();
        self.running = true;
    }

    /// Idempotent. A stopped overlay paints nothing, which in immediate
    /// mode leaves the area clear on the next host frame.
    fn stop(&mut self) {
        self.running = false;
    }

    fn ensure_surface(&mut self) {
        if self.surface.is_none() {
            self.surface = Some(Surface::new());
        }
    }

    fn set_surface_visible(&mut self, visible: bool) {
        self.ensure_surface();
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visible(visible);
        }
    }

    /// The deadline re-checks the CURRENT flag, so a re-enable inside the
    /// window suppresses the stop.
    fn poll_pending_stop(&mut self, now: Instant) {
        if let Some(deadline) = self.pending_stop {
            if now >= deadline {
                self.pending_stop = None;
                if !self.enabled {
                    self.stop();
                }
            }
        }
    }

    /// Advance all state to `now` for a `width` × `height` viewport.
    fn advance(&mut self, now: Instant, width: f32, height: f32, pixels_per_point: f32) {
        let dt = match self.last_frame {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if surface.width() != width
            || surface.height() != height
            || surface.pixels_per_point() != pixels_per_point
        {
            surface.resize(width, height, pixels_per_point);
        }
        surface.step_fade(dt, self.config.fade);

        self.poll_pending_stop(now);

        if !self.running || width <= 0.0 || height <= 0.0 {
            return;
        }

        // The pool fills on the first sized frame, spread over the whole
        // viewport; recycling afterwards always re-enters from the top.
        if self.flakes.is_empty() {
            self.init_pool(width, height);
        }

        let step_scale = (dt / BASE_STEP).clamp(STEP_RATIO_MIN, STEP_RATIO_MAX);
        for flake in &mut self.flakes {
            flake.advance(&self.config, step_scale);
            if flake.is_offscreen(&self.config, width, height) {
                *flake =
                    Flake::spawn(&mut self.rng, &self.config, width, height, SpawnArea::AboveTop);
            }
        }
    }

    fn init_pool(&mut self, width: f32, height: f32) {
        self.flakes = (0..self.config.flake_count)
            .map(|_| Flake::spawn(&mut self.rng, &self.config, width, height, SpawnArea::Anywhere))
            .collect();
    }

    /// Paint the pool through the surface's fade opacity. Stopped or fully
    /// faded overlays paint nothing.
    fn paint(&self, painter: &Painter) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        if !self.running {
            return;
        }
        let alpha = surface.paint_alpha();
        if alpha <= 0.0 {
            return;
        }
        let color = self.config.flake_color.gamma_multiply(alpha);
        for flake in &self.flakes {
            painter.circle_filled(Pos2::new(flake.x, flake.y), flake.radius, color);
        }
    }

    /// Whether another frame should be scheduled: the loop is running, a
    /// fade is in progress, or a teardown deadline is waiting to fire.
    fn wants_frames(&self) -> bool {
        self.running
            || self.pending_stop.is_some()
            || self.surface.as_ref().is_some_and(|s| s.is_fading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn snow_in(dir: &TempDir) -> Snowfall {
        let store = PrefStore::new(dir.path().join("snow_prefs.json"));
        Snowfall::new(SnowfallConfig::default(), store, Some("kim"))
    }

    /// Run enough sized frames to fill the pool.
    fn warm_up(snow: &mut Snowfall, t: Instant) {
        snow.advance(t, W, H, 1.0);
        snow.advance(t + Duration::from_millis(16), W, H, 1.0);
    }

    #[test]
    fn test_boot_defaults_to_enabled() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(snow.is_enabled());
        assert!(snow.is_running());
        assert!(snow.surface.as_ref().unwrap().is_visible_target());
    }

    #[test]
    fn test_boot_respects_stored_off() {
        let dir = TempDir::new().unwrap();
        {
            let mut snow = snow_in(&dir);
            snow.boot();
            snow.disable();
        }
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(!snow.is_enabled());
        assert!(!snow.is_running());
        // The surface still exists so a later enable is cheap.
        assert!(snow.surface.is_some());
        assert!(!snow.surface.as_ref().unwrap().is_visible_target());
    }

    #[test]
    fn test_boot_runs_once() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        snow.disable();
        snow.boot();
        assert!(!snow.is_enabled());
    }

    #[test]
    fn test_enable_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(snow.enable());
        assert!(snow.enable());
        assert!(snow.is_enabled());
        assert!(snow.is_running());
        assert!(snow.surface.as_ref().unwrap().is_visible_target());
        let store = PrefStore::new(dir.path().join("snow_prefs.json"));
        assert!(store.read_stored(&PrefKeys::for_user(Some("kim"))));
    }

    #[test]
    fn test_toggle_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(!snow.toggle());
        assert!(snow.toggle());
        assert!(snow.is_enabled());
    }

    #[test]
    fn test_disable_defers_the_stop() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        let t = Instant::now();
        assert!(!snow.disable_at(t));
        // Inside the teardown window the loop still runs (it is carrying
        // the fade-out).
        snow.poll_pending_stop(t + Duration::from_millis(200));
        assert!(snow.is_running());
        // Past the window it stops.
        snow.poll_pending_stop(t + Duration::from_millis(300));
        assert!(!snow.is_running());
        assert!(snow.pending_stop.is_none());
    }

    #[test]
    fn test_reenable_within_window_suppresses_stop() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        let t = Instant::now();
        snow.disable_at(t);
        // 100 ms later the viewer changes their mind.
        assert!(snow.enable());
        snow.poll_pending_stop(t + Duration::from_millis(300));
        assert!(snow.is_running());
        assert!(snow.surface.as_ref().unwrap().is_visible_target());
    }

    #[test]
    fn test_set_enabled_dispatches() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(!snow.set_enabled(false));
        assert!(!snow.is_enabled());
        assert!(snow.set_enabled(true));
        assert!(snow.is_enabled());
    }

    #[test]
    fn test_pool_fills_on_first_sized_frame() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(snow.flakes.is_empty());
        warm_up(&mut snow, Instant::now());
        assert_eq!(snow.flakes.len(), snow.config.flake_count);
    }

    #[test]
    fn test_offscreen_flake_respawns_above_top() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        let t = Instant::now();
        warm_up(&mut snow, t);

        snow.flakes[0].y = H + snow.config.bottom_margin + 5.0;
        snow.advance(t + Duration::from_millis(32), W, H, 1.0);

        let f = &snow.flakes[0];
        assert!(f.y < 0.0);
        assert!(f.x >= 0.0 && f.x < W);
    }

    #[test]
    fn test_stopped_overlay_does_not_advance() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        let t = Instant::now();
        warm_up(&mut snow, t);

        let t2 = t + Duration::from_secs(1);
        snow.disable_at(t2);
        snow.poll_pending_stop(t2 + Duration::from_millis(300));
        assert!(!snow.is_running());

        let positions: Vec<(f32, f32)> = snow.flakes.iter().map(|f| (f.x, f.y)).collect();
        snow.advance(t2 + Duration::from_millis(350), W, H, 1.0);
        let after: Vec<(f32, f32)> = snow.flakes.iter().map(|f| (f.x, f.y)).collect();
        assert_eq!(positions, after);
    }

    #[test]
    fn test_surface_resize_mid_flight() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        let t = Instant::now();
        warm_up(&mut snow, t);

        snow.advance(t + Duration::from_millis(48), 1024.0, 768.0, 2.0);
        let surface = snow.surface.as_ref().unwrap();
        assert_eq!(surface.pixel_width(), 2048);
        assert_eq!(surface.pixel_height(), 1536);
    }

    #[test]
    fn test_wants_frames_tracks_activity() {
        let dir = TempDir::new().unwrap();
        let mut snow = snow_in(&dir);
        snow.boot();
        assert!(snow.wants_frames());

        let t = Instant::now();
        snow.disable_at(t);
        assert!(snow.wants_frames()); // fading + pending stop

        snow.poll_pending_stop(t + Duration::from_millis(300));
        // Drain the fade.
        for i in 0..20 {
            snow.advance(t + Duration::from_millis(300 + i * 33), W, H, 1.0);
        }
        assert!(!snow.wants_frames());
    }
}
