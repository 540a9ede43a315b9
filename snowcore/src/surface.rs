//! Drawing surface state — viewport sizing and fade visibility.
//!
//! In immediate mode the "canvas" owns no pixels; what persists between
//! frames is the sizing (points, pixel ratio, backing-store dimensions)
//! and the opacity the painter consults. Created once, never destroyed —
//! only hidden or shown.

use std::time::Duration;

pub struct Surface {
    width: f32,
    height: f32,
    pixels_per_point: f32,
    pixel_width: u32,
    pixel_height: u32,
    opacity: f32,
    target_opacity: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// A fresh surface: unsized until the first frame, fully visible.
    pub fn new() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pixels_per_point: 1.0,
            pixel_width: 0,
            pixel_height: 0,
            opacity: 1.0,
            target_opacity: 1.0,
        }
    }

    /// Recompute backing-store pixel dimensions for a viewport given in
    /// points and the current pixel ratio. Safe to call mid-animation.
    pub fn resize(&mut self, width: f32, height: f32, pixels_per_point: f32) {
        self.width = width;
        self.height = height;
        self.pixels_per_point = pixels_per_point;
        self.pixel_width = (width * pixels_per_point).floor().max(0.0) as u32;
        self.pixel_height = (height * pixels_per_point).floor().max(0.0) as u32;
    }

    /// Set the fade target. The opacity transitions there over the fade
    /// duration rather than snapping.
    pub fn set_visible(&mut self, visible: bool) {
        self.target_opacity = if visible { 1.0 } else { 0.0 };
    }

    /// Move the opacity toward its target; a full sweep takes `fade`.
    pub fn step_fade(&mut self, dt: f32, fade: Duration) {
        let secs = fade.as_secs_f32();
        let rate = if secs > 0.0 { dt / secs } else { 1.0 };
        if self.opacity < self.target_opacity {
            self.opacity = (self.opacity + rate).min(self.target_opacity);
        } else {
            self.opacity = (self.opacity - rate).max(self.target_opacity);
        }
    }

    /// Eased alpha multiplier for painting.
    pub fn paint_alpha(&self) -> f32 {
        ease_out_quad(self.opacity)
    }

    pub fn is_fading(&self) -> bool {
        self.opacity != self.target_opacity
    }

    pub fn is_visible_target(&self) -> bool {
        self.target_opacity > 0.5
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// Quadratic ease-out, the same curve the window animations use.
fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}
