//! Cursor-driven camera parallax.
//!
//! The cursor offset acts as a velocity for the camera in the XY plane. Two
//! independent rules keep the view sane: a dead-zone reset that snaps the
//! camera home while the cursor is near a viewport edge, and a pull-back that
//! undoes the current frame's step when the camera leaves its box. The
//! pull-back is a rollback, not a clamp, so the camera can still end up
//! outside the box.

use crate::state::ViewportSize;

/// Camera units per second for a cursor offset of 1
pub const PARALLAX_GAIN: f64 = 2.5;
/// Cursor offset beyond which the camera snaps home
pub const DEAD_ZONE: f64 = 0.45;
/// Half extents of the camera's allowed box
pub const BOUNDS: [f64; 2] = [2.0, 1.0];

/// Cursor position relative to the viewport centre, each axis in about [-0.5, 0.5]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorOffset {
    pub x: f64,
    pub y: f64,
}

/// Camera position in the XY plane; Z stays where the scene put it
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraState {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ParallaxController {
    cursor: CursorOffset,
    camera: CameraState,
}

impl ParallaxController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the cursor offset from a pointer position in viewport units
    pub fn on_pointer_move(&mut self, client_x: f64, client_y: f64, viewport: ViewportSize) {
        self.cursor = CursorOffset {
            x: client_x / viewport.width as f64 - 0.5,
            y: client_y / viewport.height as f64 - 0.5,
        };
    }

    /// Integrates one frame of cursor-driven motion
    pub fn update(&mut self, dt: f64) {
        let step_x = self.cursor.x * dt * PARALLAX_GAIN;
        let step_y = -self.cursor.y * dt * PARALLAX_GAIN;

        self.camera.x += step_x;
        self.camera.y += step_y;

        if self.cursor.x.abs() > DEAD_ZONE || self.cursor.y.abs() > DEAD_ZONE {
            self.camera = CameraState::default();
        }

        if self.camera.x.abs() > BOUNDS[0] || self.camera.y.abs() > BOUNDS[1] {
            self.camera.x -= step_x;
            self.camera.y -= step_y;
        }
    }

    /// Recentres the camera without touching the cursor
    pub fn reset(&mut self) {
        self.camera = CameraState::default();
    }

    pub fn cursor(&self) -> CursorOffset {
        self.cursor
    }

    #[cfg(test)]
    pub fn set_cursor(&mut self, cursor: CursorOffset) {
        self.cursor = cursor;
    }

    pub fn camera(&self) -> CameraState {
        self.camera
    }

    #[cfg(test)]
    pub fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }
}
