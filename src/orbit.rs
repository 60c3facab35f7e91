//! Wheel-driven orbital motion of the four scene bodies.
//!
//! Wheel input feeds an angular velocity that decays geometrically every
//! frame. All bodies share one angle and sit a quarter turn apart on the same
//! circle. The tick is frame-counted, not time-scaled.

use std::f64::consts::{FRAC_PI_2, PI};

/// Angular velocity gained per unit of wheel `deltaY`
pub const WHEEL_SENSITIVITY: f64 = 0.0002;
/// Fraction of angular velocity kept after each frame
pub const VELOCITY_DECAY: f64 = 0.93;
pub const ORBIT_RADIUS: f64 = 3.8;
/// Orbit centre in the XZ plane
pub const ORBIT_CENTER: [f64; 2] = [2.0, -3.0];
pub const PHASE_OFFSETS: [f64; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitState {
    pub angular_velocity: f64,
    pub angle: f64,
}

/// One body on the shared orbit circle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitingBody {
    pub phase_offset: f64,
    pub radius: f64,
    /// Circle centre as (x, z)
    pub center: [f64; 2],
    /// Last computed position as (x, z)
    pub position: [f64; 2],
}

impl OrbitingBody {
    fn new(phase_offset: f64) -> Self {
        OrbitingBody {
            phase_offset,
            radius: ORBIT_RADIUS,
            center: ORBIT_CENTER,
            position: [0.0; 2],
        }
    }

    fn place(&mut self, angle: f64) {
        let theta = angle + self.phase_offset;
        self.position = [
            self.center[0] + self.radius * theta.cos(),
            self.center[1] + self.radius * theta.sin(),
        ];
    }
}

#[derive(Clone, Debug)]
pub struct OrbitController {
    state: OrbitState,
    bodies: [OrbitingBody; 4],
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        OrbitController {
            state: OrbitState::default(),
            bodies: PHASE_OFFSETS.map(OrbitingBody::new),
        }
    }

    /// Accumulates wheel input. Velocity is deliberately unbounded.
    pub fn on_wheel_delta(&mut self, delta_y: f64) {
        self.state.angular_velocity += delta_y * WHEEL_SENSITIVITY;
    }

    /// Advances one frame and repositions every body
    pub fn tick(&mut self) {
        self.state.angle += self.state.angular_velocity;
        self.state.angular_velocity *= VELOCITY_DECAY;
        let angle = self.state.angle;
        for body in &mut self.bodies {
            body.place(angle);
        }
    }

    /// Stops the motion and returns every body to the zero angle
    pub fn reset(&mut self) {
        self.state = OrbitState::default();
        for body in &mut self.bodies {
            body.place(0.0);
        }
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn bodies(&self) -> &[OrbitingBody; 4] {
        &self.bodies
    }
}
