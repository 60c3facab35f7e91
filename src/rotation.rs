//! Continuous self-rotation of every managed mesh.

/// Angular velocity about X, in radians per second
pub const SPIN_RATE_X: f64 = 0.1;
/// Angular velocity about Y, in radians per second
pub const SPIN_RATE_Y: f64 = 0.12;

/// Handle to a body whose Euler rotation can be advanced in place
pub trait Rotatable {
    fn rotation_mut(&mut self) -> &mut [f64; 3];
}

/// Applies a constant per-axis angular velocity scaled by frame time.
///
/// Angles accumulate without wrapping; the projection only ever reads them
/// through `sin`/`cos`.
#[derive(Clone, Copy, Debug)]
pub struct SelfRotationUpdater {
    pub rate_x: f64,
    pub rate_y: f64,
}

impl Default for SelfRotationUpdater {
    fn default() -> Self {
        SelfRotationUpdater {
            rate_x: SPIN_RATE_X,
            rate_y: SPIN_RATE_Y,
        }
    }
}

impl SelfRotationUpdater {
    pub fn update<'a, M, I>(&self, meshes: I, dt: f64)
    where
        M: Rotatable + 'a,
        I: IntoIterator<Item = &'a mut M>,
    {
        for mesh in meshes {
            let rotation = mesh.rotation_mut();
            rotation[0] += self.rate_x * dt;
            rotation[1] += self.rate_y * dt;
        }
    }
}
