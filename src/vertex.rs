/// Projected vertex with world position, screen position, and depth
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub position: [f64; 3],
    pub screen_position: [f64; 2],
    /// Distance in front of the camera along its view axis
    pub depth: f64,
}
