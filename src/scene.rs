use crate::geometry::{icosahedron, octahedron, particle_field, torus, torus_knot, Geometry};
use crate::math::normalize;
use crate::rotation::Rotatable;
use rand::Rng;

pub const DEFAULT_COLOR: [u8; 3] = [0x3c, 0x94, 0xd7];
pub const PARTICLE_COUNT: usize = 700;
const PARTICLE_SPREAD: f64 = 10.0;

/// Physically based surface parameters shared by every mesh; always flat shaded
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: [u8; 3],
    pub metalness: f64,
    pub roughness: f64,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            color: DEFAULT_COLOR,
            metalness: 0.86,
            roughness: 0.37,
        }
    }
}

impl Material {
    /// Base colour with channels in [0, 1]
    pub fn linear_color(&self) -> [f64; 3] {
        self.color.map(|c| c as f64 / 255.0)
    }
}

/// A renderable body with a position and an Euler XYZ rotation
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: &'static str,
    pub geometry: Geometry,
    pub position: [f64; 3],
    pub rotation: [f64; 3],
}

impl Mesh {
    pub fn new(name: &'static str, geometry: Geometry, position: [f64; 3]) -> Self {
        Mesh {
            name,
            geometry,
            position,
            rotation: [0.0; 3],
        }
    }
}

impl Rotatable for Mesh {
    fn rotation_mut(&mut self) -> &mut [f64; 3] {
        &mut self.rotation
    }
}

#[derive(Clone, Debug)]
pub struct Particles {
    pub positions: Vec<[f64; 3]>,
    pub color: [u8; 3],
}

/// Light arriving from `position` towards the origin
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    pub color: [u8; 3],
    pub intensity: f64,
    pub position: [f64; 3],
}

impl DirectionalLight {
    /// Unit vector from a lit surface towards the light
    pub fn direction(&self) -> [f64; 3] {
        normalize(&self.position)
    }

    /// Light colour scaled so the default intensity maps to unit radiance
    pub fn radiance(&self) -> [f64; 3] {
        self.color.map(|c| c as f64 / 255.0 * self.intensity / 4.0)
    }
}

/// Perspective camera looking down -Z
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: [f64; 3],
    focal: f64,
}

impl PerspectiveCamera {
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut camera = PerspectiveCamera {
            fov,
            aspect,
            near,
            far,
            position: [0.0; 3],
            focal: 1.0,
        };
        camera.update_projection();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.focal = 1.0 / (self.fov.to_radians() / 2.0).tan();
    }

    /// Maps a world point to normalized device coordinates plus view depth.
    ///
    /// Returns `None` for points outside the near/far range.
    pub fn project(&self, point: &[f64; 3]) -> Option<([f64; 2], f64)> {
        let x = point[0] - self.position[0];
        let y = point[1] - self.position[1];
        let depth = self.position[2] - point[2];
        if depth < self.near || depth > self.far {
            return None;
        }
        let ndc_x = x * self.focal / (self.aspect * depth);
        let ndc_y = y * self.focal / depth;
        Some(([ndc_x, ndc_y], depth))
    }
}

/// Everything the renderer draws
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub particles: Particles,
    pub light: DirectionalLight,
    pub material: Material,
    pub camera: PerspectiveCamera,
}

impl Scene {
    /// Builds the four bodies, the particle field, the light and the camera
    pub fn new<R: Rng + ?Sized>(
        material: Material,
        particle_count: usize,
        aspect: f64,
        rng: &mut R,
    ) -> Self {
        let meshes = vec![
            Mesh::new("torus", torus(1.0, 0.4, 16, 60), [2.0, 0.0, 0.0]),
            Mesh::new("octahedron", octahedron(1.0), [-1.0, 0.0, 0.0]),
            Mesh::new(
                "torus knot",
                torus_knot(0.8, 0.35, 100, 16, 2, 3),
                [2.0, 0.0, -6.0],
            ),
            Mesh::new("icosahedron", icosahedron(1.0), [5.0, 0.0, 3.0]),
        ];

        let particles = Particles {
            positions: particle_field(particle_count, PARTICLE_SPREAD, rng),
            color: [0xff, 0xff, 0xff],
        };

        let light = DirectionalLight {
            color: [0xff, 0xff, 0xff],
            intensity: 4.0,
            position: [0.5, 1.0, 0.0],
        };

        let mut camera = PerspectiveCamera::new(35.0, aspect, 0.1, 100.0);
        camera.position[2] = 6.0;

        Scene {
            meshes,
            particles,
            light,
            material,
            camera,
        }
    }
}
