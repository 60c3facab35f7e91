use crate::graphics::{draw_line, draw_triangle, shade_glyph, Cell, FrameBuffer};
use crate::math::{
    add, apply_lighting, calculate_normal, luminance, multiply_matrix_vector, normalize,
    rotation_matrix, scale, shade, sub,
};
use crate::scene::{Mesh, Scene};
use crate::state::ViewportSize;
use crate::vertex::Vertex;
use anyhow::{Context, Result};
use crossterm::{
    cursor, queue,
    style::{Color, Print, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate},
};
use std::io::Write;

/// Text drawn over the scene
#[derive(Clone, Debug, Default)]
pub struct Overlay {
    pub lines: Vec<String>,
    /// Centred message such as "Paused"
    pub banner: Option<String>,
}

/// One frame's worth of drawable state
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub wireframe: bool,
    pub overlay: &'a Overlay,
}

/// Surface the scene is drawn onto
pub trait RenderTarget {
    fn resize(&mut self, viewport: ViewportSize);
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Maps normalized device coordinates to cell coordinates
fn to_screen(ndc: [f64; 2], frame: &FrameBuffer) -> [f64; 2] {
    [
        (ndc[0] + 1.0) / 2.0 * frame.width() as f64,
        (1.0 - ndc[1]) / 2.0 * frame.height() as f64,
    ]
}

/// Transforms and projects a mesh; vertices outside the depth range are `None`
fn project_mesh(mesh: &Mesh, scene: &Scene, frame: &FrameBuffer) -> Vec<Option<Vertex>> {
    let rotation = rotation_matrix(&mesh.rotation);
    mesh.geometry
        .positions
        .iter()
        .map(|p| {
            let position = add(&multiply_matrix_vector(&rotation, p), &mesh.position);
            scene.camera.project(&position).map(|(ndc, depth)| Vertex {
                position,
                screen_position: to_screen(ndc, frame),
                depth,
            })
        })
        .collect()
}

/// Rasterizes the scene and overlay into `frame`
pub fn rasterize(scene: &Scene, wireframe: bool, overlay: &Overlay, frame: &mut FrameBuffer) {
    frame.clear();

    let particle_cell = Cell::rgb('.', scene.particles.color);
    for point in &scene.particles.positions {
        if let Some((ndc, depth)) = scene.camera.project(point) {
            let screen = to_screen(ndc, frame);
            frame.draw_point(screen, depth, particle_cell);
        }
    }

    let light_dir = scene.light.direction();
    let radiance = scene.light.radiance();

    for mesh in &scene.meshes {
        let vertices = project_mesh(mesh, scene, frame);

        if wireframe {
            let cell = Cell::rgb('+', scene.material.color);
            for (start, end) in mesh.geometry.edges() {
                if let (Some(v0), Some(v1)) = (&vertices[start], &vertices[end]) {
                    draw_line(
                        v0.screen_position[0],
                        v0.screen_position[1],
                        v1.screen_position[0],
                        v1.screen_position[1],
                        frame,
                        cell,
                    );
                }
            }
            continue;
        }

        for &[a, b, c] in &mesh.geometry.triangles {
            let (Some(v0), Some(v1), Some(v2)) = (&vertices[a], &vertices[b], &vertices[c]) else {
                continue;
            };
            let normal = calculate_normal(&v0.position, &v1.position, &v2.position);
            let centroid = scale(&add(&add(&v0.position, &v1.position), &v2.position), 1.0 / 3.0);
            let view_dir = normalize(&sub(&scene.camera.position, &centroid));
            let lit = shade(&scene.material, &normal, &light_dir, &view_dir, &radiance);
            let cell = Cell::rgb(shade_glyph(luminance(&lit)), apply_lighting(&lit));
            draw_triangle(v0, v1, v2, frame, cell);
        }
    }

    for (row, line) in overlay.lines.iter().enumerate() {
        frame.write_str(1, row, line, Color::White);
    }
    if let Some(banner) = &overlay.banner {
        let column = frame.width().saturating_sub(banner.chars().count()) / 2;
        frame.write_str(column, frame.height() / 2, banner, Color::White);
    }
}

/// Draws into a terminal, sending only the cells that changed
pub struct TerminalRenderer<W: Write> {
    out: W,
    frame: FrameBuffer,
    previous: Vec<Option<Cell>>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, viewport: ViewportSize) -> Self {
        TerminalRenderer {
            out,
            frame: FrameBuffer::new(viewport),
            previous: vec![None; viewport.cell_count()],
        }
    }

    fn flush_changes(&mut self) -> std::io::Result<()> {
        let width = self.frame.width();
        let mut current_fg = None;

        queue!(self.out, BeginSynchronizedUpdate)?;
        for (i, cell) in self.frame.cells().iter().enumerate() {
            if self.previous[i] == Some(*cell) {
                continue;
            }
            self.previous[i] = Some(*cell);

            queue!(self.out, cursor::MoveTo((i % width) as u16, (i / width) as u16))?;
            if current_fg != Some(cell.fg) {
                current_fg = Some(cell.fg);
                queue!(self.out, SetForegroundColor(cell.fg))?;
            }
            queue!(self.out, Print(cell.ch))?;
        }
        queue!(self.out, EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl<W: Write> RenderTarget for TerminalRenderer<W> {
    fn resize(&mut self, viewport: ViewportSize) {
        self.frame.resize(viewport);
        self.previous = vec![None; viewport.cell_count()];
        if let Err(err) = queue!(self.out, Clear(ClearType::All)) {
            log::warn!("failed to clear terminal after resize: {err}");
        }
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        rasterize(frame.scene, frame.wireframe, frame.overlay, &mut self.frame);
        self.flush_changes().context("failed to draw frame to terminal")
    }
}
