use crate::math::edge_function;
use crate::state::ViewportSize;
use crate::vertex::Vertex;
use crossterm::style::Color;

/// Glyphs from dim to bright
const SHADE_RAMP: [char; 9] = ['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// One terminal cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
    };

    pub fn rgb(ch: char, color: [u8; 3]) -> Self {
        Cell {
            ch,
            fg: Color::Rgb {
                r: color[0],
                g: color[1],
                b: color[2],
            },
        }
    }
}

/// Picks the ramp glyph for a brightness in [0, 1]
pub fn shade_glyph(intensity: f64) -> char {
    let last = SHADE_RAMP.len() - 1;
    let index = (intensity.clamp(0.0, 1.0) * last as f64).round() as usize;
    SHADE_RAMP[index.min(last)]
}

/// Cell grid with a depth buffer
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    depth: Vec<f64>,
}

impl FrameBuffer {
    pub fn new(viewport: ViewportSize) -> Self {
        let size = viewport.cell_count();
        FrameBuffer {
            width: viewport.width as usize,
            height: viewport.height as usize,
            cells: vec![Cell::BLANK; size],
            depth: vec![f64::INFINITY; size],
        }
    }

    pub fn resize(&mut self, viewport: ViewportSize) {
        *self = FrameBuffer::new(viewport);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.depth.fill(f64::INFINITY);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[cfg(test)]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes `cell` if it is nearer than what the cell already holds
    fn plot(&mut self, x: usize, y: usize, depth: f64, cell: Cell) {
        let offset = y * self.width + x;
        if depth < self.depth[offset] {
            self.depth[offset] = depth;
            self.cells[offset] = cell;
        }
    }

    /// Draws a single depth-tested point at a screen position
    pub fn draw_point(&mut self, screen: [f64; 2], depth: f64, cell: Cell) {
        if screen[0] < 0.0 || screen[1] < 0.0 {
            return;
        }
        let (x, y) = (screen[0] as usize, screen[1] as usize);
        if x < self.width && y < self.height {
            self.plot(x, y, depth, cell);
        }
    }

    /// Writes text over everything drawn so far, clipped to the row
    pub fn write_str(&mut self, x: usize, y: usize, text: &str, fg: Color) {
        if y >= self.height {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let column = x + i;
            if column >= self.width {
                break;
            }
            let offset = y * self.width + column;
            self.cells[offset] = Cell { ch, fg };
            self.depth[offset] = f64::NEG_INFINITY;
        }
    }
}

/// Draws a flat-shaded triangle with a depth test
pub fn draw_triangle(v0: &Vertex, v1: &Vertex, v2: &Vertex, frame: &mut FrameBuffer, cell: Cell) {
    let width = frame.width;
    let height = frame.height;

    // Compute bounding box of the triangle
    let min_x = v0
        .screen_position[0]
        .min(v1.screen_position[0])
        .min(v2.screen_position[0])
        .floor()
        .max(0.0) as usize;
    let max_x = v0
        .screen_position[0]
        .max(v1.screen_position[0])
        .max(v2.screen_position[0])
        .ceil()
        .min(width as f64 - 1.0) as usize;
    let min_y = v0
        .screen_position[1]
        .min(v1.screen_position[1])
        .min(v2.screen_position[1])
        .floor()
        .max(0.0) as usize;
    let max_y = v0
        .screen_position[1]
        .max(v1.screen_position[1])
        .max(v2.screen_position[1])
        .ceil()
        .min(height as f64 - 1.0) as usize;

    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area == 0.0 {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];

            // Dividing by the signed area accepts either winding
            let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
            let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
            let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p) / area;

            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
                frame.plot(x, y, depth, cell);
            }
        }
    }
}

/// Draws a line between two points in the frame using Bresenham's algorithm
pub fn draw_line(x0: f64, y0: f64, x1: f64, y1: f64, frame: &mut FrameBuffer, cell: Cell) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        if x0 >= 0 && x0 < frame.width as isize && y0 >= 0 && y0 < frame.height as isize {
            let offset = y0 as usize * frame.width + x0 as usize;
            frame.cells[offset] = cell;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f64, y: f64, depth: f64) -> Vertex {
        Vertex {
            position: [x, y, -depth],
            screen_position: [x, y],
            depth,
        }
    }

    fn filled(frame: &FrameBuffer, ch: char) -> usize {
        frame.cells().iter().filter(|c| c.ch == ch).count()
    }

    #[test]
    fn triangle_fills_either_winding() {
        let mut frame = FrameBuffer::new(ViewportSize::new(10, 10));
        let (a, b, c) = (vertex(0.0, 0.0, 1.0), vertex(10.0, 0.0, 1.0), vertex(0.0, 10.0, 1.0));
        draw_triangle(&a, &b, &c, &mut frame, Cell::rgb('#', [255, 0, 0]));
        let forward = filled(&frame, '#');
        assert!(forward > 40);

        frame.clear();
        draw_triangle(&a, &c, &b, &mut frame, Cell::rgb('#', [255, 0, 0]));
        assert_eq!(filled(&frame, '#'), forward);
    }

    #[test]
    fn nearer_triangle_wins() {
        let mut frame = FrameBuffer::new(ViewportSize::new(8, 8));
        let near = [vertex(0.0, 0.0, 1.0), vertex(8.0, 0.0, 1.0), vertex(0.0, 8.0, 1.0)];
        let far = [vertex(0.0, 0.0, 5.0), vertex(8.0, 0.0, 5.0), vertex(0.0, 8.0, 5.0)];
        draw_triangle(&near[0], &near[1], &near[2], &mut frame, Cell::rgb('n', [0; 3]));
        draw_triangle(&far[0], &far[1], &far[2], &mut frame, Cell::rgb('f', [0; 3]));
        assert_eq!(filled(&frame, 'f'), 0);
        assert_eq!(frame.cell(0, 0).map(|c| c.ch), Some('n'));
    }

    #[test]
    fn offscreen_triangle_draws_nothing() {
        let mut frame = FrameBuffer::new(ViewportSize::new(8, 8));
        let (a, b, c) = (
            vertex(-20.0, -20.0, 1.0),
            vertex(-10.0, -20.0, 1.0),
            vertex(-20.0, -10.0, 1.0),
        );
        draw_triangle(&a, &b, &c, &mut frame, Cell::rgb('#', [0; 3]));
        assert_eq!(filled(&frame, '#'), 0);
    }

    #[test]
    fn line_is_clipped_to_frame() {
        let mut frame = FrameBuffer::new(ViewportSize::new(5, 5));
        draw_line(-3.0, 2.0, 10.0, 2.0, &mut frame, Cell::rgb('-', [0; 3]));
        assert_eq!(filled(&frame, '-'), 5);
    }

    #[test]
    fn text_overrides_geometry_and_clips() {
        let mut frame = FrameBuffer::new(ViewportSize::new(4, 2));
        frame.draw_point([1.0, 0.0], 0.5, Cell::rgb('.', [0; 3]));
        frame.write_str(0, 0, "fps 60", Color::White);
        let row: String = frame.cells()[..4].iter().map(|c| c.ch).collect();
        assert_eq!(row, "fps ");
        frame.draw_point([1.0, 0.0], 0.1, Cell::rgb('.', [0; 3]));
        assert_eq!(frame.cell(1, 0).map(|c| c.ch), Some('p'));
    }

    #[test]
    fn glyph_ramp_spans_brightness() {
        assert_eq!(shade_glyph(0.0), '.');
        assert_eq!(shade_glyph(1.0), '@');
        assert_eq!(shade_glyph(7.0), '@');
    }
}
