/// Drawable surface size in terminal cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u16,
    pub height: u16,
}

impl ViewportSize {
    /// Builds a viewport, treating a zero dimension as one cell
    pub fn new(width: u16, height: u16) -> Self {
        ViewportSize {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Camera aspect ratio given the height/width ratio of one cell
    pub fn aspect(&self, cell_aspect: f64) -> f64 {
        self.width as f64 / (self.height as f64 * cell_aspect)
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Current viewport
    pub viewport: ViewportSize,
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Wireframe mode enabled
    pub wireframe: bool,
}

impl AppState {
    pub fn new(viewport: ViewportSize) -> Self {
        AppState {
            viewport,
            debug: false,
            paused: false,
            wireframe: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_accounts_for_tall_cells() {
        let viewport = ViewportSize::new(160, 40);
        assert_eq!(viewport.aspect(2.0), 2.0);
        assert_eq!(viewport.aspect(1.0), 4.0);
        assert_eq!(viewport.cell_count(), 6400);
    }

    #[test]
    fn empty_viewport_is_one_cell() {
        assert_eq!(ViewportSize::new(0, 0), ViewportSize { width: 1, height: 1 });
    }
}
