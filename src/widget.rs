use crate::clock::Clock;
use crate::orbit::OrbitController;
use crate::panel::DebugPanel;
use crate::parallax::ParallaxController;
use crate::renderer::{Frame, Overlay, RenderTarget};
use crate::rotation::SelfRotationUpdater;
use crate::scene::Scene;
use crate::scheduler::FrameScheduler;
use crate::state::{AppState, ViewportSize};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::time::Instant;

/// Independently re-armed per-refresh callbacks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameChain {
    /// Orbit tick, frame-counted
    Orbit,
    /// Render, then the time-scaled updaters
    Render,
}

/// Input tuning that has no place in the scene itself
#[derive(Clone, Copy, Debug)]
pub struct WidgetOptions {
    /// Cell height / cell width of the terminal
    pub cell_aspect: f64,
    /// Wheel deltaY for one scroll notch
    pub wheel_step: f64,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        WidgetOptions {
            cell_aspect: 2.0,
            wheel_step: 100.0,
        }
    }
}

/// Interactive 3D scene
pub struct SceneWidget<C: Clock> {
    state: AppState,
    scene: Scene,
    orbit: OrbitController,
    spin: SelfRotationUpdater,
    parallax: ParallaxController,
    panel: DebugPanel,
    clock: C,
    scheduler: FrameScheduler<FrameChain>,
    options: WidgetOptions,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl<C: Clock> SceneWidget<C> {
    pub fn new(scene: Scene, state: AppState, clock: C, options: WidgetOptions) -> Self {
        SceneWidget {
            state,
            scene,
            orbit: OrbitController::new(),
            spin: SelfRotationUpdater::default(),
            parallax: ParallaxController::new(),
            panel: DebugPanel::for_material(),
            clock,
            scheduler: FrameScheduler::new(),
            options,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    /// Sizes the target and runs the first invocation of both chains
    pub fn start<R: RenderTarget>(&mut self, target: &mut R) -> Result<()> {
        let names: Vec<&str> = self.scene.meshes.iter().map(|m| m.name).collect();
        log::info!(
            "starting scene with meshes [{}] and {} particles in {}x{} cells",
            names.join(", "),
            self.scene.particles.positions.len(),
            self.state.viewport.width,
            self.state.viewport.height
        );
        self.scheduler.start();
        self.resize(self.state.viewport, target);
        self.orbit_frame();
        self.render_frame(target)
    }

    /// Halts re-scheduling; pending callbacks are dropped
    pub fn stop(&mut self) {
        if self.scheduler.is_running() {
            log::info!("stopping after {} refreshes", self.scheduler.frame());
        }
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Runs every callback due at this display refresh
    pub fn refresh<R: RenderTarget>(&mut self, target: &mut R) -> Result<()> {
        for chain in self.scheduler.begin_frame() {
            match chain {
                FrameChain::Orbit => self.orbit_frame(),
                FrameChain::Render => self.render_frame(target)?,
            }
        }
        Ok(())
    }

    fn orbit_frame(&mut self) {
        if !self.state.paused {
            self.orbit.tick();
            self.apply_orbit();
        }
        self.scheduler.request_frame(FrameChain::Orbit);
    }

    fn render_frame<R: RenderTarget>(&mut self, target: &mut R) -> Result<()> {
        self.count_frame();
        let overlay = self.overlay();
        target.render(&Frame {
            scene: &self.scene,
            wireframe: self.state.wireframe,
            overlay: &overlay,
        })?;

        let dt = self.clock.delta();
        if !self.state.paused {
            self.spin.update(self.scene.meshes.iter_mut(), dt);
            self.parallax.update(dt);
            self.apply_camera();
        }

        self.scheduler.request_frame(FrameChain::Render);
        Ok(())
    }

    fn apply_orbit(&mut self) {
        for (mesh, body) in self.scene.meshes.iter_mut().zip(self.orbit.bodies()) {
            mesh.position[0] = body.position[0];
            mesh.position[2] = body.position[1];
        }
    }

    fn apply_camera(&mut self) {
        let camera = self.parallax.camera();
        self.scene.camera.position[0] = camera.x;
        self.scene.camera.position[1] = camera.y;
    }

    fn resize<R: RenderTarget>(&mut self, viewport: ViewportSize, target: &mut R) {
        self.state.viewport = viewport;
        self.scene
            .camera
            .set_aspect(viewport.aspect(self.options.cell_aspect));
        target.resize(viewport);
    }

    /// Handle events for the scene
    pub fn event<R: RenderTarget>(&mut self, event: &Event, target: &mut R) {
        match event {
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                    let delta = if mouse_event.kind == MouseEventKind::ScrollDown {
                        self.options.wheel_step
                    } else {
                        -self.options.wheel_step
                    };
                    log::trace!("wheel delta {delta}");
                    self.orbit.on_wheel_delta(delta);
                }
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    self.parallax.on_pointer_move(
                        mouse_event.column as f64,
                        mouse_event.row as f64,
                        self.state.viewport,
                    );
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                let viewport = ViewportSize::new(*width, *height);
                log::debug!("resized to {}x{}", viewport.width, viewport.height);
                self.resize(viewport, target);
            }
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.key(key_event);
            }
            _ => {}
        }
    }

    fn key(&mut self, key_event: &KeyEvent) {
        let shifted = key_event.modifiers.contains(KeyModifiers::SHIFT);
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.stop();
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.stop(),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.state.debug = !self.state.debug;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.state.paused = !self.state.paused;
                log::info!("{}", if self.state.paused { "paused" } else { "resumed" });
            }
            KeyCode::Char('w') | KeyCode::Char('W') if !self.state.paused => {
                self.state.wireframe = !self.state.wireframe;
            }
            KeyCode::Char('r') | KeyCode::Char('R') if !self.state.paused => self.reset(),
            code if self.state.debug => self.panel_key(code, shifted),
            _ => {}
        }
    }

    fn panel_key(&mut self, code: KeyCode, shifted: bool) {
        let arrow_steps = if shifted { 10 } else { 1 };
        match code {
            KeyCode::Tab | KeyCode::Down => self.panel.select_next(),
            KeyCode::BackTab | KeyCode::Up => self.panel.select_previous(),
            KeyCode::Right => self.panel.adjust(&mut self.scene.material, arrow_steps),
            KeyCode::Left => self.panel.adjust(&mut self.scene.material, -arrow_steps),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.panel.adjust(&mut self.scene.material, 1)
            }
            KeyCode::Char('-') => self.panel.adjust(&mut self.scene.material, -1),
            _ => {}
        }
    }

    /// Puts the orbit, camera and mesh spin back to their starting values
    fn reset(&mut self) {
        self.orbit.reset();
        self.apply_orbit();
        self.parallax.reset();
        self.apply_camera();
        for mesh in &mut self.scene.meshes {
            mesh.rotation = [0.0; 3];
        }
    }

    fn count_frame(&mut self) {
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
    }

    fn overlay(&mut self) -> Overlay {
        let banner = self.state.paused.then(|| "Paused".to_string());
        if !self.state.debug {
            return Overlay {
                lines: Vec::new(),
                banner,
            };
        }

        let orbit = self.orbit.state();
        let camera = self.parallax.camera();
        let cursor = self.parallax.cursor();
        let mut lines = vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("FPS: {:.2}", self.fps),
            format!(
                "Orbit angle: {:.2}, velocity: {:.4}",
                orbit.angle, orbit.angular_velocity
            ),
            format!("Camera X: {:.2}, Y: {:.2}", camera.x, camera.y),
            format!("Cursor X: {:.2}, Y: {:.2}", cursor.x, cursor.y),
            format!(
                "Viewport: {}x{}",
                self.state.viewport.width, self.state.viewport.height
            ),
            String::new(),
        ];
        lines.extend(self.panel.lines(&self.scene.material));
        Overlay { lines, banner }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[cfg(test)]
    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    #[cfg(test)]
    pub fn parallax(&self) -> &ParallaxController {
        &self.parallax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::orbit::{ORBIT_CENTER, ORBIT_RADIUS};
    use crate::scene::Material;
    use crossterm::event::{MouseButton, MouseEvent};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingTarget {
        renders: usize,
        sizes: Vec<ViewportSize>,
        /// Camera X and first mesh rotation seen at each render
        seen: Vec<(f64, f64)>,
        banners: Vec<Option<String>>,
        overlay_lines: usize,
    }

    impl RenderTarget for RecordingTarget {
        fn resize(&mut self, viewport: ViewportSize) {
            self.sizes.push(viewport);
        }

        fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
            self.renders += 1;
            self.seen.push((
                frame.scene.camera.position[0],
                frame.scene.meshes[0].rotation[0],
            ));
            self.banners.push(frame.overlay.banner.clone());
            self.overlay_lines = frame.overlay.lines.len();
            Ok(())
        }
    }

    fn widget() -> SceneWidget<ManualClock> {
        let viewport = ViewportSize::new(100, 40);
        let mut rng = StdRng::seed_from_u64(5);
        let scene = Scene::new(Material::default(), 10, viewport.aspect(2.0), &mut rng);
        SceneWidget::new(
            scene,
            AppState::new(viewport),
            ManualClock::default(),
            WidgetOptions::default(),
        )
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn start_runs_both_chains_once_and_rearms() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        assert_eq!(target.renders, 1);
        assert_eq!(target.sizes, vec![ViewportSize::new(100, 40)]);

        let first = widget.scene().meshes[0].position;
        assert!((first[0] - (ORBIT_CENTER[0] + ORBIT_RADIUS)).abs() < 1e-12);
        assert!((first[2] - ORBIT_CENTER[1]).abs() < 1e-12);

        widget.refresh(&mut target).unwrap();
        widget.refresh(&mut target).unwrap();
        assert_eq!(target.renders, 3);
        assert!(widget.is_running());
    }

    #[test]
    fn render_happens_before_the_update() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();

        widget.clock.advance(0.5);
        widget.refresh(&mut target).unwrap();
        // The frame drawn at this refresh still shows the old rotation.
        assert_eq!(target.seen[1].1, 0.0);
        assert!((widget.scene().meshes[0].rotation[0] - 0.05).abs() < 1e-12);
        assert!((widget.scene().meshes[3].rotation[1] - 0.06).abs() < 1e-12);
    }

    #[test]
    fn wheel_spins_the_orbit_and_decays() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();

        widget.event(&mouse(MouseEventKind::ScrollDown, 0, 0), &mut target);
        assert!((widget.orbit().state().angular_velocity - 0.02).abs() < 1e-12);

        widget.refresh(&mut target).unwrap();
        let state = widget.orbit().state();
        assert!((state.angle - 0.02).abs() < 1e-12);
        assert!((state.angular_velocity - 0.02 * 0.93).abs() < 1e-12);

        widget.event(&mouse(MouseEventKind::ScrollUp, 0, 0), &mut target);
        assert!((widget.orbit().state().angular_velocity - (0.0186 - 0.02)).abs() < 1e-12);
    }

    #[test]
    fn orbit_ticks_without_elapsed_time() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        widget.event(&mouse(MouseEventKind::ScrollDown, 0, 0), &mut target);
        widget.refresh(&mut target).unwrap();
        // No clock advance: rotation stays, orbit still moved.
        assert_eq!(widget.scene().meshes[0].rotation[0], 0.0);
        assert!(widget.orbit().state().angle > 0.0);
    }

    #[test]
    fn pointer_drives_the_camera() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();

        widget.event(&mouse(MouseEventKind::Moved, 70, 20), &mut target);
        assert!((widget.parallax().cursor().x - 0.2).abs() < 1e-12);

        widget.clock.advance(0.4);
        widget.refresh(&mut target).unwrap();
        assert!((widget.scene().camera.position[0] - 0.2).abs() < 1e-12);
        assert_eq!(widget.scene().camera.position[2], 6.0);

        widget.event(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 99, 20),
            &mut target,
        );
        widget.clock.advance(0.1);
        widget.refresh(&mut target).unwrap();
        assert_eq!(widget.scene().camera.position[0], 0.0);
    }

    #[test]
    fn resize_updates_viewport_and_aspect() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        widget.event(&Event::Resize(120, 30), &mut target);
        assert_eq!(widget.state().viewport, ViewportSize::new(120, 30));
        assert_eq!(widget.scene().camera.aspect, 2.0);
        assert_eq!(target.sizes.last(), Some(&ViewportSize::new(120, 30)));

        widget.event(&mouse(MouseEventKind::Moved, 90, 15), &mut target);
        assert!((widget.parallax().cursor().x - 0.25).abs() < 1e-12);
    }

    #[test]
    fn pause_freezes_motion_but_keeps_rendering() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        widget.event(&mouse(MouseEventKind::ScrollDown, 0, 0), &mut target);
        widget.event(&key(KeyCode::Char('p')), &mut target);
        assert!(widget.state().paused);

        let angle = widget.orbit().state().angle;
        widget.clock.advance(1.0);
        widget.refresh(&mut target).unwrap();
        assert_eq!(widget.orbit().state().angle, angle);
        assert_eq!(widget.scene().meshes[0].rotation[0], 0.0);
        assert_eq!(target.banners.last(), Some(&Some("Paused".to_string())));

        // The paused interval was consumed, so resuming does not jump.
        widget.event(&key(KeyCode::Char('p')), &mut target);
        widget.refresh(&mut target).unwrap();
        assert_eq!(widget.scene().meshes[0].rotation[0], 0.0);
        assert_eq!(target.renders, 3);
    }

    #[test]
    fn wheel_while_paused_applies_on_resume() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        widget.event(&key(KeyCode::Char('p')), &mut target);

        widget.event(&mouse(MouseEventKind::ScrollDown, 0, 0), &mut target);
        assert!((widget.orbit().state().angular_velocity - 0.02).abs() < 1e-12);
        widget.refresh(&mut target).unwrap();
        assert_eq!(widget.orbit().state().angle, 0.0);

        widget.event(&key(KeyCode::Char('p')), &mut target);
        widget.refresh(&mut target).unwrap();
        assert!((widget.orbit().state().angle - 0.02).abs() < 1e-12);
    }

    #[test]
    fn quit_stops_both_chains() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        widget.event(&key(KeyCode::Char('q')), &mut target);
        assert!(!widget.is_running());
        widget.refresh(&mut target).unwrap();
        assert_eq!(target.renders, 1);

        let mut widget = self::widget();
        widget.start(&mut target).unwrap();
        widget.event(
            &Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            &mut target,
        );
        assert!(!widget.is_running());
    }

    #[test]
    fn debug_panel_edits_material() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();

        // Panel keys are ignored while the overlay is hidden.
        widget.event(&key(KeyCode::Down), &mut target);
        widget.event(&key(KeyCode::Right), &mut target);
        assert_eq!(widget.scene().material, Material::default());

        widget.event(&key(KeyCode::Char('d')), &mut target);
        for _ in 0..3 {
            widget.event(&key(KeyCode::Down), &mut target);
        }
        widget.event(
            &Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT)),
            &mut target,
        );
        assert!((widget.scene().material.metalness - 0.87).abs() < 1e-9);

        widget.refresh(&mut target).unwrap();
        assert_eq!(target.overlay_lines, 12);
    }

    #[test]
    fn reset_restores_start_pose() {
        let mut widget = widget();
        let mut target = RecordingTarget::default();
        widget.start(&mut target).unwrap();
        widget.event(&mouse(MouseEventKind::ScrollDown, 0, 0), &mut target);
        widget.event(&mouse(MouseEventKind::Moved, 70, 20), &mut target);
        widget.clock.advance(0.3);
        widget.refresh(&mut target).unwrap();

        widget.event(&key(KeyCode::Char('r')), &mut target);
        assert_eq!(widget.orbit().state().angle, 0.0);
        assert_eq!(widget.scene().camera.position, [0.0, 0.0, 6.0]);
        assert_eq!(widget.scene().meshes[1].rotation, [0.0; 3]);
    }
}
