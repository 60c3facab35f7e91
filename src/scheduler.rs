//! Per-refresh callback scheduling.
//!
//! Each callback chain asks for the next display refresh at the end of its own
//! invocation. Chains are independent: one chain failing to re-arm does not
//! affect the others. Nothing runs on its own; the host drives refreshes.

/// Pending frame requests keyed by chain identifier
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: Vec<T>,
    running: bool,
    frame: u64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        FrameScheduler {
            pending: Vec::new(),
            running: false,
            frame: 0,
        }
    }
}

impl<T: PartialEq> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows chains to request frames
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Halts re-scheduling and drops every pending request
    pub fn stop(&mut self) {
        self.running = false;
        self.pending.clear();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queues `chain` for the next refresh.
    ///
    /// Returns false when the scheduler is stopped. A chain requesting twice
    /// before the refresh still runs once.
    pub fn request_frame(&mut self, chain: T) -> bool {
        if !self.running {
            return false;
        }
        if !self.pending.contains(&chain) {
            self.pending.push(chain);
        }
        true
    }

    /// Takes the callbacks due at this refresh, in request order
    pub fn begin_frame(&mut self) -> Vec<T> {
        self.frame += 1;
        std::mem::take(&mut self.pending)
    }

    /// Refreshes observed since creation
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
