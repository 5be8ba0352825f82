//! Fixed timestep game loop
//!
//! Turns variable frame-callback timestamps into a deterministic stream of fixed-size
//! simulation steps followed by exactly one render. The platform frame source (display
//! refresh callback, timer, or a test harness) sits behind [`FrameScheduler`].

use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};

/// Source of "call me on the next frame" requests
pub trait FrameScheduler {
    type Handle;

    /// Ask for one more frame callback
    fn request_frame(&mut self) -> Self::Handle;

    /// Release a pending request
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// What the loop drives each frame
pub trait FrameHandler {
    /// One fixed simulation step; `dt` is always the configured step in seconds
    fn update(&mut self, dt: f32);

    /// Draw the settled state; called once per frame after all steps
    fn render(&mut self);
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Simulation step in milliseconds
    pub step_ms: f64,
    /// Catch-up steps allowed per frame; backlog beyond this is dropped
    pub max_substeps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            step_ms: SIM_DT_MS,
            max_substeps: Some(MAX_SUBSTEPS),
        }
    }
}

pub struct GameLoop<S: FrameScheduler> {
    scheduler: S,
    config: LoopConfig,
    pending: Option<S::Handle>,
    running: bool,
    last_time_ms: f64,
    accumulated_ms: f64,
    total_steps: u64,
}

impl<S: FrameScheduler> GameLoop<S> {
    pub fn new(scheduler: S, config: LoopConfig) -> Self {
        Self {
            scheduler,
            config,
            pending: None,
            running: false,
            last_time_ms: 0.0,
            accumulated_ms: 0.0,
            total_steps: 0,
        }
    }

    /// Begin scheduling; no-op when already running
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_time_ms = now_ms;
        self.accumulated_ms = 0.0;
        self.pending = Some(self.scheduler.request_frame());
        log::debug!("game loop started at {:.1}ms", now_ms);
    }

    /// Halt scheduling and release the pending frame request; no-op when stopped
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::debug!("game loop stopped after {} steps", self.total_steps);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Simulation step in seconds
    pub fn step_secs(&self) -> f32 {
        (self.config.step_ms / 1000.0) as f32
    }

    /// Total fixed steps executed since construction
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Frame callback. Runs as many fixed steps as the elapsed time allows, renders once,
    /// and reschedules. Returns the number of steps executed.
    pub fn frame(&mut self, now_ms: f64, handler: &mut impl FrameHandler) -> u32 {
        if !self.running {
            return 0;
        }
        // This callback consumed the pending request
        self.pending = None;

        // Clock went backwards: treat as no time passed
        let delta = (now_ms - self.last_time_ms).max(0.0);
        self.last_time_ms = now_ms;
        self.accumulated_ms += delta;

        let step_ms = self.config.step_ms;
        let dt = self.step_secs();
        let mut substeps = 0;
        while self.accumulated_ms >= step_ms {
            if self.config.max_substeps.is_some_and(|max| substeps >= max) {
                log::debug!(
                    "dropping {:.1}ms of simulation backlog after {} substeps",
                    self.accumulated_ms,
                    substeps
                );
                self.accumulated_ms %= step_ms;
                break;
            }
            handler.update(dt);
            self.accumulated_ms -= step_ms;
            substeps += 1;
        }
        self.total_steps += u64::from(substeps);

        handler.render();

        self.pending = Some(self.scheduler.request_frame());
        substeps
    }
}

/// Frame source driven by hand: tests and headless runs call [`GameLoop::frame`]
/// with synthetic timestamps
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    pending: Option<u64>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    type Handle = u64;

    fn request_frame(&mut self) -> u64 {
        self.next_handle += 1;
        self.requested += 1;
        self.pending = Some(self.next_handle);
        self.next_handle
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    #[derive(Default)]
    struct Recorder {
        dts: Vec<f32>,
        /// Number of updates seen when each render happened
        renders: Vec<usize>,
    }

    impl FrameHandler for Recorder {
        fn update(&mut self, dt: f32) {
            self.dts.push(dt);
        }

        fn render(&mut self) {
            self.renders.push(self.dts.len());
        }
    }

    fn started_loop() -> GameLoop<ManualScheduler> {
        let mut game_loop = GameLoop::new(ManualScheduler::new(), LoopConfig::default());
        game_loop.start(0.0);
        game_loop
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut game_loop = GameLoop::new(ManualScheduler::new(), LoopConfig::default());
        game_loop.stop();
        assert_eq!(game_loop.scheduler().cancelled(), 0);

        game_loop.start(0.0);
        game_loop.start(5.0);
        assert_eq!(game_loop.scheduler().requested(), 1);
        assert!(game_loop.scheduler().has_pending());

        game_loop.stop();
        game_loop.stop();
        assert_eq!(game_loop.scheduler().cancelled(), 1);
        assert!(!game_loop.scheduler().has_pending());
        assert!(!game_loop.is_running());
    }

    #[test]
    fn test_stopped_loop_ignores_frames() {
        let mut game_loop = started_loop();
        game_loop.stop();
        let mut rec = Recorder::default();
        assert_eq!(game_loop.frame(1000.0, &mut rec), 0);
        assert!(rec.renders.is_empty());
    }

    #[test]
    fn test_render_once_after_catch_up() {
        let mut game_loop = started_loop();
        let mut rec = Recorder::default();
        let steps = game_loop.frame(SIM_DT_MS * 3.5, &mut rec);
        assert_eq!(steps, 3);
        assert_eq!(rec.renders, vec![3]);

        // Short frame: no steps, still one render
        let steps = game_loop.frame(SIM_DT_MS * 3.6, &mut rec);
        assert_eq!(steps, 0);
        assert_eq!(rec.renders, vec![3, 3]);
        assert_eq!(game_loop.scheduler().requested(), 3);
    }

    #[test]
    fn test_long_pause_is_capped() {
        let mut game_loop = started_loop();
        let mut rec = Recorder::default();
        let steps = game_loop.frame(10_000.0, &mut rec);
        assert_eq!(steps, MAX_SUBSTEPS);
        // Backlog dropped: next normal frame runs one step
        let steps = game_loop.frame(10_000.0 + SIM_DT_MS, &mut rec);
        assert!(steps <= 2);
    }

    #[test]
    fn test_uncapped_loop_catches_up_fully() {
        let config = LoopConfig {
            max_substeps: None,
            ..Default::default()
        };
        let mut game_loop = GameLoop::new(ManualScheduler::new(), config);
        game_loop.start(0.0);
        let mut rec = Recorder::default();
        assert_eq!(game_loop.frame(1000.0, &mut rec), 60);
    }

    #[test]
    fn test_backwards_clock_is_clamped() {
        let mut game_loop = started_loop();
        let mut rec = Recorder::default();
        game_loop.frame(100.0, &mut rec);
        let before = rec.dts.len();
        assert_eq!(game_loop.frame(50.0, &mut rec), 0);
        assert_eq!(rec.dts.len(), before);
    }

    proptest! {
        /// Step count tracks floor(total / step) and every step is exactly the fixed size
        #[test]
        fn prop_fixed_steps(deltas in prop::collection::vec(0.0f64..100.0, 1..200)) {
            let mut game_loop = started_loop();
            let mut rec = Recorder::default();
            let mut now = 0.0;
            for d in &deltas {
                now += d;
                game_loop.frame(now, &mut rec);
            }
            let expected = (now / SIM_DT_MS).floor() as i64;
            let actual = rec.dts.len() as i64;
            prop_assert!((expected - actual).abs() <= 1, "expected {} got {}", expected, actual);
            prop_assert!(rec.dts.iter().all(|&dt| dt == SIM_DT));
            prop_assert_eq!(rec.renders.len(), deltas.len());
        }
    }
}
