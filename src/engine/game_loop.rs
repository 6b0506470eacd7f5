/// Game loop timing and control system
///
/// Implements a fixed timestep game loop with variable rendering.
/// This ensures physics and game logic updates at a consistent rate
/// while rendering as fast as possible.
use std::time::{Duration, Instant};

/// Default physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Default maximum number of physics steps per frame to prevent spiral of death
pub const MAX_PHYSICS_STEPS: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Fixed-step accumulator.
///
/// Frame time is added to the accumulator and drained in whole steps. A
/// `time_scale` above 1 makes each step cost more frame time, slowing the
/// simulation down without changing the step length the bodies see.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    time_scale: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(fps: f32, time_scale: f32, max_steps: u32) -> Self {
        Self {
            step: if fps > 0.0 { 1.0 / fps } else { FIXED_TIMESTEP },
            time_scale: if time_scale > 0.0 { time_scale } else { 1.0 },
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed seconds, returning how many steps to run now.
    ///
    /// At most `max_steps` are returned; time beyond that is dropped so a
    /// long stall does not turn into a burst of catch-up steps.
    pub fn accumulate(&mut self, frame_secs: f32) -> u32 {
        if !(frame_secs > 0.0) || !frame_secs.is_finite() {
            return 0;
        }

        self.accumulator += frame_secs;
        let cost = self.step * self.time_scale;

        let mut steps = 0;
        while self.accumulator >= cost && steps < self.max_steps {
            self.accumulator -= cost;
            steps += 1;
        }

        if self.accumulator >= cost {
            log::debug!(
                "Dropping {:.4}s of simulation time after {} steps",
                self.accumulator - self.accumulator % cost,
                steps
            );
            self.accumulator %= cost;
        }

        steps
    }

    /// Length of one step in simulated seconds
    pub fn step_seconds(&self) -> f32 {
        self.step
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        if time_scale > 0.0 {
            self.time_scale = time_scale;
        }
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / (self.step * self.time_scale)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(60.0, 1.0, MAX_PHYSICS_STEPS)
    }
}

/// Game loop timing state
pub struct GameLoop {
    /// Accumulator for fixed timestep updates
    timestep: FixedTimestep,

    /// Time of last frame
    last_frame_time: Instant,

    /// Time when game loop started
    start_time: Instant,

    /// Whether the game is paused
    paused: bool,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,

    /// Delta time for rendering (time since last frame)
    render_delta_time: f32,
}

impl GameLoop {
    /// Create a new game loop stepping at 60 Hz
    pub fn new() -> Self {
        Self::with_timestep(FixedTimestep::default())
    }

    pub fn with_timestep(timestep: FixedTimestep) -> Self {
        let now = Instant::now();
        Self {
            timestep,
            last_frame_time: now,
            start_time: now,
            paused: false,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            update_count: 0,
            current_fps: 0.0,
            render_delta_time: 0.0,
        }
    }

    /// Begin a new frame, returns the number of fixed updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        // Store frame time for FPS calculation
        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        self.render_delta_time = frame_time.as_secs_f32();

        if self.paused {
            return 0;
        }

        let updates = self.timestep.accumulate(self.render_delta_time);
        self.update_count += updates as u64;
        updates
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        self.timestep.step_seconds()
    }

    /// Get the delta time since last render (in seconds)
    pub fn render_delta_time(&self) -> f32 {
        self.render_delta_time
    }

    /// Get the interpolation alpha for smooth rendering between physics steps
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total elapsed time since start
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }

    /// Get total elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.timestep.reset();
            log::info!("Game resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Update FPS calculation
    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_fixed_timestep() {
        let game_loop = GameLoop::new();
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());

        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();

        thread::sleep(Duration::from_millis(50));

        assert_eq!(game_loop.begin_frame(), 0);
    }

    #[test]
    fn test_frame_counting() {
        let mut game_loop = GameLoop::new();
        game_loop.begin_frame();
        game_loop.begin_frame();
        assert_eq!(game_loop.frame_count(), 2);
    }

    #[test]
    fn test_max_physics_steps_limit() {
        let mut game_loop = GameLoop::new();

        // Simulate a very long frame (300ms)
        thread::sleep(Duration::from_millis(300));

        let updates = game_loop.begin_frame();
        assert_eq!(updates, MAX_PHYSICS_STEPS);
        assert!(game_loop.alpha() < 1.0);
    }

    #[test]
    fn test_accumulator_carries_leftover() {
        let mut timestep = FixedTimestep::new(10.0, 1.0, 5);
        assert_eq!(timestep.accumulate(0.15), 1);
        assert!((timestep.alpha() - 0.5).abs() < 1e-4);
        assert_eq!(timestep.accumulate(0.06), 1);
        assert_eq!(timestep.accumulate(0.0), 0);
    }

    #[test]
    fn test_accumulator_caps_and_drops_excess() {
        let mut timestep = FixedTimestep::new(10.0, 1.0, 3);
        assert_eq!(timestep.accumulate(1.05), 3);
        assert!(timestep.alpha() < 1.0);
        assert_eq!(timestep.accumulate(0.01), 0);
    }

    #[test]
    fn test_time_scale_slows_stepping() {
        let mut timestep = FixedTimestep::new(10.0, 2.0, 5);
        assert_eq!(timestep.accumulate(0.15), 0);
        assert_eq!(timestep.accumulate(0.1), 1);
        assert!((timestep.step_seconds() - 0.1).abs() < 1e-6);
    }
}
