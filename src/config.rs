/// Gameplay tuning constants. Times are milliseconds, positions are percent of the
/// play field width/height.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Session
    pub const START_LIVES: u32 = 3;

    // Spawning
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const SPAWN_X: f64 = 110.0;
    pub const LANE_MIN_Y: f64 = 10.0;
    pub const LANE_SPAN_Y: f64 = 50.0;

    // Falling: one step per `speed * FALL_STEP_SCALE` ms
    pub const BASE_X: f64 = -10.0;
    pub const FALL_STEP_SCALE: f64 = 10.0;

    // Transitions
    pub const FEEDBACK_MS: f64 = 1000.0;
    pub const GAME_OVER_DELAY_MS: f64 = 2000.0;
    pub const RESULTS_DELAY_MS: f64 = 1500.0;
    pub const NOTICE_MS: f64 = 3000.0;

    // Frame loop
    pub const MAX_FRAME_MS: f64 = 100.0;

    // Performance screen
    pub const TOP_RECORDS: usize = 10;
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub start_lives: u32,
    pub spawn_interval_ms: f64,
    pub spawn_x: f64,
    pub lane_min_y: f64,
    pub lane_span_y: f64,
    pub base_x: f64,
    pub fall_step_scale: f64,
    pub feedback_ms: f64,
    pub game_over_delay_ms: f64,
    pub results_delay_ms: f64,
    pub notice_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_lives: Params::START_LIVES,
            spawn_interval_ms: Params::SPAWN_INTERVAL_MS,
            spawn_x: Params::SPAWN_X,
            lane_min_y: Params::LANE_MIN_Y,
            lane_span_y: Params::LANE_SPAN_Y,
            base_x: Params::BASE_X,
            fall_step_scale: Params::FALL_STEP_SCALE,
            feedback_ms: Params::FEEDBACK_MS,
            game_over_delay_ms: Params::GAME_OVER_DELAY_MS,
            results_delay_ms: Params::RESULTS_DELAY_MS,
            notice_ms: Params::NOTICE_MS,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds between two one-unit steps for a character falling at `speed`.
    pub fn fall_step_ms(&self, speed: f64) -> f64 {
        speed * self.fall_step_scale
    }
}
