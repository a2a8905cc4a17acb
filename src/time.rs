//! Fixed-timestep game clock using an accumulator pattern.
//!
//! The browser render loop calls at ~60fps with a variable delta. GameTime
//! converts that into a fixed number of discrete ticks per second. The game
//! runs at 10 ticks/sec, so one tick is the 100ms cadence the oven timer
//! counts in — logic never touches the wall clock and stays deterministic.

pub struct GameTime {
    /// Milliseconds per tick (100ms at 10 ticks/sec)
    ms_per_tick: f64,
    /// Milliseconds received but not yet consumed as whole ticks
    accumulator: f64,
    /// Total elapsed ticks since creation
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None until the first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ticks_per_sec`: how many game ticks per real-time second.
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec as f64,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (`performance.now()`). Returns how many
    /// whole ticks elapsed since the previous call; the remainder stays in
    /// the accumulator. Call once per draw frame and pass the result to
    /// `Game::tick(delta_ticks)`.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            // Clamp: a backgrounded tab must not replay minutes of oven time
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}
