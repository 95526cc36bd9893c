/// Pausable animation timers driven by frame time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Wraps around every `duration` seconds.
    Loop,
    /// Runs once and stays at the end.
    Single,
}

#[derive(Debug, Clone)]
pub struct Timer {
    kind: TimerKind,
    duration: f32,
    elapsed: f32,
    paused: bool,
}

impl Timer {
    /// Non-positive durations are treated as one second.
    pub fn new(kind: TimerKind, duration: f32) -> Self {
        let duration = if duration > 0.0 { duration } else { 1.0 };
        Self {
            kind,
            duration,
            elapsed: 0.0,
            paused: false,
        }
    }

    /// Advance by `dt` seconds unless paused.
    ///
    /// Returns true once a single-shot timer has run past its duration.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.paused {
            self.elapsed += dt.max(0.0);
        }
        self.kind == TimerKind::Single && self.elapsed > self.duration
    }

    /// Position within the cycle in `[0, 1)` for loops, `[0, 1]` for single shots.
    pub fn alpha(&self) -> f32 {
        let ratio = self.elapsed / self.duration;
        match self.kind {
            TimerKind::Loop => ratio.fract(),
            TimerKind::Single => ratio.clamp(0.0, 1.0),
        }
    }

    /// Seconds into the current cycle.
    pub fn progress_secs(&self) -> f32 {
        match self.kind {
            TimerKind::Loop => self.elapsed % self.duration,
            TimerKind::Single => self.elapsed.min(self.duration),
        }
    }

    pub fn rewind(&mut self, secs: f32) {
        self.elapsed = (self.elapsed - secs).max(0.0);
    }

    pub fn fast_forward(&mut self, secs: f32) {
        self.elapsed += secs.max(0.0);
    }

    pub fn set_pause(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Flip the pause state and return the new one.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}
