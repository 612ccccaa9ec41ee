//! Tick-sampled countdown timer
//!
//! Crouch transitions interpolate over a fixed duration. The countdown is
//! advanced once per physics tick by the owning state; it is never
//! independently scheduled, so interrupting a transition at a tick
//! boundary is always safe.

/// Repeated f32 subtraction leaves a vanishing residue after the final
/// tick (0.25 s at 60 Hz ends near 1e-8, not 0.0); anything below this is
/// done.
const FINISH_EPSILON: f32 = 1e-5;

/// A countdown over a fixed duration, advanced manually by `tick`.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    /// Start a countdown over `duration` seconds. Non-positive durations
    /// produce an already-finished countdown.
    pub fn start(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
        }
    }

    /// Advance the countdown by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    /// Whether the countdown has run out.
    pub fn finished(&self) -> bool {
        self.remaining <= FINISH_EPSILON
    }

    /// Completion fraction in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.remaining / self.duration
        }
    }

    /// Seconds left on the countdown.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_progress() {
        let mut timer = Countdown::start(0.25);
        assert!(!timer.finished());
        assert_eq!(timer.progress(), 0.0);

        timer.tick(0.125);
        assert!((timer.progress() - 0.5).abs() < 1e-6);

        timer.tick(0.2);
        assert!(timer.finished());
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_finished() {
        let timer = Countdown::start(0.0);
        assert!(timer.finished());
        assert_eq!(timer.progress(), 1.0);
    }

    #[test]
    fn test_finishes_in_the_exact_tick_count() {
        // 0.25 s sampled at 60 Hz must finish on the 15th tick; the f32
        // subtraction residue must not cost an extra tick.
        let mut timer = Countdown::start(0.25);
        for _ in 0..14 {
            timer.tick(1.0 / 60.0);
            assert!(!timer.finished());
        }
        timer.tick(1.0 / 60.0);
        assert!(timer.finished());
    }
}
