use std::time::{Duration, Instant};

/// Frame clock: measures wall-clock delta per frame and hands out fixed
/// simulation steps of `1 / framerate` seconds.
pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
}

impl TimeState {
    pub fn new(framerate: u32) -> Self {
        let fixed_dt = 1.0 / f64::from(framerate.max(1));
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed an already-measured delta. `begin_frame` goes through here; tests
    /// call it directly to stay off the wall clock.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
    }

    /// Restart the clock without banking any time. Used while the window is
    /// minimised so restoring it does not replay the gap as a burst of steps.
    pub fn pause(&mut self) {
        self.last_instant = Instant::now();
        self.accumulator = 0.0;
        self.real_dt = 0.0;
        self.steps_this_frame = 0;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

/// Caps the loop rate by blocking at the end of each iteration.
pub struct FrameLimiter {
    frame_duration: Duration,
    next_deadline: Instant,
}

impl FrameLimiter {
    pub fn new(framerate: u32) -> Self {
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(framerate.max(1)));
        Self {
            frame_duration,
            next_deadline: Instant::now() + frame_duration,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Time left before the current deadline, then advance the deadline by one
    /// frame. A loop that fell behind by more than a whole frame resyncs to
    /// `now` instead of sprinting to catch up.
    pub fn next_wait(&mut self, now: Instant) -> Duration {
        let wait = self.next_deadline.saturating_duration_since(now);
        if now > self.next_deadline + self.frame_duration {
            self.next_deadline = now + self.frame_duration;
        } else {
            self.next_deadline += self.frame_duration;
        }
        wait
    }

    pub fn wait(&mut self) {
        let wait = self.next_wait(Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dt_follows_framerate() {
        let time = TimeState::new(60);
        assert!((time.fixed_dt - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn zero_framerate_does_not_divide_by_zero() {
        let time = TimeState::new(0);
        assert_eq!(time.fixed_dt, 1.0);
    }

    #[test]
    fn accumulator_yields_whole_steps() {
        let mut time = TimeState::new(50);
        time.advance(0.05);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(time.steps_this_frame, 2);
    }

    #[test]
    fn pause_drops_banked_time() {
        let mut time = TimeState::new(60);
        time.advance(0.2);
        time.pause();
        assert!(!time.should_step());
        assert_eq!(time.steps_this_frame, 0);

        time.advance(1.0 / 60.0);
        assert!(time.should_step());
        assert!(!time.should_step());
    }

    #[test]
    fn long_frame_is_capped() {
        let mut time = TimeState::new(60);
        time.advance(5.0);
        assert_eq!(time.real_dt, time.max_accumulator);
    }

    #[test]
    fn limiter_waits_out_the_rest_of_the_frame() {
        let mut limiter = FrameLimiter::new(50);
        let start = limiter.next_deadline - limiter.frame_duration();
        let wait = limiter.next_wait(start + Duration::from_millis(5));
        assert_eq!(wait, Duration::from_millis(15));
    }

    #[test]
    fn limiter_resyncs_after_falling_behind() {
        let mut limiter = FrameLimiter::new(50);
        let late = limiter.next_deadline + Duration::from_millis(100);
        assert!(limiter.next_wait(late).is_zero());
        assert_eq!(limiter.next_deadline, late + limiter.frame_duration());
    }
}
