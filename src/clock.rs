use std::time::Duration;

/// Turns wall-clock time into whole simulation ticks.
///
/// Elapsed time is accumulated as lag and paid out one frame at a time; any residue carries over
/// to the next call, so no tick is ever dropped.
#[derive(Clone, Debug)]
pub struct FrameClock {
    frame: Duration,
    lag: Duration,
}

impl FrameClock {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame: frame.max(Duration::from_micros(1)),
            lag: Duration::ZERO,
        }
    }

    pub fn lag(&self) -> Duration {
        self.lag
    }

    /// Adds `elapsed` to the lag and returns how many ticks are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.lag += elapsed;
        let mut due = 0;
        while self.lag >= self.frame {
            self.lag -= self.frame;
            due += 1;
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_elapsed_time_is_kept_as_lag() {
        let mut clock = FrameClock::new(Duration::from_millis(10));
        assert_eq!(clock.advance(Duration::from_millis(4)), 0);
        assert_eq!(clock.advance(Duration::from_millis(4)), 0);
        assert_eq!(clock.advance(Duration::from_millis(4)), 1);
        assert_eq!(clock.lag(), Duration::from_millis(2));
    }

    #[test]
    fn backlog_is_drained_in_one_call() {
        let mut clock = FrameClock::new(Duration::from_millis(10));
        assert_eq!(clock.advance(Duration::from_millis(95)), 9);
        assert_eq!(clock.lag(), Duration::from_millis(5));
        assert_eq!(clock.advance(Duration::from_millis(5)), 1);
        assert_eq!(clock.lag(), Duration::ZERO);
    }
}
