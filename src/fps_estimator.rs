use log::info;
#[derive(Debug)]
pub struct FpsEstimator {
    iteration_start: std::time::Instant,
    pub iteration_duration: std::time::Duration,
}

static NATIVE_SLEEP_ACCURACY: std::time::Duration = std::time::Duration::from_micros(500);

// Whole ticks covering `duration` at `tick_rate` ticks per second, at least one.
pub fn duration_to_ticks(duration: std::time::Duration, tick_rate: f64) -> u64 {
    let ticks = (duration.as_secs_f64() * tick_rate).round();
    if ticks.is_finite() && ticks >= 1.0 {
        ticks as u64
    } else {
        1
    }
}

impl FpsEstimator {
    pub fn new(fps: f64) -> FpsEstimator {
        FpsEstimator {
            iteration_start: std::time::Instant::now(),
            iteration_duration: std::time::Duration::from_secs_f64(1.0 / fps),
        }
    }

    fn high_resolution_sleep_until(done: &std::time::Instant) {
        let now = std::time::Instant::now();
        let system_sleep_until = done.checked_sub(NATIVE_SLEEP_ACCURACY).unwrap_or(now);
        if now < system_sleep_until {
            std::thread::sleep(system_sleep_until.duration_since(now));
        }
        // Spin out the remainder.
        while std::time::Instant::now() < *done {
            std::hint::spin_loop();
        }
    }

    // Ends the current tick. With `pace`, waits out the rest of the tick budget first.
    pub fn tick(&mut self, pace: bool) -> std::time::Duration {
        let sleep_until = self.iteration_start + self.iteration_duration;
        if pace {
            FpsEstimator::high_resolution_sleep_until(&sleep_until);
        }
        let now = std::time::Instant::now();
        if pace && now > sleep_until {
            let overslept_by = now - sleep_until;
            info!("Over time budget by: {:?}", overslept_by);
        }
        let delta_t = self.iteration_start.elapsed();
        self.iteration_start = std::time::Instant::now();
        delta_t
    }
}
