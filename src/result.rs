use std::time::Duration;

/// Rounded percentage of `score` out of `total`. An empty quiz scores 0.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }

    (100.0 * score as f64 / total as f64).round() as u32
}

/// Eased count-up from zero to a target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub target: u32,
    pub duration: Duration,
}

impl CountUp {
    pub fn new(target: u32, duration: Duration) -> Self {
        Self { target, duration }
    }

    /// Displayed value after `elapsed`, following a cubic ease-out.
    pub fn value_at(&self, elapsed: Duration) -> u32 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.target;
        }

        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = 1.0 - (1.0 - progress).powi(3);
        (self.target as f64 * eased).round() as u32
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Parameters for one call into the confetti library.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiBurst {
    pub particle_count: u32,
    /// Spread in degrees.
    pub spread: u32,
    /// Launch angle in degrees, 90 is straight up.
    pub angle: u32,
    /// Origin as fractions of the viewport, (0, 0) is the top left corner.
    pub origin: (f64, f64),
    pub colors: Vec<&'static str>,
}

const CONFETTI_COLORS: [&str; 5] = ["#15313D", "#3CABDA", "#D0F0FA", "#facc15", "#ef4444"];
const EDGE_BURST_INTERVAL_MS: u64 = 250;
const EDGE_BURST_WINDOW_MS: u64 = 1000;

/// Schedule of confetti bursts for the result view: short bursts from both
/// screen edges for about a second plus one large centered burst.
pub fn celebration_plan() -> Vec<(Duration, ConfettiBurst)> {
    let colors = CONFETTI_COLORS.to_vec();
    let mut plan = vec![(
        Duration::ZERO,
        ConfettiBurst {
            particle_count: 150,
            spread: 100,
            angle: 90,
            origin: (0.5, 0.6),
            colors: colors.clone(),
        },
    )];

    let mut delay = 0;
    while delay < EDGE_BURST_WINDOW_MS {
        for (angle, x) in [(60, 0.0), (120, 1.0)] {
            plan.push((
                Duration::from_millis(delay),
                ConfettiBurst {
                    particle_count: 4,
                    spread: 55,
                    angle,
                    origin: (x, 0.7),
                    colors: colors.clone(),
                },
            ));
        }
        delay += EDGE_BURST_INTERVAL_MS;
    }

    plan
}
