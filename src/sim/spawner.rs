// spawner.rs - Particle emission
//
// Arrivals follow a Poisson process: inter-arrival gaps are exponential with
// mean 1 / frequency, so emission has no visible period yet the long-run
// rate converges to `frequency` per second.

use super::{Flake, Viewport};
use crate::config::Config;
use crate::rng::RandomSource;

#[derive(Debug, Clone)]
pub struct Spawner {
    frequency: f64,
    /// Seconds until the next arrival. Infinite when frequency is zero.
    until_next: f64,
}

impl Spawner {
    pub fn new(frequency: f64, rng: &mut impl RandomSource) -> Self {
        let until_next = gap(frequency, rng);
        Self { frequency, until_next }
    }

    /// Number of arrivals in the next `dt` seconds, at most `limit`.
    /// Arrivals past `limit` are dropped and the next gap is drawn from now.
    pub fn poll(&mut self, dt: f64, limit: usize, rng: &mut impl RandomSource) -> usize {
        if !(dt > 0.0) { return 0; }

        self.until_next -= dt;
        let mut count = 0;
        while self.until_next <= 0.0 {
            if count == limit {
                log::debug!("spawn limit {limit} reached, backlog dropped");
                self.until_next = gap(self.frequency, rng);
                break;
            }
            count += 1;
            self.until_next += gap(self.frequency, rng);
        }
        count
    }

    /// Draw a fresh particle just above the top edge of `view`.
    pub fn emit(id: u64, config: &Config, view: Viewport, rng: &mut impl RandomSource) -> Flake {
        let radius = sample(config.radius().min, config.radius().max, rng);
        let speed = sample(config.speed().min, config.speed().max, rng);
        let angle = sample(config.angle().min, config.angle().max, rng);
        let color = rng.index(config.colors().len());
        let x = rng.range(0.0, view.width);

        Flake {
            id,
            x,
            y: -radius,
            vx: speed * angle.sin(),
            vy: speed * angle.cos(),
            radius,
            color,
        }
    }
}

/// Exponential inter-arrival gap in seconds.
fn gap(frequency: f64, rng: &mut impl RandomSource) -> f64 {
    if frequency <= 0.0 { return f64::INFINITY; }
    // 1 - u lies in (0, 1], keeping ln finite
    -(1.0 - rng.next_f64()).ln() / frequency
}

/// Uniform draw over the closed interval `[lo, hi]`.
#[inline]
fn sample(lo: f64, hi: f64, rng: &mut impl RandomSource) -> f64 {
    rng.range(lo, hi).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_FREQUENCY, Options};
    use crate::rng::{Sequence, XorShift};
    use proptest::prelude::*;

    const VIEW: Viewport = Viewport { width: 800.0, height: 600.0 };

    #[test]
    fn zero_frequency_never_arrives() {
        let mut rng = XorShift::new(7);
        let mut spawner = Spawner::new(0.0, &mut rng);
        let total: usize = (0..10_000).map(|_| spawner.poll(1.0, usize::MAX, &mut rng)).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn zero_delta_never_arrives() {
        let mut rng = Sequence::constant(0.999);
        let mut spawner = Spawner::new(1000.0, &mut rng);
        assert_eq!(spawner.poll(0.0, usize::MAX, &mut rng), 0);
    }

    #[test]
    fn constant_draws_give_regular_gaps() {
        // u = 1 - e^-1 makes every gap 1 / frequency
        let mut rng = Sequence::constant(1.0 - (-1.0f64).exp());
        let mut spawner = Spawner::new(10.0, &mut rng);
        assert_eq!(spawner.poll(0.95, usize::MAX, &mut rng), 9);
        assert_eq!(spawner.poll(0.1, usize::MAX, &mut rng), 1);
    }

    #[test]
    fn limit_caps_arrivals_and_drops_backlog() {
        // Every gap is exactly 1 / frequency
        let mut rng = Sequence::constant(1.0 - (-1.0f64).exp());
        let mut spawner = Spawner::new(MAX_FREQUENCY, &mut rng);
        assert_eq!(spawner.poll(1.0 / 60.0, 5000, &mut rng), 5000);
        // A huge backlog is cut short, not drained
        assert_eq!(spawner.poll(1.0e9, 10, &mut rng), 10);
        // Next arrival is one gap from now
        assert_eq!(spawner.poll(0.5 / MAX_FREQUENCY, usize::MAX, &mut rng), 0);
        assert_eq!(spawner.poll(0.6 / MAX_FREQUENCY, usize::MAX, &mut rng), 1);
    }

    #[test]
    fn zero_limit_spawns_nothing() {
        let mut rng = XorShift::new(3);
        let mut spawner = Spawner::new(1000.0, &mut rng);
        assert_eq!(spawner.poll(1.0, 0, &mut rng), 0);
    }

    #[test]
    fn long_run_rate_converges_to_frequency() {
        for (seed, frequency) in [(1, 5.0), (2, 60.0), (3, 250.0)] {
            let mut rng = XorShift::new(seed);
            let mut spawner = Spawner::new(frequency, &mut rng);
            let seconds = 2000;
            // Poll at 60 Hz
            let total: usize = (0..seconds * 60).map(|_| spawner.poll(1.0 / 60.0, usize::MAX, &mut rng)).sum();
            let expected = frequency * seconds as f64;
            let rel = (total as f64 - expected).abs() / expected;
            assert!(rel < 0.05, "frequency {frequency}: got {total}, expected {expected}");
        }
    }

    #[test]
    fn arrivals_are_not_periodic() {
        let mut rng = XorShift::new(11);
        let mut spawner = Spawner::new(30.0, &mut rng);
        let counts: Vec<usize> = (0..600).map(|_| spawner.poll(1.0 / 60.0, usize::MAX, &mut rng)).collect();
        assert!(counts.iter().any(|&c| c == 0));
        assert!(counts.iter().any(|&c| c >= 2));
    }

    #[test]
    fn emit_spawns_above_top_edge() {
        let config = Config::default();
        let mut rng = Sequence::new([0.5, 0.5, 0.5, 0.0, 0.25]);
        let f = Spawner::emit(9, &config, VIEW, &mut rng);
        assert_eq!(f.id, 9);
        assert_eq!(f.radius, 2.0);
        assert_eq!(f.y, -2.0);
        assert_eq!(f.x, 200.0);
        assert_eq!(f.color, 0);
        // angle 0: straight down at speed 2
        assert_eq!((f.vx, f.vy), (0.0, 2.0));
    }

    #[test]
    fn emit_picks_every_color() {
        let config = Options {
            colors: vec!["#000".into(), "#f00".into(), "#0f0".into()],
            ..Options::default()
        }
        .build()
        .unwrap();
        let mut rng = XorShift::new(5);
        let mut seen = [false; 3];
        for i in 0..300 {
            seen[Spawner::emit(i, &config, VIEW, &mut rng).color] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    proptest! {
        #[test]
        fn emitted_values_stay_in_configured_ranges(
            seed in 1u64..u64::MAX,
            min_r in 0.0..5.0f64, extra_r in 0.0..5.0f64,
            min_s in 0.1..10.0f64, extra_s in 0.0..10.0f64,
            min_a in -1.5..1.0f64, extra_a in 0.0..0.5f64,
        ) {
            let config = Options {
                min_radius: min_r,
                max_radius: min_r + extra_r,
                min_speed: min_s,
                max_speed: min_s + extra_s,
                min_angle: min_a,
                max_angle: min_a + extra_a,
                ..Options::default()
            }
            .build()
            .unwrap();

            let mut rng = XorShift::new(seed);
            for id in 0..50 {
                let f = Spawner::emit(id, &config, VIEW, &mut rng);
                prop_assert!(config.radius().contains(f.radius));
                let speed = f.speed();
                let tol = 1e-9 * config.speed().max;
                prop_assert!(speed >= config.speed().min - tol && speed <= config.speed().max + tol);
                prop_assert!(f.x >= 0.0 && f.x < VIEW.width);
                prop_assert!(f.vy > 0.0);
            }
        }
    }
}
