// sim/ - Falling particle simulation
//
// `World` owns the pool, viewport, clock and random source. One
// `render(timestamp)` runs spawn -> step -> draw in that order.

mod clock;
mod flake;
mod spawner;

pub use clock::FrameClock;
pub use flake::{Flake, Flakes};
pub use spawner::Spawner;

use crate::config::Config;
use crate::error::Result;
use crate::render::{self, Surface};
use crate::rng::{RandomSource, XorShift};

/// Simulated time unit: one 60 Hz frame, in milliseconds.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Largest delta, in frames, applied by a single render.
pub const MAX_FRAME_STEP: f64 = 4.0;

/// Visible drawing area in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Non-finite or negative dimensions collapse to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: sanitize(width), height: sanitize(height) }
    }
}

#[inline]
fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Falling particle world
pub struct World<R = XorShift> {
    config: Config,
    flakes: Flakes,
    view: Viewport,
    clock: FrameClock,
    spawner: Spawner,
    rng: R,
    next_id: u64,
}

impl World<XorShift> {
    /// World with the default generator, seeded from `config.seed()` when set.
    pub fn new(config: Config) -> Self {
        let rng = match config.seed() {
            Some(seed) => XorShift::new(seed),
            None => XorShift::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> World<R> {
    pub fn with_rng(config: Config, mut rng: R) -> Self {
        let spawner = Spawner::new(config.frequency(), &mut rng);
        // Bounded by the pool cap; skip the reservation for huge caps
        let flakes = Flakes::with_capacity(config.max_particles().min(1024));
        Self {
            config,
            flakes,
            view: Viewport::default(),
            clock: FrameClock::new(),
            spawner,
            rng,
            next_id: 0,
        }
    }

    /// Store new viewport dimensions. Returns false when nothing changed.
    /// Live particles are kept; ones now outside are culled by the next step.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let view = Viewport::new(width, height);
        if view == self.view { return false; }
        log::debug!("viewport {}x{} -> {}x{}", self.view.width, self.view.height, view.width, view.height);
        self.view = view;
        true
    }

    /// Spawn and step for the frame at `timestamp_ms`, without drawing.
    pub fn update(&mut self, timestamp_ms: f64) {
        let dt = self.clock.tick(timestamp_ms);
        if dt <= 0.0 { return; }

        let room = self.config.max_particles().saturating_sub(self.flakes.len());
        let arrivals = self.spawner.poll(dt * FRAME_MS / 1000.0, room, &mut self.rng);
        for _ in 0..arrivals {
            let flake = Spawner::emit(self.next_id, &self.config, self.view, &mut self.rng);
            self.next_id += 1;
            self.flakes.push(flake);
        }

        self.flakes.step(dt, self.view);
    }

    /// Advance to `timestamp_ms` and draw the result on `surface`.
    pub fn render(&mut self, timestamp_ms: f64, surface: &mut impl Surface) -> Result<()> {
        self.update(timestamp_ms);
        render::draw(&self.flakes, &self.config, surface)
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn flakes(&self) -> &Flakes { &self.flakes }
    pub fn viewport(&self) -> Viewport { self.view }
    pub fn len(&self) -> usize { self.flakes.len() }
    pub fn is_empty(&self) -> bool { self.flakes.is_empty() }
}
