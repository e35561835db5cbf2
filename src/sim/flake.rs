// flake.rs - Falling particles
//
// Structure-of-Arrays layout for cache-friendly iteration. Unlike a fixed
// array pool the columns grow on demand; the caller enforces capacity.

use super::Viewport;

/// A single particle, copied out of the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flake {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    /// Index into the configured palette.
    pub color: usize,
}

impl Flake {
    /// True once the particle is entirely outside the viewport: past the
    /// bottom edge, or past the left/right edge by more than its radius.
    #[inline]
    pub fn is_outside(&self, view: Viewport) -> bool {
        self.y - self.radius > view.height
            || self.x + self.radius < 0.0
            || self.x - self.radius > view.width
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flakes {
    pub id: Vec<u64>,

    // Position (centre)
    pub x: Vec<f64>,
    pub y: Vec<f64>,

    // Velocity, viewport units per frame
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,

    pub radius: Vec<f64>,
    pub color: Vec<usize>,
}

impl Flakes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            id: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            vx: Vec::with_capacity(n),
            vy: Vec::with_capacity(n),
            radius: Vec::with_capacity(n),
            color: Vec::with_capacity(n),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, f: Flake) {
        self.id.push(f.id);
        self.x.push(f.x);
        self.y.push(f.y);
        self.vx.push(f.vx);
        self.vy.push(f.vy);
        self.radius.push(f.radius);
        self.color.push(f.color);
    }

    #[inline]
    pub fn get(&self, i: usize) -> Flake {
        Flake {
            id: self.id[i],
            x: self.x[i],
            y: self.y[i],
            vx: self.vx[i],
            vy: self.vy[i],
            radius: self.radius[i],
            color: self.color[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Flake> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Advance every particle by `dt` frames and drop the ones that left the
    /// viewport. Returns the number removed.
    ///
    /// A non-positive or NaN `dt` is a no-op: nothing moves and nothing is
    /// culled, even if a resize left particles outside.
    pub fn step(&mut self, dt: f64, view: Viewport) -> usize {
        if !(dt > 0.0) { return 0; }

        let n = self.len();
        let mut write = 0;

        for read in 0..n {
            let x = self.x[read] + self.vx[read] * dt;
            let y = self.y[read] + self.vy[read] * dt;
            let r = self.radius[read];

            if y - r > view.height || x + r < 0.0 || x - r > view.width {
                continue;
            }

            self.id[write] = self.id[read];
            self.x[write] = x;
            self.y[write] = y;
            self.vx[write] = self.vx[read];
            self.vy[write] = self.vy[read];
            self.radius[write] = r;
            self.color[write] = self.color[read];
            write += 1;
        }

        self.truncate(write);
        n - write
    }

    fn truncate(&mut self, n: usize) {
        self.id.truncate(n);
        self.x.truncate(n);
        self.y.truncate(n);
        self.vx.truncate(n);
        self.vy.truncate(n);
        self.radius.truncate(n);
        self.color.truncate(n);
    }
}
