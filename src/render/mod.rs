// render/ - Draw the particle pool onto an output surface
//
// The renderer is stateless: every frame clears the surface and redraws the
// whole pool. Surfaces only know how to paint centred primitives.

mod canvas;
mod cells;

pub use canvas::CanvasSurface;
pub use cells::CellBuffer;

use crate::config::{Config, FlakeType};
use crate::error::Result;
use crate::sim::Flakes;

/// Fill color of one primitive: palette slot and its CSS value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint<'a> {
    pub index: usize,
    pub css: &'a str,
}

/// Drawing target for one frame.
pub trait Surface {
    /// Wipe whatever the previous frame left behind.
    fn clear(&mut self) -> Result<()>;

    /// Filled square of side `2 * r` centred on `(x, y)`.
    fn square(&mut self, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()>;

    /// Filled circle of radius `r` centred on `(x, y)`.
    fn circle(&mut self, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()>;

    /// `glyph` centred on `(x, y)`, scaled by `r`.
    fn text(&mut self, glyph: &str, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()>;
}

/// Draw every particle of `flakes` with the shape and palette of `config`.
pub fn draw(flakes: &Flakes, config: &Config, surface: &mut impl Surface) -> Result<()> {
    surface.clear()?;

    let colors = config.colors();
    let kind = config.kind();
    for f in flakes.iter() {
        let paint = Paint { index: f.color, css: &colors[f.color] };
        match kind {
            FlakeType::Square => surface.square(f.x, f.y, f.radius, paint)?,
            FlakeType::Circle => surface.circle(f.x, f.y, f.radius, paint)?,
            FlakeType::Text => surface.text(config.text(), f.x, f.y, f.radius, paint)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::error::Error;
    use crate::sim::Flake;

    /// Records draw calls as strings.
    #[derive(Default)]
    struct Log {
        calls: Vec<String>,
        fail_after: Option<usize>,
    }

    impl Log {
        fn record(&mut self, call: String) -> Result<()> {
            if self.fail_after.is_some_and(|n| self.calls.len() >= n) {
                return Err(Error::RenderSurfaceUnavailable("lost".into()));
            }
            self.calls.push(call);
            Ok(())
        }
    }

    impl Surface for Log {
        fn clear(&mut self) -> Result<()> {
            self.record("clear".into())
        }
        fn square(&mut self, x: f64, y: f64, r: f64, p: Paint<'_>) -> Result<()> {
            self.record(format!("square {x} {y} {r} {}", p.css))
        }
        fn circle(&mut self, x: f64, y: f64, r: f64, p: Paint<'_>) -> Result<()> {
            self.record(format!("circle {x} {y} {r} {}", p.css))
        }
        fn text(&mut self, g: &str, x: f64, y: f64, r: f64, p: Paint<'_>) -> Result<()> {
            self.record(format!("text {g} {x} {y} {r} {}", p.css))
        }
    }

    fn pool() -> Flakes {
        let mut flakes = Flakes::new();
        flakes.push(Flake { id: 0, x: 1.0, y: 2.0, vx: 0.0, vy: 1.0, radius: 3.0, color: 1 });
        flakes.push(Flake { id: 1, x: 4.0, y: 5.0, vx: 0.0, vy: 1.0, radius: 1.0, color: 0 });
        flakes
    }

    fn config(kind: FlakeType) -> Config {
        Options {
            kind,
            text: "❄".into(),
            colors: vec!["#fff".into(), "red".into()],
            ..Options::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn draws_shape_per_type() {
        let mut log = Log::default();
        draw(&pool(), &config(FlakeType::Circle), &mut log).unwrap();
        assert_eq!(log.calls, vec!["clear", "circle 1 2 3 red", "circle 4 5 1 #fff"]);

        let mut log = Log::default();
        draw(&pool(), &config(FlakeType::Text), &mut log).unwrap();
        assert_eq!(log.calls[1], "text ❄ 1 2 3 red");

        let mut log = Log::default();
        draw(&pool(), &config(FlakeType::Square), &mut log).unwrap();
        assert_eq!(log.calls[2], "square 4 5 1 #fff");
    }

    #[test]
    fn empty_pool_only_clears() {
        let mut log = Log::default();
        draw(&Flakes::new(), &config(FlakeType::Square), &mut log).unwrap();
        assert_eq!(log.calls, vec!["clear"]);
    }

    #[test]
    fn surface_failure_is_reported() {
        let mut log = Log { fail_after: Some(2), ..Log::default() };
        let err = draw(&pool(), &config(FlakeType::Square), &mut log).unwrap_err();
        assert!(matches!(err, Error::RenderSurfaceUnavailable(_)));
    }
}
