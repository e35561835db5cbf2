// cells.rs - Glyph grid surface
//
// Rasterises particles into a cols x rows grid, one cell per particle, for
// hosts that draw text instead of pixels. The host reads the two byte
// buffers straight out of wasm memory.
//
// Glyph encoding:
//   0      = empty
//   1-4    = square (4 sizes)
//   5-8    = circle (4 sizes)
//   9-12   = text glyph (4 sizes)
//
// Tint buffer holds the palette index of the cell's particle.

use super::{Paint, Surface};
use crate::error::{Error, Result};

/// Largest grid accepted, in cells.
pub const MAX_CELLS: usize = 1 << 24;

const SQUARE_OFFSET: u8 = 1;
const CIRCLE_OFFSET: u8 = 5;
const TEXT_OFFSET: u8 = 9;

pub struct CellBuffer {
    glyphs: Vec<u8>,
    tints: Vec<u8>,
    cols: u32,
    rows: u32,
}

impl CellBuffer {
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        let n = cell_count(cols, rows)?;
        Ok(Self {
            glyphs: vec![0; n],
            tints: vec![0; n],
            cols,
            rows,
        })
    }

    /// Returns false when the grid already had this size. An oversized grid
    /// is rejected and the current one kept.
    pub fn resize(&mut self, cols: u32, rows: u32) -> Result<bool> {
        if (cols, rows) == (self.cols, self.rows) { return Ok(false); }
        let n = cell_count(cols, rows)?;
        self.cols = cols;
        self.rows = rows;
        self.glyphs = vec![0; n];
        self.tints = vec![0; n];
        Ok(true)
    }

    pub fn cols(&self) -> u32 { self.cols }
    pub fn rows(&self) -> u32 { self.rows }
    pub fn glyphs(&self) -> &[u8] { &self.glyphs }
    pub fn tints(&self) -> &[u8] { &self.tints }

    /// Glyph code and tint at a cell, `None` when off-grid.
    pub fn at(&self, col: u32, row: u32) -> Option<(u8, u8)> {
        if col >= self.cols || row >= self.rows { return None; }
        let idx = self.index(col, row);
        Some((self.glyphs[idx], self.tints[idx]))
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    #[inline]
    fn put(&mut self, x: f64, y: f64, offset: u8, r: f64, paint: Paint<'_>) {
        if !(x >= 0.0 && y >= 0.0) { return; }
        let (col, row) = (x as u32, y as u32);
        if col >= self.cols || row >= self.rows { return; }

        let idx = self.index(col, row);
        let enc = offset + size_bucket(r);
        // Bigger particle wins a shared cell
        if enc > self.glyphs[idx] {
            self.glyphs[idx] = enc;
            self.tints[idx] = paint.index.min(u8::MAX as usize) as u8;
        }
    }
}

fn cell_count(cols: u32, rows: u32) -> Result<usize> {
    (cols as usize)
        .checked_mul(rows as usize)
        .filter(|&n| n <= MAX_CELLS)
        .ok_or_else(|| Error::ResourceInitialization(format!("glyph grid {cols}x{rows} is too large")))
}

/// Radius -> 0..=3
#[inline]
fn size_bucket(r: f64) -> u8 {
    if r < 1.0 { 0 } else if r < 2.0 { 1 } else if r < 4.0 { 2 } else { 3 }
}

impl Surface for CellBuffer {
    fn clear(&mut self) -> Result<()> {
        self.glyphs.fill(0);
        self.tints.fill(0);
        Ok(())
    }

    fn square(&mut self, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()> {
        self.put(x, y, SQUARE_OFFSET, r, paint);
        Ok(())
    }

    fn circle(&mut self, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()> {
        self.put(x, y, CIRCLE_OFFSET, r, paint);
        Ok(())
    }

    fn text(&mut self, _glyph: &str, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()> {
        self.put(x, y, TEXT_OFFSET, r, paint);
        Ok(())
    }
}
