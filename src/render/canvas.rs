// canvas.rs - 2D canvas surface
//
// Owns the <canvas> the engine appends to its container. All draw calls go
// through CanvasRenderingContext2d; a canvas that was removed from the
// document is reported instead of being drawn into silently.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use super::{Paint, Surface};
use crate::error::{Error, Result};

/// Font size per unit of radius for text particles.
const GLYPH_SCALE: f64 = 5.0;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
}

impl CanvasSurface {
    /// Create a canvas, append it to `container` and grab its 2D context.
    pub fn attach(container: &Element) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| init_error("no document"))?;

        let canvas = document
            .create_element("canvas")
            .map_err(|e| init_error(js_message(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| init_error("created element is not a canvas"))?;

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| init_error(js_message(&e)))?
            .ok_or_else(|| init_error("2d context unsupported"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| init_error("context is not 2d"))?;

        container
            .append_child(&canvas)
            .map_err(|e| init_error(js_message(&e)))?;

        Ok(Self { canvas, ctx, width: 0, height: 0 })
    }

    /// Match the backing store to the viewport. Returns false when unchanged,
    /// since resetting the size wipes the canvas.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let (w, h) = (width.max(0.0) as u32, height.max(0.0) as u32);
        if (w, h) == (self.width, self.height) { return false; }
        self.width = w;
        self.height = h;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        true
    }

    fn live(&self) -> Result<&CanvasRenderingContext2d> {
        if !self.canvas.is_connected() {
            return Err(Error::RenderSurfaceUnavailable("canvas detached from document".into()));
        }
        Ok(&self.ctx)
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) -> Result<()> {
        let ctx = self.live()?;
        ctx.clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
        Ok(())
    }

    fn square(&mut self, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()> {
        self.ctx.set_fill_style_str(paint.css);
        self.ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
        Ok(())
    }

    fn circle(&mut self, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()> {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(paint.css);
        self.ctx.arc(x, y, r, 0.0, TAU).map_err(draw_error)?;
        self.ctx.fill();
        Ok(())
    }

    fn text(&mut self, glyph: &str, x: f64, y: f64, r: f64, paint: Paint<'_>) -> Result<()> {
        let px = (r * GLYPH_SCALE).round().max(1.0);
        self.ctx.set_font(&format!("{px}px serif"));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(paint.css);
        self.ctx.fill_text(glyph, x, y).map_err(draw_error)
    }
}

fn js_message(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn init_error(msg: impl Into<String>) -> Error {
    Error::ResourceInitialization(msg.into())
}

fn draw_error(e: JsValue) -> Error {
    Error::RenderSurfaceUnavailable(js_message(&e))
}
