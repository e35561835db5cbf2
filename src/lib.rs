use wasm_bindgen::prelude::*;
use web_sys::Element;

// ============================================================================
// FALLING - Snow / confetti particles for a page container
// ============================================================================

pub mod config;
pub mod error;
pub mod ready;
pub mod render;
pub mod rng;
pub mod sim;

pub use config::{Config, ConfigError, FlakeType, Options};
pub use error::Error;
pub use ready::Readiness;
pub use render::{CanvasSurface, CellBuffer, Surface};
pub use sim::World;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Only fails when a logger is already installed
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Validated options, built positionally or from JSON.
#[wasm_bindgen]
pub struct FallingConfig {
    inner: Config,
}

#[wasm_bindgen]
impl FallingConfig {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frequency: f64,
        min_radius: f64,
        max_radius: f64,
        min_speed: f64,
        max_speed: f64,
        min_angle: f64,
        max_angle: f64,
        colors: Vec<String>,
        type_: FlakeType,
        text: String,
        el: String,
    ) -> Result<FallingConfig, JsError> {
        let inner = Options {
            frequency,
            min_radius,
            max_radius,
            min_speed,
            max_speed,
            min_angle,
            max_angle,
            colors,
            kind: type_,
            text,
            container: el,
            ..Options::default()
        }
        .build()?;
        Ok(Self { inner })
    }

    /// Keyword-style construction: `FallingConfig.fromJson('{"frequency": 20}')`.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<FallingConfig, JsError> {
        Ok(Self { inner: Config::from_json(json)? })
    }
}

/// Canvas scene bound to a container element.
#[wasm_bindgen]
pub struct Scene {
    world: World,
    surface: CanvasSurface,
    container: Element,
}

#[wasm_bindgen]
impl Scene {
    #[wasm_bindgen(constructor)]
    pub fn new(config: FallingConfig) -> Result<Scene, JsError> {
        Ok(Self::create(config.inner)?)
    }

    /// Re-read the container size. Cheap when nothing changed.
    pub fn resize(&mut self) {
        let w = self.container.client_width() as f64;
        let h = self.container.client_height() as f64;
        self.world.resize(w, h);
        self.surface.resize(w, h);
    }

    /// Advance to `timestamp` (ms, as passed to requestAnimationFrame) and draw.
    pub fn render(&mut self, timestamp: f64) -> Result<(), JsError> {
        self.world.render(timestamp, &mut self.surface).map_err(|e| {
            log::error!("render failed: {e}");
            JsError::from(e)
        })
    }

    /// Live particle count.
    pub fn count(&self) -> usize {
        self.world.len()
    }
}

impl Scene {
    fn create(config: Config) -> error::Result<Scene> {
        let container = find_container(config.container())?;
        let surface = CanvasSurface::attach(&container)?;
        log::info!("scene attached to '{}' ({:?}, {}/s)", config.container(), config.kind(), config.frequency());
        Ok(Scene { world: World::new(config), surface, container })
    }
}

fn find_container(selector: &str) -> error::Result<Element> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::ResourceInitialization("no document".into()))?;
    document
        .query_selector(selector)
        .map_err(|_| Error::ResourceInitialization(format!("invalid selector '{selector}'")))?
        .ok_or_else(|| Error::ResourceInitialization(format!("no element matches '{selector}'")))
}

/// Scene rendered into a glyph grid the host paints as text.
#[wasm_bindgen]
pub struct GlyphScene {
    world: World,
    cells: CellBuffer,
}

#[wasm_bindgen]
impl GlyphScene {
    /// Viewport units are grid cells: speeds and radii are in cells.
    #[wasm_bindgen(constructor)]
    pub fn new(config: FallingConfig, cols: u32, rows: u32) -> Result<GlyphScene, JsError> {
        let cells = CellBuffer::new(cols, rows)?;
        let mut world = World::new(config.inner);
        world.resize(cols as f64, rows as f64);
        Ok(Self { world, cells })
    }

    pub fn resize(&mut self, cols: u32, rows: u32) -> Result<(), JsError> {
        self.cells.resize(cols, rows)?;
        self.world.resize(cols as f64, rows as f64);
        Ok(())
    }

    pub fn render(&mut self, timestamp: f64) -> Result<(), JsError> {
        Ok(self.world.render(timestamp, &mut self.cells)?)
    }

    pub fn count(&self) -> usize { self.world.len() }

    // Accessors for the host
    #[wasm_bindgen(js_name = glyphsPtr)]
    pub fn glyphs_ptr(&self) -> *const u8 { self.cells.glyphs().as_ptr() }
    #[wasm_bindgen(js_name = glyphsLen)]
    pub fn glyphs_len(&self) -> usize { self.cells.glyphs().len() }
    #[wasm_bindgen(js_name = tintsPtr)]
    pub fn tints_ptr(&self) -> *const u8 { self.cells.tints().as_ptr() }
    #[wasm_bindgen(js_name = tintsLen)]
    pub fn tints_len(&self) -> usize { self.cells.tints().len() }
    pub fn width(&self) -> u32 { self.cells.cols() }
    pub fn height(&self) -> u32 { self.cells.rows() }
}

/// Host-facing wrapper: options are checked up front, the canvas is only
/// created by `start()`, and frame calls made before that are rejected.
#[wasm_bindgen]
pub struct Falling {
    config: Config,
    scene: Readiness<Scene>,
}

#[wasm_bindgen]
impl Falling {
    #[wasm_bindgen(constructor)]
    pub fn new(options: &str) -> Result<Falling, JsError> {
        let config = Config::from_json(options)?;
        Ok(Self { config, scene: Readiness::Pending })
    }

    /// Acquire the canvas and size it. Safe to call more than once.
    pub fn start(&mut self) -> Result<(), JsError> {
        let config = &self.config;
        let scene = self.scene.resolve_with(|| Scene::create(config.clone()))?;
        scene.resize();
        Ok(())
    }

    pub fn resize(&mut self) -> Result<(), JsError> {
        self.scene.get_mut()?.resize();
        Ok(())
    }

    pub fn render(&mut self, timestamp: f64) -> Result<(), JsError> {
        self.scene.get_mut()?.render(timestamp)
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.scene.is_ready()
    }
}
