// config.rs - Scene configuration
//
// `Options` is the raw, serde-facing shape the host hands over (every field
// defaulted). `Options::build` checks the invariants and freezes the result
// into a `Config` the simulation reads from.

use std::f64::consts::FRAC_PI_2;

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

pub const DEFAULT_MAX_PARTICLES: usize = 5000;

/// Highest accepted spawn rate, in particles per second.
pub const MAX_FREQUENCY: f64 = 1.0e6;

/// Shape drawn for every particle of a scene.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FlakeType {
    Square,
    Text,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange { name: &'static str, min: f64, max: f64 },
    #[error("frequency must be >= 0, got {0}")]
    NegativeFrequency(f64),
    #[error("frequency must be <= {MAX_FREQUENCY}, got {0}")]
    FrequencyTooHigh(f64),
    #[error("minRadius must be >= 0, got {0}")]
    NegativeRadius(f64),
    #[error("minSpeed must be > 0, got {0}")]
    NonPositiveSpeed(f64),
    #[error("angle {0} is outside (-pi/2, pi/2)")]
    AngleOutOfRange(f64),
    #[error("colors must not be empty")]
    EmptyColors,
    #[error("text must not be empty for the Text flake type")]
    EmptyText,
    #[error("maxParticles must be >= 1")]
    ZeroCapacity,
    #[error("malformed options: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

/// Raw options as supplied by the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    pub frequency: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_angle: f64,
    pub max_angle: f64,
    pub colors: Vec<String>,
    #[serde(rename = "type", alias = "type_")]
    pub kind: FlakeType,
    pub text: String,
    #[serde(alias = "el")]
    pub container: String,
    pub max_particles: usize,
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            min_radius: 1.0,
            max_radius: 3.0,
            min_speed: 1.0,
            max_speed: 3.0,
            min_angle: -0.1,
            max_angle: 0.1,
            colors: vec!["#FFF".to_string()],
            kind: FlakeType::Square,
            text: "*".to_string(),
            container: "body".to_string(),
            max_particles: DEFAULT_MAX_PARTICLES,
            seed: None,
        }
    }
}

impl Options {
    pub fn build(self) -> Result<Config, ConfigError> {
        finite("frequency", self.frequency)?;
        if self.frequency < 0.0 {
            return Err(ConfigError::NegativeFrequency(self.frequency));
        }
        if self.frequency > MAX_FREQUENCY {
            return Err(ConfigError::FrequencyTooHigh(self.frequency));
        }

        let radius = Range::checked("radius", self.min_radius, self.max_radius)?;
        if radius.min < 0.0 {
            return Err(ConfigError::NegativeRadius(radius.min));
        }

        let speed = Range::checked("speed", self.min_speed, self.max_speed)?;
        if speed.min <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(speed.min));
        }

        // Both bounds must keep a downward velocity component, otherwise a
        // particle could never leave through the bottom edge.
        let angle = Range::checked("angle", self.min_angle, self.max_angle)?;
        for a in [angle.min, angle.max] {
            if a <= -FRAC_PI_2 || a >= FRAC_PI_2 {
                return Err(ConfigError::AngleOutOfRange(a));
            }
        }

        if self.colors.is_empty() {
            return Err(ConfigError::EmptyColors);
        }
        if self.kind == FlakeType::Text && self.text.is_empty() {
            return Err(ConfigError::EmptyText);
        }
        if self.max_particles == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(Config {
            frequency: self.frequency,
            radius,
            speed,
            angle,
            colors: self.colors,
            kind: self.kind,
            text: self.text,
            container: self.container,
            max_particles: self.max_particles,
            seed: self.seed,
        })
    }
}

fn finite(name: &'static str, v: f64) -> Result<f64, ConfigError> {
    if v.is_finite() { Ok(v) } else { Err(ConfigError::NotFinite(name)) }
}

/// Closed interval with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    fn checked(name: &'static str, min: f64, max: f64) -> Result<Self, ConfigError> {
        finite(name, min)?;
        finite(name, max)?;
        if min > max {
            return Err(ConfigError::InvertedRange { name, min, max });
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Validated, immutable scene configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    frequency: f64,
    radius: Range,
    speed: Range,
    angle: Range,
    colors: Vec<String>,
    kind: FlakeType,
    text: String,
    container: String,
    max_particles: usize,
    seed: Option<u64>,
}

impl Config {
    /// Parse and validate a JSON options object, e.g.
    /// `{"frequency": 20, "colors": ["#fff", "#adf"], "type": "Circle"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Options = serde_json::from_str(json)?;
        options.build()
    }

    pub fn frequency(&self) -> f64 { self.frequency }
    pub fn radius(&self) -> Range { self.radius }
    pub fn speed(&self) -> Range { self.speed }
    pub fn angle(&self) -> Range { self.angle }
    pub fn colors(&self) -> &[String] { &self.colors }
    pub fn kind(&self) -> FlakeType { self.kind }
    pub fn text(&self) -> &str { &self.text }
    pub fn container(&self) -> &str { &self.container }
    pub fn max_particles(&self) -> usize { self.max_particles }
    pub fn seed(&self) -> Option<u64> { self.seed }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            radius: Range { min: 1.0, max: 3.0 },
            speed: Range { min: 1.0, max: 3.0 },
            angle: Range { min: -0.1, max: 0.1 },
            colors: vec!["#FFF".to_string()],
            kind: FlakeType::Square,
            text: "*".to_string(),
            container: "body".to_string(),
            max_particles: DEFAULT_MAX_PARTICLES,
            seed: None,
        }
    }
}
