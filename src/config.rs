use glam::Vec3;
use std::str::FromStr;
use thiserror::Error;

/// 2^10 cells a side keeps the terrain vertex buffer under wgpu's default
/// 256 MiB `max_buffer_size`.
pub const MAX_ITERATIONS: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("iterations must be at least 1, got {0}")]
    TooFewIterations(u32),

    #[error("iterations must be at most {max}, got {0}", max = MAX_ITERATIONS)]
    TooManyIterations(u32),

    #[error("smoothing factor must lie in (0, 1), got {0}")]
    SmoothingOutOfRange(f32),

    #[error("scale {axis} must be positive and finite, got {value}")]
    InvalidScale { axis: char, value: f32 },

    #[error("{name} must be a non-negative number, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("projection needs 0 < fovy < pi and 0 < znear < zfar, got fovy {fovy}, znear {znear}, zfar {zfar}")]
    InvalidProjection { fovy: f32, znear: f32, zfar: f32 },

    #[error("unknown diamond mode {0:?}, expected \"legacy\" or \"four-neighbor\"")]
    UnknownDiamondMode(String),
}

/// Which neighbours a diamond step averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiamondNeighbors {
    /// Reads the wrapped left neighbour in place of the right one, so the
    /// left value is counted twice. Matches the classic terrain look.
    #[default]
    Legacy,
    /// True top/right/bottom/left average.
    FourNeighbor,
}

impl FromStr for DiamondNeighbors {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "four-neighbor" | "four" => Ok(Self::FourNeighbor),
            _ => Err(ConfigError::UnknownDiamondMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone)]
pub struct TerrainSettings {
    pub iterations: u32,
    pub corner_height: f32,
    pub initial_factor: f32,
    pub smoothing_factor: f32,
    pub diamond_neighbors: DiamondNeighbors,
    pub seed: Option<u64>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            iterations: 4,
            corner_height: -0.5,
            initial_factor: 5.0,
            smoothing_factor: 0.2,
            diamond_neighbors: DiamondNeighbors::Legacy,
            seed: None,
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations < 1 {
            return Err(ConfigError::TooFewIterations(self.iterations));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::TooManyIterations(self.iterations));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor < 1.0) {
            return Err(ConfigError::SmoothingOutOfRange(self.smoothing_factor));
        }
        Ok(())
    }
}

/// Horizontal cell spacing (x, y) and vertical amplitude (z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 4.0, y: 4.0, z: 20.0 }
    }
}

impl Scale {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [('x', self.x), ('y', self.y), ('z', self.z)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidScale { axis, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NavigationSettings {
    /// World units per elapsed millisecond.
    pub move_speed: f32,
    pub player_height: f32,
    /// Radians per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    pub start_position: Vec3,
    pub start_rotation: Vec3,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            move_speed: 0.006,
            player_height: 2.0,
            mouse_sensitivity: 0.002,
            start_position: Vec3::new(0.0, 0.0, -34.0),
            start_rotation: Vec3::new(1.0, -1.0, 0.0),
        }
    }
}

impl NavigationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("move speed", self.move_speed), ("player height", self.player_height)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        // Negative sensitivity inverts the look axes.
        if !self.mouse_sensitivity.is_finite() {
            return Err(ConfigError::NotFinite { name: "mouse sensitivity", value: self.mouse_sensitivity });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LandscapeConfig {
    pub terrain: TerrainSettings,
    pub scale: Scale,
    pub water_height: f32,
    pub water_color: Rgba8,
    pub navigation: NavigationSettings,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainSettings::default(),
            scale: Scale::default(),
            water_height: -0.25,
            water_color: Rgba8::new(0, 0, 255, 100),
            navigation: NavigationSettings::default(),
            fovy: std::f32::consts::FRAC_PI_4,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl LandscapeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.scale.validate()?;
        self.navigation.validate()?;
        let fov_ok = self.fovy > 0.0 && self.fovy < std::f32::consts::PI;
        if !(fov_ok && self.znear > 0.0 && self.znear < self.zfar && self.zfar.is_finite()) {
            return Err(ConfigError::InvalidProjection { fovy: self.fovy, znear: self.znear, zfar: self.zfar });
        }
        Ok(())
    }

    pub fn with_diamond_neighbors(mut self, neighbors: Option<DiamondNeighbors>) -> Self {
        if let Some(neighbors) = neighbors {
            self.terrain.diamond_neighbors = neighbors;
        }
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.terrain.seed = seed;
        self
    }
}
