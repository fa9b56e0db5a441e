//! Game tuning and layout mode
//!
//! Every gameplay number lives here so a JSON file can rebalance the game
//! without a rebuild. Each section is `#[serde(default)]`, so a tuning file
//! only needs to name the values it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MIN_BALL_RADIUS;

/// Viewport shape chosen by the layout collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutMode {
    #[default]
    Landscape,
    /// Tall, narrow viewport (phones held upright)
    Portrait,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutMode::Landscape => "Landscape",
            LayoutMode::Portrait => "Portrait",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "landscape" | "wide" => Some(LayoutMode::Landscape),
            "portrait" | "tall" => Some(LayoutMode::Portrait),
            _ => None,
        }
    }

    /// Pick the layout for a viewport: portrait only when taller than wide
    /// and no wider than `breakpoint`.
    pub fn for_viewport(width: f32, height: f32, breakpoint: f32) -> Self {
        if height > width && width <= breakpoint {
            LayoutMode::Portrait
        } else {
            LayoutMode::Landscape
        }
    }
}

/// Logical playfield size; all positions are in these units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayfieldTuning {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed while a move intent is held (units/s)
    pub speed: f32,
    /// Space left between the paddle's bottom edge and the playfield floor
    pub bottom_offset: f32,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 16.0,
            speed: 820.0,
            bottom_offset: 42.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub radius: f32,
    /// Base speed; also the lower clamp on every paddle bounce
    pub speed: f32,
    pub max_speed: f32,
    /// Multiplicative speed-up applied on every paddle bounce
    pub paddle_boost: f32,
    /// Deflection from vertical when hitting the paddle's extreme edge (radians)
    pub max_bounce_angle: f32,
    /// A freshly served ball points up at `speed * launch_factor`
    pub launch_factor: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            radius: 8.0,
            speed: 420.0,
            max_speed: 1200.0,
            paddle_boost: 1.03,
            max_bounce_angle: std::f32::consts::PI / 2.6,
            launch_factor: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickTuning {
    pub gap: f32,
    pub top: f32,
    pub margin_x: f32,
    /// Fraction of playfield height the whole grid may occupy
    pub max_height_ratio: f32,
    pub max_height: f32,
    pub min_width: f32,
}

impl Default for BrickTuning {
    fn default() -> Self {
        Self {
            gap: 8.0,
            top: 72.0,
            margin_x: 28.0,
            max_height_ratio: 0.45,
            max_height: 32.0,
            min_width: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub fall_speed: f32,
    /// Chance a plain brick drops a random pickup when destroyed
    pub drop_chance: f64,
    /// Lifetime of widen/shrink effects (seconds)
    pub duration: f64,
    pub size: f32,
    pub widen_factor: f32,
    pub shrink_factor: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            fall_speed: 160.0,
            drop_chance: 0.22,
            duration: 10.0,
            size: 28.0,
            widen_factor: 1.6,
            shrink_factor: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserTuning {
    /// Minimum time between volleys (seconds)
    pub cooldown: f64,
    pub bullet_speed: f32,
    /// How long one laser pickup keeps the gun armed (seconds)
    pub duration: f64,
    /// Horizontal distance of each muzzle from its paddle edge
    pub muzzle_inset: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
}

impl Default for LaserTuning {
    fn default() -> Self {
        Self {
            cooldown: 0.12,
            bullet_speed: 820.0,
            duration: 3.8,
            muzzle_inset: 12.0,
            bullet_width: 6.0,
            bullet_height: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiBallTuning {
    /// Extra balls spawned per pickup
    pub clones: usize,
    /// Launch angle is drawn from `[-angle_jitter, angle_jitter]` (radians from vertical)
    pub angle_jitter: f32,
    /// Speed factor is drawn from `[1 + speed_jitter_min, 1 + speed_jitter_max]`
    pub speed_jitter_min: f32,
    pub speed_jitter_max: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for MultiBallTuning {
    fn default() -> Self {
        Self {
            clones: 2,
            angle_jitter: 0.6,
            speed_jitter_min: -0.06,
            speed_jitter_max: 0.08,
            offset_x: 12.0,
            offset_y: 6.0,
        }
    }
}

/// Size adjustments applied in `LayoutMode::Portrait`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitTuning {
    /// Viewport width at or below which a tall viewport counts as portrait
    pub breakpoint: f32,
    pub paddle_scale: f32,
    pub ball_scale: f32,
    pub speed_mul: f32,
}

impl Default for PortraitTuning {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            paddle_scale: 1.6,
            ball_scale: 0.85,
            speed_mul: 0.9,
        }
    }
}

/// Complete gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield: PlayfieldTuning,
    pub paddle: PaddleTuning,
    pub ball: BallTuning,
    pub brick: BrickTuning,
    pub powerup: PowerUpTuning,
    pub laser: LaserTuning,
    pub multiball: MultiBallTuning,
    pub portrait: PortraitTuning,
    /// Upper bound on a single frame delta (seconds)
    pub max_frame_dt: f32,
    pub score_per_brick: u64,
    pub initial_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield: PlayfieldTuning::default(),
            paddle: PaddleTuning::default(),
            ball: BallTuning::default(),
            brick: BrickTuning::default(),
            powerup: PowerUpTuning::default(),
            laser: LaserTuning::default(),
            multiball: MultiBallTuning::default(),
            portrait: PortraitTuning::default(),
            max_frame_dt: 0.033,
            score_per_brick: 10,
            initial_lives: 3,
        }
    }
}

/// Failure to read a tuning file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Tuning {
    /// Parse tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load tuning, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from_file(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.as_ref().display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Paddle width the game reverts to when no width effect is active
    pub fn base_paddle_width(&self, layout: LayoutMode) -> f32 {
        match layout {
            LayoutMode::Landscape => self.paddle.width,
            LayoutMode::Portrait => self.paddle.width * self.portrait.paddle_scale,
        }
    }

    /// Ball radius for freshly served balls
    pub fn ball_radius(&self, layout: LayoutMode) -> f32 {
        match layout {
            LayoutMode::Landscape => self.ball.radius.round().max(MIN_BALL_RADIUS),
            LayoutMode::Portrait => (self.ball.radius * self.portrait.ball_scale)
                .round()
                .max(MIN_BALL_RADIUS),
        }
    }

    /// Cached speed for freshly served balls
    pub fn serve_speed(&self, layout: LayoutMode) -> f32 {
        match layout {
            LayoutMode::Landscape => self.ball.speed,
            LayoutMode::Portrait => self.ball.speed * self.portrait.speed_mul,
        }
    }
}
