//! Brickfall - a ball-and-paddle brick breaker
//!
//! Core modules:
//! - `sim`: Simulation core (kinematics, collisions, power-ups, level flow)
//! - `levels`: Level sources with layered fallback
//! - `config`: Data-driven game tuning

pub mod config;
pub mod levels;
pub mod sim;

pub use config::{LayoutMode, Tuning};
pub use levels::{Level, LevelError, LevelSet};

/// Fixed constants that are not worth exposing as tuning
pub mod consts {
    /// Distance below the playfield a ball must fall before it is lost
    pub const BALL_LOSS_MARGIN: f32 = 20.0;
    /// Distance below the playfield at which a falling pickup is discarded
    pub const PICKUP_LOSS_MARGIN: f32 = 40.0;
    /// Bullets are discarded once they climb above this y
    pub const BULLET_TOP_MARGIN: f32 = -20.0;
    /// Bullets spawn this far above the paddle's top edge
    pub const BULLET_SPAWN_OFFSET: f32 = 6.0;
    /// Gap left between a stuck ball and the paddle
    pub const STUCK_BALL_GAP: f32 = 1.0;
    /// Gap left after pushing a ball out of the paddle
    pub const PADDLE_RELEASE_GAP: f32 = 0.01;
    /// Stand-in distance when a ball center sits exactly on a brick edge
    pub const COLLISION_EPSILON: f32 = 0.0001;
    /// Hit points given to steel bricks
    pub const STEEL_HP: i32 = 9999;
    /// Smallest ball radius the layout adaptation may produce
    pub const MIN_BALL_RADIUS: f32 = 6.0;
}

/// Clamp that tolerates an inverted range (`lo > hi`) by preferring `lo`,
/// which is what a paddle wider than the playfield needs.
#[inline]
pub fn clamp_lo(v: f32, lo: f32, hi: f32) -> f32 {
    lo.max(hi.min(v))
}

/// -1, 0 or 1 depending on the sign of `v` (0 for zero, unlike `f32::signum`)
#[inline]
pub fn sign_or_zero(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
