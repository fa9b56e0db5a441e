//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas, capped before use
//! - Seeded RNG only
//! - Stable iteration order (brick scan order is row-major)
//! - No rendering or platform dependencies

pub mod collision;
pub mod laser;
pub mod layout;
pub mod multiball;
pub mod powerup;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Contact, circle_intersects, rect_intersects, resolve_circle_rect};
pub use layout::build_bricks;
pub use rect::{Circle, Rect};
pub use state::{
    Ball, Brick, BrickHit, BrickKind, Bullet, GameEvent, GameState, Paddle, PowerUp, PowerUpKind,
    Timers,
};
pub use tick::{TickInput, deflect_off_paddle, step, tick};
