//! Power-up engine: drops, falling pickups, collection and timed effects

use glam::Vec2;
use rand::Rng;

use super::collision::rect_intersects;
use super::multiball;
use super::rect::Rect;
use super::state::{Brick, GameEvent, GameState, PowerUp, PowerUpKind};
use crate::config::Tuning;
use crate::consts::PICKUP_LOSS_MARGIN;

/// Pickup of `kind` centered on `center`, falling at the tuned speed
pub fn spawn(kind: PowerUpKind, center: Vec2, tuning: &Tuning) -> PowerUp {
    let size = tuning.powerup.size;
    PowerUp {
        rect: Rect::centered(center, size, size),
        kind,
        vy: tuning.powerup.fall_speed,
    }
}

/// Drop policy for a brick that was just destroyed.
///
/// Bricks bound to a power-up letter always drop it. Any other brick drops
/// a uniformly random kind with the tuned probability.
pub fn drop_for<R: Rng + ?Sized>(brick: &Brick, tuning: &Tuning, rng: &mut R) -> Option<PowerUp> {
    let center = brick.rect.center();
    if let Some(kind) = brick.bound_powerup() {
        return Some(spawn(kind, center, tuning));
    }
    if rng.random::<f64>() < tuning.powerup.drop_chance {
        let kind = PowerUpKind::POOL[rng.random_range(0..PowerUpKind::POOL.len())];
        return Some(spawn(kind, center, tuning));
    }
    None
}

/// Clear every timer that has run out and undo its effect
pub fn expire_timers(state: &mut GameState) {
    let now = state.clock;
    let expired = |t: Option<f64>| t.is_some_and(|t| t <= now);

    if expired(state.timers.widen_until) {
        state.paddle.w = state.base_paddle_width();
        state.timers.widen_until = None;
        log::debug!("Widen expired");
    }
    if expired(state.timers.shrink_until) {
        state.paddle.w = state.base_paddle_width();
        state.timers.shrink_until = None;
        log::debug!("Shrink expired");
    }
    if expired(state.timers.laser_until) {
        state.timers.laser_until = None;
        log::debug!("Laser expired");
    }
}

/// Move pickups by `scaled_dt`, collect the ones touching the paddle and
/// discard the ones that fell out. Effects apply after the pass, in
/// collection order.
pub fn update_pickups(state: &mut GameState, scaled_dt: f32) {
    for pickup in &mut state.powerups {
        pickup.rect.y += pickup.vy * scaled_dt;
    }

    let paddle = state.paddle.rect();
    let floor = state.tuning.playfield.height + PICKUP_LOSS_MARGIN;
    let mut collected = Vec::new();
    state.powerups.retain(|pickup| {
        if rect_intersects(&pickup.rect, &paddle) {
            collected.push(pickup.kind);
            false
        } else {
            pickup.rect.y <= floor
        }
    });

    for kind in collected {
        apply(state, kind);
    }
}

/// Apply a collected power-up
pub fn apply(state: &mut GameState, kind: PowerUpKind) {
    state.push_event(GameEvent::PowerUpCollected(kind));
    log::debug!("Collected {:?}", kind);

    let now = state.clock;
    match kind {
        PowerUpKind::MultiBall => {
            let n = state.tuning.multiball.clones;
            multiball::spawn(state, n);
        }
        PowerUpKind::Widen => {
            // Widen and shrink run independent timers; back-to-back pickups compound
            state.paddle.w *= state.tuning.powerup.widen_factor;
            state.timers.widen_until = Some(now + state.tuning.powerup.duration);
        }
        PowerUpKind::Shrink => {
            state.paddle.w *= state.tuning.powerup.shrink_factor;
            state.timers.shrink_until = Some(now + state.tuning.powerup.duration);
        }
        PowerUpKind::Laser => {
            state.timers.laser_until = Some(now + state.tuning.laser.duration);
        }
    }
    state.paddle.clamp_into(state.tuning.playfield.width);
}
