//! Laser: cooldown-gated twin bullets fired from the paddle edges

use glam::Vec2;

use super::collision::rect_intersects;
use super::state::{Bullet, GameEvent, GameState};
use crate::consts::{BULLET_SPAWN_OFFSET, BULLET_TOP_MARGIN};

/// Fire a volley if the laser is armed and the cooldown has elapsed.
/// Returns whether bullets were spawned.
pub fn try_fire(state: &mut GameState) -> bool {
    if !state.laser_active() {
        return false;
    }
    let now = state.clock;
    if state
        .timers
        .last_shot
        .is_some_and(|t| now - t < state.tuning.laser.cooldown)
    {
        return false;
    }
    state.timers.last_shot = Some(now);

    let laser = &state.tuning.laser;
    let y = state.paddle.y - BULLET_SPAWN_OFFSET;
    let vel = Vec2::new(0.0, -laser.bullet_speed);
    for x in [
        state.paddle.x + laser.muzzle_inset,
        state.paddle.x + state.paddle.w - laser.muzzle_inset,
    ] {
        state.bullets.push(Bullet {
            pos: Vec2::new(x, y),
            vel,
            born: now,
        });
    }
    state.push_event(GameEvent::LaserFired);
    true
}

/// Move bullets by `scaled_dt` and drop the ones above the top margin
pub fn advance_bullets(state: &mut GameState, scaled_dt: f32) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * scaled_dt;
    }
    state.bullets.retain(|b| b.pos.y > BULLET_TOP_MARGIN);
}

/// Resolve bullets against bricks. Each bullet strikes the first alive
/// brick it overlaps (steel included, which just absorbs it) and is spent.
pub fn resolve_bullet_hits(state: &mut GameState) {
    let (w, h) = (state.tuning.laser.bullet_width, state.tuning.laser.bullet_height);
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        let hitbox = bullet.rect(w, h);
        let hit = state
            .bricks
            .iter()
            .position(|brick| brick.alive && rect_intersects(&hitbox, &brick.rect));
        match hit {
            Some(index) => state.strike_brick(index),
            None => survivors.push(bullet),
        }
    }
    state.bullets = survivors;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::levels::LevelSet;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Brick, BrickKind};

    fn armed() -> GameState {
        let mut state = GameState::new(Tuning::default(), LevelSet::fallback(), 1);
        state.tuning.powerup.drop_chance = 0.0;
        state.clock = 2.0;
        state.timers.laser_until = Some(5.0);
        state
    }

    #[test]
    fn test_fire_requires_active_laser() {
        let mut state = armed();
        state.timers.laser_until = None;
        assert!(!try_fire(&mut state));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_fire_spawns_two_bullets_from_edges() {
        let mut state = armed();
        assert!(try_fire(&mut state));
        assert_eq!(state.bullets.len(), 2);
        let p = state.paddle.clone();
        assert_eq!(state.bullets[0].pos, Vec2::new(p.x + 12.0, p.y - 6.0));
        assert_eq!(state.bullets[1].pos, Vec2::new(p.x + p.w - 12.0, p.y - 6.0));
        assert!(state.bullets.iter().all(|b| b.vel == Vec2::new(0.0, -820.0) && b.born == 2.0));
        assert_eq!(state.drain_events(), vec![GameEvent::LaserFired]);
    }

    #[test]
    fn test_cooldown_limits_rate() {
        let mut state = armed();
        assert!(try_fire(&mut state));
        state.clock += 0.05;
        assert!(!try_fire(&mut state));
        state.clock += 0.1;
        assert!(try_fire(&mut state));
        assert_eq!(state.bullets.len(), 4);
    }

    #[test]
    fn test_bullets_leave_through_top() {
        let mut state = armed();
        state.bricks.clear();
        state.bullets.push(Bullet {
            pos: Vec2::new(100.0, -10.0),
            vel: Vec2::new(0.0, -820.0),
            born: 0.0,
        });
        state.bullets.push(Bullet {
            pos: Vec2::new(100.0, 300.0),
            vel: Vec2::new(0.0, -820.0),
            born: 0.0,
        });
        advance_bullets(&mut state, 0.02);
        assert_eq!(state.bullets.len(), 1);
        assert!((state.bullets[0].pos.y - (300.0 - 16.4)).abs() < 1e-3);
    }

    #[test]
    fn test_bullet_damages_first_brick_and_is_spent() {
        let mut state = armed();
        state.bricks = vec![
            Brick::new(Rect::new(90.0, 100.0, 40.0, 20.0), BrickKind::Normal, 2),
            Brick::new(Rect::new(90.0, 100.0, 40.0, 20.0), BrickKind::Normal, 2),
        ];
        state.bullets.push(Bullet {
            pos: Vec2::new(100.0, 125.0),
            vel: Vec2::ZERO,
            born: 0.0,
        });
        resolve_bullet_hits(&mut state);
        assert!(state.bullets.is_empty());
        assert_eq!(state.bricks[0].hp, 1);
        assert_eq!(state.bricks[1].hp, 2);
    }

    #[test]
    fn test_steel_absorbs_bullets() {
        let mut state = armed();
        state.bricks = vec![Brick::new(
            Rect::new(90.0, 100.0, 40.0, 20.0),
            BrickKind::Steel,
            crate::consts::STEEL_HP,
        )];
        for _ in 0..50 {
            state.bullets.push(Bullet {
                pos: Vec2::new(100.0, 125.0),
                vel: Vec2::ZERO,
                born: 0.0,
            });
            resolve_bullet_hits(&mut state);
        }
        assert!(state.bullets.is_empty());
        assert!(state.bricks[0].alive);
        assert_eq!(state.bricks[0].hp, crate::consts::STEEL_HP);
    }
}
