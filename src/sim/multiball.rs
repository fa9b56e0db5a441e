//! Multi-ball: clone existing balls with a small random perturbation

use glam::Vec2;
use rand::Rng;

use super::state::{Ball, GameState};
use crate::config::MultiBallTuning;
use crate::sign_or_zero;

/// Uniform sample from `[lo, hi]`, or `lo` when the range is empty
fn jitter<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Build `n` new balls from `templates`, cycling through them in order.
///
/// Each clone keeps its template's radius and heads upward at a jittered
/// angle from vertical. The angle's horizontal component is mirrored by the
/// template's horizontal direction (a coin flip when it has none). Speed is
/// the template's cached speed scaled by a small random factor.
pub fn clones<R: Rng + ?Sized>(
    templates: &[Ball],
    n: usize,
    tuning: &MultiBallTuning,
    rng: &mut R,
) -> Vec<Ball> {
    if templates.is_empty() {
        return Vec::new();
    }

    (0..n)
        .map(|i| {
            let base = &templates[i % templates.len()];
            let angle = jitter(rng, -tuning.angle_jitter, tuning.angle_jitter);
            let speed = base.speed
                * (1.0 + jitter(rng, tuning.speed_jitter_min, tuning.speed_jitter_max));
            let mut side = sign_or_zero(base.vel.x);
            if side == 0.0 {
                side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            }
            let vel = Vec2::new(
                angle.sin() * speed * side,
                -(angle.cos() * speed).abs(),
            );
            let offset = Vec2::new(
                jitter(rng, -tuning.offset_x, tuning.offset_x),
                jitter(rng, -tuning.offset_y, tuning.offset_y),
            );
            Ball {
                pos: base.pos + offset,
                vel,
                radius: base.radius,
                speed,
                stuck: false,
                dead: false,
            }
        })
        .collect()
}

/// Add `n` clones to the game and release every stuck ball
pub fn spawn(state: &mut GameState, n: usize) {
    let new_balls = clones(&state.balls, n, &state.tuning.multiball, &mut state.rng);
    state.launch_stuck_balls();
    log::debug!(
        "Multi-ball: {} -> {} balls",
        state.balls.len(),
        state.balls.len() + new_balls.len()
    );
    state.balls.extend(new_balls);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::levels::LevelSet;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn template(vx: f32) -> Ball {
        Ball {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(vx, -300.0),
            radius: 8.0,
            speed: 420.0,
            stuck: false,
            dead: false,
        }
    }

    #[test]
    fn test_clones_point_up_within_speed_jitter() {
        let tuning = MultiBallTuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            for ball in clones(&[template(50.0)], 2, &tuning, &mut rng) {
                assert!(ball.vel.y < 0.0);
                assert!(ball.speed >= 420.0 * 0.94 - 1e-3 && ball.speed <= 420.0 * 1.08 + 1e-3);
                assert!((ball.vel.length() - ball.speed).abs() < 1e-2);
                assert!((ball.pos.x - 400.0).abs() <= 12.0 && (ball.pos.y - 300.0).abs() <= 6.0);
                assert!(!ball.stuck);
            }
        }
    }

    #[test]
    fn test_templates_cycle() {
        let tuning = MultiBallTuning {
            offset_x: 0.0,
            offset_y: 0.0,
            ..Default::default()
        };
        let mut a = template(1.0);
        a.pos = Vec2::new(100.0, 100.0);
        let mut b = template(1.0);
        b.pos = Vec2::new(700.0, 100.0);
        let mut rng = Pcg32::seed_from_u64(0);
        let out = clones(&[a, b], 3, &tuning, &mut rng);
        let xs: Vec<f32> = out.iter().map(|c| c.pos.x).collect();
        assert_eq!(xs, vec![100.0, 700.0, 100.0]);
    }

    #[test]
    fn test_no_templates_no_clones() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(clones(&[], 2, &MultiBallTuning::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_spawn_releases_stuck_ball() {
        let mut state = GameState::new(Tuning::default(), LevelSet::fallback(), 11);
        assert!(state.balls[0].stuck);
        spawn(&mut state, 2);
        assert_eq!(state.balls.len(), 3);
        assert!(state.balls.iter().all(|b| !b.stuck && b.vel.y < 0.0));
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let tuning = MultiBallTuning {
            angle_jitter: 0.0,
            speed_jitter_min: 0.0,
            speed_jitter_max: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(0);
        let out = clones(&[template(3.0)], 1, &tuning, &mut rng);
        assert_eq!(out[0].vel, Vec2::new(0.0, -420.0));
        assert_eq!(out[0].pos, Vec2::new(400.0, 300.0));
    }
}
