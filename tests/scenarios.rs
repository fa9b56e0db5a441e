//! End-to-end gameplay scenarios driven through the public API

use brickfall::sim::{
    Ball, BrickKind, Bullet, GameEvent, GameState, PowerUpKind, TickInput, build_bricks, powerup,
    step, tick,
};
use brickfall::{LevelSet, Tuning};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn levels(json: &str) -> LevelSet {
    LevelSet::from_json(json).expect("valid level json")
}

/// Running game on `set` with random drops disabled
fn running(set: LevelSet) -> GameState {
    let mut tuning = Tuning::default();
    tuning.powerup.drop_chance = 0.0;
    let mut state = GameState::new(tuning, set, 2024);
    state.running = true;
    state
}

fn free_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
    let ball: &mut Ball = &mut state.balls[0];
    ball.stuck = false;
    ball.pos = pos;
    ball.vel = vel;
}

#[test]
fn single_brick_destroyed_in_one_hit_clears_level() {
    let mut state = running(levels(
        r#"{"levels": [{"name": "One", "rows": 1, "cols": 1, "grid": ["1"]}]}"#,
    ));
    assert_eq!(state.bricks.len(), 1);
    let brick = state.bricks[0].rect;
    assert_eq!(state.bricks[0].kind, BrickKind::Normal);

    // Just below the brick, heading straight up
    free_ball(&mut state, Vec2::new(480.0, brick.bottom() + 11.0), Vec2::new(0.0, -420.0));
    tick(&mut state, &TickInput::default(), DT);

    assert_eq!(state.score, 10);
    let events = state.drain_events();
    let hit = events
        .iter()
        .position(|e| *e == GameEvent::BrickHit { destroyed: true })
        .expect("brick destroyed");
    let won = events
        .iter()
        .position(|e| *e == GameEvent::LevelWon { next: 0 })
        .expect("level cleared on the same step");
    assert!(hit < won);

    // The only level wraps onto itself with a fresh layout and kept stats
    assert_eq!(state.level_index, 0);
    assert!(state.bricks.iter().all(|b| b.alive));
    assert_eq!(state.lives, 3);
    assert!(state.balls[0].stuck);
}

#[test]
fn steel_brick_survives_unlimited_ball_and_bullet_hits() {
    let mut state = running(levels(
        r#"{"levels": [{"name": "Wall", "rows": 1, "cols": 1, "grid": ["X"]}]}"#,
    ));
    let brick = state.bricks[0].rect;
    assert_eq!(state.bricks[0].kind, BrickKind::Steel);

    for _ in 0..200 {
        free_ball(&mut state, Vec2::new(480.0, brick.bottom() + 11.0), Vec2::new(0.0, -420.0));
        state.bullets.push(Bullet {
            pos: Vec2::new(300.0, brick.bottom() + 4.0),
            vel: Vec2::new(0.0, -820.0),
            born: state.clock,
        });
        step(&mut state, &TickInput::default(), DT);

        assert!(state.bricks[0].alive);
        assert!(state.bullets.is_empty(), "steel still consumes bullets");
        assert!(state.balls[0].vel.y > 0.0, "ball bounced off steel");
    }
    assert_eq!(state.score, 0);
    assert!(!state.drain_events().iter().any(|e| matches!(e, GameEvent::LevelWon { .. })));
}

#[test]
fn ball_destroying_bound_brick_drops_its_pickup() {
    let mut state = running(levels(r#"{"levels": [{"name": "Bound", "grid": ["W1"]}]}"#));
    let brick = state.bricks[0].rect;
    assert_eq!(state.bricks[0].kind, BrickKind::Special('W'));

    free_ball(&mut state, Vec2::new(brick.x + 20.0, brick.bottom() + 11.0), Vec2::new(0.0, -420.0));
    step(&mut state, &TickInput::default(), DT);

    assert!(!state.bricks[0].alive);
    assert_eq!(state.score, 10);
    assert_eq!(state.powerups.len(), 1);
    assert_eq!(state.powerups[0].kind, PowerUpKind::Widen);
    assert_eq!(state.powerups[0].rect.center(), brick.center());
}

#[test]
fn bullet_destroying_bound_brick_drops_its_pickup() {
    let mut state = running(levels(r#"{"levels": [{"name": "Bound", "grid": ["S1"]}]}"#));
    let brick = state.bricks[0].rect;
    free_ball(&mut state, Vec2::new(700.0, 400.0), Vec2::new(0.0, -100.0));
    state.bullets.push(Bullet {
        pos: Vec2::new(brick.x + 20.0, brick.bottom() + 4.0),
        vel: Vec2::new(0.0, -820.0),
        born: state.clock,
    });
    step(&mut state, &TickInput::default(), DT);

    assert!(!state.bricks[0].alive);
    assert!(state.bricks[1].alive);
    assert!(state.bullets.is_empty());
    assert_eq!(state.score, 10);
    assert_eq!(state.powerups.len(), 1);
    assert_eq!(state.powerups[0].kind, PowerUpKind::Shrink);
    assert_eq!(state.powerups[0].rect.center(), brick.center());
}

#[test]
fn losing_last_life_resets_stats_and_level() {
    let mut state = running(LevelSet::fallback());
    let fresh = build_bricks(state.level(), &state.tuning);

    state.strike_brick(0);
    state.strike_brick(13);
    assert!(!state.bricks[0].alive);
    assert_eq!(state.score, 10);
    state.lives = 1;

    free_ball(&mut state, Vec2::new(480.0, 575.0), Vec2::new(0.0, 420.0));
    step(&mut state, &TickInput::default(), DT);

    assert_eq!(state.score, 0);
    assert_eq!(state.lives, 3);
    assert_eq!(state.bricks, fresh);
    assert!(!state.running);
    assert_eq!(state.balls.len(), 1);
    assert!(state.balls[0].stuck);
    assert_eq!(
        state.drain_events(),
        vec![
            GameEvent::BrickHit { destroyed: true },
            GameEvent::BrickHit { destroyed: false },
            GameEvent::LifeLost,
            GameEvent::GameOver,
        ]
    );
}

#[test]
fn losing_a_ball_with_lives_left_keeps_bricks_and_score() {
    let mut state = running(LevelSet::fallback());
    state.strike_brick(5);
    let bricks = state.bricks.clone();
    assert_eq!(state.score, 10);

    free_ball(&mut state, Vec2::new(480.0, 575.0), Vec2::new(0.0, 420.0));
    step(&mut state, &TickInput::default(), DT);

    assert_eq!(state.lives, 2);
    assert_eq!(state.score, 10);
    assert_eq!(state.bricks, bricks);
    assert!(state.running);
    assert_eq!(state.balls.len(), 1);
    assert!(state.balls[0].stuck);

    // The fresh ball launches upward
    tick(&mut state, &TickInput { launch: true, ..Default::default() }, DT);
    assert!(!state.balls[0].stuck);
    assert!(state.balls[0].vel.y < 0.0);
}

#[test]
fn clearing_every_brick_advances_once_and_wraps() {
    let mut state = running(levels(
        r#"{"levels": [
            {"name": "A", "grid": ["11", "11"]},
            {"name": "B", "grid": ["222"]}
        ]}"#,
    ));
    assert_eq!(state.levels.len(), 2);
    state.score = 70;

    for expected in [1, 0] {
        for brick in &mut state.bricks {
            brick.hp = 0;
            brick.alive = false;
        }
        free_ball(&mut state, Vec2::new(480.0, 400.0), Vec2::new(0.0, -100.0));
        step(&mut state, &TickInput::default(), DT);

        let won: Vec<GameEvent> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelWon { .. }))
            .collect();
        assert_eq!(won, vec![GameEvent::LevelWon { next: expected }]);
        assert_eq!(state.level_index, expected);
        assert!(state.bricks.iter().all(|b| b.alive));

        // Nothing further happens on the next step
        step(&mut state, &TickInput::default(), DT);
        assert!(state.drain_events().iter().all(|e| !matches!(e, GameEvent::LevelWon { .. })));
    }
    assert_eq!(state.score, 70);
    assert_eq!(state.lives, 3);
}

#[test]
fn multiball_from_single_ball_yields_three_upward_balls() {
    let mut state = running(LevelSet::fallback());
    let original_speed = state.balls[0].speed;
    powerup::apply(&mut state, PowerUpKind::MultiBall);

    assert_eq!(state.balls.len(), 3);
    for ball in &state.balls {
        assert!(!ball.stuck);
        assert!(ball.vel.y < 0.0);
    }
    for clone in &state.balls[1..] {
        assert!(clone.speed >= original_speed * 0.94 - 1e-3);
        assert!(clone.speed <= original_speed * 1.08 + 1e-3);
    }
}

#[test]
fn brick_hit_points_never_increase_during_play() {
    let mut state = GameState::new(Tuning::default(), LevelSet::fallback(), 77);
    let mut previous = state.bricks.clone();

    for _ in 0..3000 {
        let x = state.balls.first().map(|b| b.pos.x);
        let input = TickInput {
            move_to: x,
            launch: state.balls.iter().any(|b| b.stuck),
            fire: state.laser_active(),
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        let rebuilt = state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver | GameEvent::LevelWon { .. }));
        if !rebuilt {
            for (before, after) in previous.iter().zip(&state.bricks) {
                assert!(after.hp <= before.hp);
                assert!(before.alive || !after.alive, "a brick never comes back to life");
            }
        }
        previous = state.bricks.clone();
    }
}

#[test]
fn snapshot_serializes_to_json() {
    let state = running(LevelSet::fallback());
    let json = serde_json::to_value(&state).expect("state serializes");
    assert_eq!(json["score"], 0);
    assert_eq!(json["lives"], 3);
    assert_eq!(json["bricks"].as_array().map(Vec::len), Some(62));
    assert!(json.get("rng").is_none());
}
