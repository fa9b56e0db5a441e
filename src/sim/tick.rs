//! Frame driver and simulation step
//!
//! `tick` is called once per rendered frame with the wall-clock time since
//! the previous frame. It applies the frame's intents, caps the delta, and
//! runs one `step` if the game is running.

use glam::Vec2;

use super::collision::{circle_intersects, resolve_circle_rect};
use super::laser;
use super::powerup;
use super::state::{Ball, GameEvent, GameState, Paddle};
use crate::config::BallTuning;
use crate::consts::{BALL_LOSS_MARGIN, PADDLE_RELEASE_GAP};

/// Abstract player intents for one frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Center the paddle on this x (drag)
    pub move_to: Option<f32>,
    /// Start the run if stopped and release stuck balls
    pub launch: bool,
    /// Fire the laser (ignored unless armed)
    pub fire: bool,
    /// Start/pause toggle
    pub toggle_run: bool,
    /// Stop, reset stats and restart the current level
    pub reset: bool,
    /// Stop, reset stats and start this level
    pub select_level: Option<usize>,
    /// New global speed multiplier
    pub speed: Option<f32>,
}

/// Cap a wall-clock frame delta; negative or non-finite deltas become zero
pub fn frame_dt(elapsed: f32, max_frame_dt: f32) -> f32 {
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed.min(max_frame_dt)
    } else {
        0.0
    }
}

/// Advance one frame: apply intents, then step if running
pub fn tick(state: &mut GameState, input: &TickInput, elapsed: f32) {
    apply_intents(state, input);
    if state.running {
        let dt = frame_dt(elapsed, state.tuning.max_frame_dt);
        step(state, input, dt);
    }
}

/// Apply the frame's one-shot intents
pub fn apply_intents(state: &mut GameState, input: &TickInput) {
    if let Some(speed) = input.speed {
        state.speed_mul = if speed.is_finite() && speed > 0.0 { speed } else { 1.0 };
    }

    if let Some(index) = input.select_level {
        state.running = false;
        state.start_level(index, false);
    } else if input.reset {
        state.running = false;
        let current = state.level_index;
        state.start_level(current, false);
    }

    if input.toggle_run {
        state.running = !state.running;
        state.push_event(if state.running {
            GameEvent::RunStarted
        } else {
            GameEvent::RunPaused
        });
    }

    if input.launch {
        if !state.running {
            state.running = true;
            state.push_event(GameEvent::RunStarted);
        }
        state.launch_stuck_balls();
    }

    if let Some(x) = input.move_to {
        state.paddle.move_to(x, state.tuning.playfield.width);
        state.track_stuck_balls();
    }
}

/// Advance the simulation by `dt` seconds.
///
/// Phases run in a fixed order, each over the whole entity set. Losing the
/// last ball ends the step early.
pub fn step(state: &mut GameState, input: &TickInput, dt: f32) {
    state.clock += f64::from(dt);
    let scaled_dt = dt * state.speed_mul;

    powerup::expire_timers(state);

    move_paddle(state, input, dt);
    if input.fire {
        laser::try_fire(state);
    }

    powerup::update_pickups(state, scaled_dt);
    laser::advance_bullets(state, scaled_dt);

    update_balls(state, scaled_dt);

    if state.balls.is_empty() {
        lose_life(state);
        return;
    }

    laser::resolve_bullet_hits(state);

    if state.level_cleared() {
        log::info!("Level {} cleared", state.level_index + 1);
        state.next_level();
    }
}

/// Paddle velocity already includes the speed multiplier, so it integrates
/// over the unscaled `dt`
fn move_paddle(state: &mut GameState, input: &TickInput, dt: f32) {
    let mut dir = 0.0;
    if input.left {
        dir -= 1.0;
    }
    if input.right {
        dir += 1.0;
    }
    let paddle = &mut state.paddle;
    paddle.vx = dir * state.tuning.paddle.speed * state.speed_mul;
    paddle.x += paddle.vx * dt;
    paddle.clamp_into(state.tuning.playfield.width);
}

/// Bounce a downward-moving ball off the paddle.
///
/// The exit angle from vertical is proportional to where the ball struck
/// relative to the paddle center, and speed grows by the paddle boost,
/// clamped to `[speed, max_speed]`.
pub fn deflect_off_paddle(ball: &mut Ball, paddle: &Paddle, tuning: &BallTuning) {
    ball.pos.y = paddle.y - ball.radius - PADDLE_RELEASE_GAP;
    let rel = ((ball.pos.x - paddle.center_x()) / (paddle.w / 2.0)).clamp(-1.0, 1.0);
    let angle = rel * tuning.max_bounce_angle;
    let speed = crate::clamp_lo(
        ball.vel.length() * tuning.paddle_boost,
        tuning.speed,
        tuning.max_speed,
    );
    ball.vel = Vec2::new(angle.sin() * speed, -(angle.cos() * speed).abs());
    ball.speed = speed;
}

/// Integrate and collide every ball, then purge the ones that fell out
fn update_balls(state: &mut GameState, scaled_dt: f32) {
    let (width, height) = (state.tuning.playfield.width, state.tuning.playfield.height);
    let paddle_rect = state.paddle.rect();

    for i in 0..state.balls.len() {
        let mut events = Vec::new();
        let mut struck = None;
        {
            let ball = &mut state.balls[i];
            if ball.stuck {
                ball.track_paddle(&state.paddle);
                continue;
            }

            ball.pos += ball.vel * scaled_dt;

            if ball.pos.x - ball.radius < 0.0 {
                ball.pos.x = ball.radius;
                ball.vel.x = -ball.vel.x;
                events.push(GameEvent::WallBounce);
            } else if ball.pos.x + ball.radius > width {
                ball.pos.x = width - ball.radius;
                ball.vel.x = -ball.vel.x;
                events.push(GameEvent::WallBounce);
            }
            if ball.pos.y - ball.radius < 0.0 {
                ball.pos.y = ball.radius;
                ball.vel.y = -ball.vel.y;
                events.push(GameEvent::WallBounce);
            }

            if ball.vel.y > 0.0 && circle_intersects(&ball.circle(), &paddle_rect) {
                deflect_off_paddle(ball, &state.paddle, &state.tuning.ball);
                events.push(GameEvent::PaddleBounce);
            }

            // First alive brick in scan order wins; the rest wait for later frames
            let circle = ball.circle();
            if let Some(index) = state
                .bricks
                .iter()
                .position(|b| b.alive && circle_intersects(&circle, &b.rect))
            {
                let contact = resolve_circle_rect(&circle, &state.bricks[index].rect);
                if contact.normal.x != 0.0 {
                    ball.vel.x = -ball.vel.x;
                }
                if contact.normal.y != 0.0 {
                    ball.vel.y = -ball.vel.y;
                }
                ball.pos += contact.normal * contact.penetration;
                struck = Some(index);
            }

            if ball.pos.y - ball.radius > height + BALL_LOSS_MARGIN {
                ball.dead = true;
            }
        }

        state.events.extend(events);
        if let Some(index) = struck {
            state.strike_brick(index);
        }
    }

    state.balls.retain(|b| !b.dead);
}

/// All balls are gone: take a life, or reset the run on the last one
fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::LifeLost);

    if state.lives == 0 {
        log::info!("Game over at score {}", state.score);
        state.push_event(GameEvent::GameOver);
        state.running = false;
        let current = state.level_index;
        state.start_level(current, false);
    } else {
        log::info!("Life lost, {} left", state.lives);
        state.reset_paddle_and_balls();
    }
}
