//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one `GameState` aggregate.
//! Subsystems take the aggregate (or the fields they need) explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::build_bricks;
use super::powerup;
use super::rect::{Circle, Rect};
use crate::config::{LayoutMode, Tuning};
use crate::consts::*;
use crate::levels::{Level, LevelSet};

/// Something the presentation layer may want to react to (sound, flashes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off a wall, or pinged off steel
    WallBounce,
    PaddleBounce,
    /// A destructible brick lost a hit point
    BrickHit { destroyed: bool },
    PowerUpCollected(PowerUpKind),
    LaserFired,
    LifeLost,
    /// Last life lost; stats reset and the level restarts
    GameOver,
    /// Level cleared; `next` is the level now being played
    LevelWon { next: usize },
    RunStarted,
    RunPaused,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    MultiBall,
    Widen,
    Shrink,
    Laser,
}

impl PowerUpKind {
    /// Pool random drops are drawn from
    pub const POOL: [PowerUpKind; 4] = [
        PowerUpKind::MultiBall,
        PowerUpKind::Widen,
        PowerUpKind::Shrink,
        PowerUpKind::Laser,
    ];

    /// Grid letter that binds a brick to this power-up
    pub fn letter(self) -> char {
        match self {
            PowerUpKind::MultiBall => 'M',
            PowerUpKind::Widen => 'W',
            PowerUpKind::Shrink => 'S',
            PowerUpKind::Laser => 'L',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Self::POOL.into_iter().find(|k| k.letter() == c)
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickKind {
    /// Plain brick, 1-9 hit points
    Normal,
    /// Indestructible
    Steel,
    /// One-hit brick tagged with a grid letter
    Special(char),
}

/// What a single hit did to a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// Steel, or already dead
    Absorbed,
    Damaged,
    Destroyed,
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub hp: i32,
    pub kind: BrickKind,
    pub alive: bool,
}

impl Brick {
    pub fn new(rect: Rect, kind: BrickKind, hp: i32) -> Self {
        Self {
            rect,
            hp,
            kind,
            alive: true,
        }
    }

    /// Power-up this brick always drops, if it is bound to one
    pub fn bound_powerup(&self) -> Option<PowerUpKind> {
        match self.kind {
            BrickKind::Special(c) => PowerUpKind::from_letter(c),
            _ => None,
        }
    }

    /// Apply one hit. Steel and dead bricks are untouched; a brick dies the
    /// first time its hit points drop to zero or below.
    pub fn take_hit(&mut self) -> BrickHit {
        if !self.alive || self.kind == BrickKind::Steel {
            return BrickHit::Absorbed;
        }
        self.hp -= 1;
        if self.hp <= 0 {
            self.alive = false;
            BrickHit::Destroyed
        } else {
            BrickHit::Damaged
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cached speed, re-derived on every paddle bounce
    pub speed: f32,
    /// Anchored to the paddle, waiting for launch
    pub stuck: bool,
    /// Fell out of the playfield; purged after the ball pass
    #[serde(skip)]
    pub dead: bool,
}

impl Ball {
    /// Ball resting on the paddle's center, aimed straight up
    pub fn served(paddle: &Paddle, radius: f32, speed: f32, launch_factor: f32) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::new(0.0, -speed * launch_factor),
            radius,
            speed,
            stuck: true,
            dead: false,
        };
        ball.track_paddle(paddle);
        ball
    }

    /// Keep a stuck ball on top of the paddle center
    pub fn track_paddle(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.y - self.radius - STUCK_BALL_GAP);
    }

    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Horizontal velocity from the last move intent, speed multiplier included
    pub vx: f32,
}

impl Paddle {
    /// Paddle centered horizontally near the floor
    pub fn centered(tuning: &Tuning, width: f32) -> Self {
        let h = tuning.paddle.height;
        Self {
            x: (tuning.playfield.width - width) / 2.0,
            y: tuning.playfield.height - tuning.paddle.bottom_offset - h,
            w: width,
            h,
            vx: 0.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Keep `0 <= x <= playfield_width - w`
    pub fn clamp_into(&mut self, playfield_width: f32) {
        self.x = crate::clamp_lo(self.x, 0.0, playfield_width - self.w);
    }

    /// Center the paddle on `x` (drag input), clamped
    pub fn move_to(&mut self, x: f32, playfield_width: f32) {
        self.x = x - self.w / 2.0;
        self.clamp_into(playfield_width);
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub kind: PowerUpKind,
    /// Fall speed (units/s, positive is down)
    pub vy: f32,
}

/// A laser bullet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Vertical only; negative is up
    pub vel: Vec2,
    /// Game-clock time the bullet was fired
    pub born: f64,
}

impl Bullet {
    /// Hitbox centered horizontally on `pos`, extending mostly above it
    pub fn rect(&self, w: f32, h: f32) -> Rect {
        Rect::new(self.pos.x - w / 2.0, self.pos.y - h * 2.0 / 3.0, w, h)
    }
}

/// Effect expiry times on the game clock; `None` means inactive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub widen_until: Option<f64>,
    pub shrink_until: Option<f64>,
    pub laser_until: Option<f64>,
    /// When the laser last fired, for the cooldown
    pub last_shot: Option<f64>,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub levels: LevelSet,
    pub layout: LayoutMode,
    /// Seed the RNG was created from
    pub seed: u64,
    /// The simulation only advances while running
    pub running: bool,
    /// Scales every motion (paddle, balls, pickups, bullets)
    pub speed_mul: f32,
    pub level_index: usize,
    pub score: u64,
    pub lives: u32,
    /// Monotonic game clock (seconds)
    pub clock: f64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    /// Row-major; scan order for collisions
    pub bricks: Vec<Brick>,
    pub powerups: Vec<PowerUp>,
    pub bullets: Vec<Bullet>,
    pub timers: Timers,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub rng: Pcg32,
}

impl GameState {
    /// Create a stopped game on the first level
    pub fn new(tuning: Tuning, levels: LevelSet, seed: u64) -> Self {
        let paddle = Paddle::centered(&tuning, tuning.base_paddle_width(LayoutMode::Landscape));
        let mut state = Self {
            lives: tuning.initial_lives,
            tuning,
            levels,
            layout: LayoutMode::Landscape,
            seed,
            running: false,
            speed_mul: 1.0,
            level_index: 0,
            score: 0,
            clock: 0.0,
            paddle,
            balls: Vec::new(),
            bricks: Vec::new(),
            powerups: Vec::new(),
            bullets: Vec::new(),
            timers: Timers::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.start_level(0, false);
        state
    }

    /// Current level
    pub fn level(&self) -> &Level {
        self.levels.get(self.level_index)
    }

    /// Load level `index` (clamped): rebuild bricks, reset paddle and balls.
    /// With `keep_stats == false`, score and lives go back to their initial values.
    pub fn start_level(&mut self, index: usize, keep_stats: bool) {
        self.level_index = self.levels.clamp_index(index);
        if !keep_stats {
            self.reset_stats();
        }
        self.bricks = build_bricks(self.levels.get(self.level_index), &self.tuning);
        self.reset_paddle_and_balls();
        log::info!(
            "Level {} '{}' started ({} bricks, score {}, lives {})",
            self.level_index + 1,
            self.level().name,
            self.bricks.len(),
            self.score,
            self.lives
        );
    }

    /// Advance to the next level, wrapping to the first after the last
    pub fn next_level(&mut self) {
        let next = self.levels.next_index(self.level_index);
        self.push_event(GameEvent::LevelWon { next });
        self.start_level(next, true);
    }

    pub fn reset_stats(&mut self) {
        self.score = 0;
        self.lives = self.tuning.initial_lives;
    }

    /// Fresh paddle and a single stuck ball; clears pickups, bullets and timers
    pub fn reset_paddle_and_balls(&mut self) {
        self.paddle = Paddle::centered(&self.tuning, self.base_paddle_width());
        let ball = Ball::served(
            &self.paddle,
            self.tuning.ball_radius(self.layout),
            self.tuning.serve_speed(self.layout),
            self.tuning.ball.launch_factor,
        );
        self.balls = vec![ball];
        self.powerups.clear();
        self.bullets.clear();
        self.timers = Timers::default();
    }

    /// Paddle width for the current layout with no width effect applied
    pub fn base_paddle_width(&self) -> f32 {
        self.tuning.base_paddle_width(self.layout)
    }

    /// Switch layout; resizes the paddle if no width effect is running
    pub fn set_layout_mode(&mut self, layout: LayoutMode) {
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        if self.timers.widen_until.is_none() && self.timers.shrink_until.is_none() {
            let center = self.paddle.center_x();
            self.paddle.w = self.base_paddle_width();
            self.paddle.move_to(center, self.tuning.playfield.width);
        }
        self.track_stuck_balls();
        log::info!("Layout mode: {}", layout.as_str());
    }

    /// Release every stuck ball
    pub fn launch_stuck_balls(&mut self) {
        for ball in &mut self.balls {
            ball.stuck = false;
        }
    }

    pub fn track_stuck_balls(&mut self) {
        for ball in self.balls.iter_mut().filter(|b| b.stuck) {
            ball.track_paddle(&self.paddle);
        }
    }

    pub fn laser_active(&self) -> bool {
        self.timers.laser_until.is_some()
    }

    /// True once no brick is left alive
    pub fn level_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.alive)
    }

    /// Hit brick `index` once: steel pings, others lose a hit point, and a
    /// destroyed brick scores and may drop a power-up.
    pub fn strike_brick(&mut self, index: usize) {
        let Some(brick) = self.bricks.get_mut(index) else {
            return;
        };
        match brick.take_hit() {
            BrickHit::Absorbed => {
                if brick.kind == BrickKind::Steel {
                    self.events.push(GameEvent::WallBounce);
                }
            }
            BrickHit::Damaged => self.events.push(GameEvent::BrickHit { destroyed: false }),
            BrickHit::Destroyed => {
                self.events.push(GameEvent::BrickHit { destroyed: true });
                self.score += self.tuning.score_per_brick;
                if let Some(pickup) = powerup::drop_for(&self.bricks[index], &self.tuning, &mut self.rng) {
                    self.powerups.push(pickup);
                }
            }
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
