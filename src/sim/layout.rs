//! Brick layout: turns a normalized level grid into positioned bricks
//!
//! Cells map to bricks as follows:
//! - `'1'..='9'`: normal brick with that many hit points
//! - `'X'`: steel brick, never destroyed
//! - `'0'`: empty
//! - anything else: a one-hit special brick bound to that letter
//!
//! The grid is centered horizontally. Row height is capped both by a share
//! of the playfield height and by an absolute maximum so tall grids never
//! push bricks down into the paddle's space.

use super::rect::Rect;
use super::state::{Brick, BrickKind};
use crate::config::Tuning;
use crate::consts::STEEL_HP;
use crate::levels::{EMPTY_CELL, Level};

/// Kind and starting hit points for a grid cell, `None` for an empty cell
pub fn cell_brick(cell: char) -> Option<(BrickKind, i32)> {
    match cell {
        EMPTY_CELL => None,
        '1'..='9' => Some((BrickKind::Normal, cell as i32 - '0' as i32)),
        'X' => Some((BrickKind::Steel, STEEL_HP)),
        other => Some((BrickKind::Special(other), 1)),
    }
}

/// Build the brick list for `level` in row-major order
pub fn build_bricks(level: &Level, tuning: &Tuning) -> Vec<Brick> {
    let bt = &tuning.brick;
    let (width, height) = (tuning.playfield.width, tuning.playfield.height);
    let cols = level.cols;
    let rows = level.rows;

    let total_gap_x = cols.saturating_sub(1) as f32 * bt.gap;
    let available_w = width - bt.margin_x * 2.0 - total_gap_x;
    let brick_w = (available_w / cols.max(1) as f32).floor().max(bt.min_width);

    let total_gap_y = rows.saturating_sub(1) as f32 * bt.gap;
    let max_grid_h = (height * bt.max_height_ratio).floor();
    let brick_h = ((max_grid_h - total_gap_y) / rows.max(1) as f32)
        .floor()
        .min(bt.max_height)
        .max(1.0);

    let total_w = cols as f32 * brick_w + total_gap_x;
    let x0 = ((width - total_w) / 2.0).floor();
    let y0 = bt.top;

    let mut bricks = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let Some((kind, hp)) = cell_brick(level.cell(row, col)) else {
                continue;
            };
            let rect = Rect::new(
                x0 + col as f32 * (brick_w + bt.gap),
                y0 + row as f32 * (brick_h + bt.gap),
                brick_w,
                brick_h,
            );
            bricks.push(Brick::new(rect, kind, hp));
        }
    }

    log::debug!(
        "Laid out {} bricks for '{}' ({}x{}, brick {}x{})",
        bricks.len(),
        level.name,
        rows,
        cols,
        brick_w,
        brick_h
    );
    bricks
}
