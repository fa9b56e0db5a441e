//! Collision detection and response for circles and rectangles
//!
//! Arcade model: a ball resolves against a brick along a single axis, so
//! bounces off bricks are always strictly horizontal or vertical.

use glam::Vec2;

use super::rect::{Circle, Rect};
use crate::consts::COLLISION_EPSILON;
use crate::sign_or_zero;

/// How to push a circle out of a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Axis-aligned unit normal pointing from the rectangle toward the ball
    /// (zero only in the degenerate case of a zero offset on both axes)
    pub normal: Vec2,
    /// Distance to move along `normal` to separate
    pub penetration: f32,
}

/// True iff the circle touches or overlaps the rectangle
#[inline]
pub fn circle_intersects(circle: &Circle, rect: &Rect) -> bool {
    let d = circle.center - rect.nearest_point(circle.center);
    d.length_squared() <= circle.radius * circle.radius
}

/// Standard AABB overlap; touching edges count as overlap
#[inline]
pub fn rect_intersects(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.x || a.x > b.right() || a.bottom() < b.y || a.y > b.bottom())
}

/// Compute the separation normal and depth for a circle against a rectangle.
///
/// A center strictly inside the rectangle exits through the nearest side
/// (ties resolve left, right, top, bottom) with penetration equal to the
/// radius. Otherwise the offset from the nearest point is snapped to its
/// dominant axis.
pub fn resolve_circle_rect(circle: &Circle, rect: &Rect) -> Contact {
    let c = circle.center;

    if rect.strictly_contains(c) {
        let left = (c.x - rect.x).abs();
        let right = (rect.right() - c.x).abs();
        let top = (c.y - rect.y).abs();
        let bottom = (rect.bottom() - c.y).abs();
        let min = left.min(right).min(top).min(bottom);

        let normal = if min == left {
            Vec2::NEG_X
        } else if min == right {
            Vec2::X
        } else if min == top {
            Vec2::NEG_Y
        } else {
            Vec2::Y
        };
        return Contact {
            normal,
            penetration: circle.radius,
        };
    }

    let d = c - rect.nearest_point(c);
    let dist = match d.length() {
        len if len > 0.0 => len,
        _ => COLLISION_EPSILON,
    };
    let n = d / dist;

    // Snap to the dominant axis; ties go vertical
    let normal = if n.x.abs() > n.y.abs() {
        Vec2::new(sign_or_zero(n.x), 0.0)
    } else {
        Vec2::new(0.0, sign_or_zero(n.y))
    };

    Contact {
        normal,
        penetration: (circle.radius - dist).max(0.0),
    }
}
