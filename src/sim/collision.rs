//! Collision response against generated surfaces
//!
//! Surfaces are treated as infinite lines for reflection: there is no segment
//! bounds check and no restitution or friction. Velocity is reflected
//! specularly and the ball is nudged off the line.

use super::state::{Ball, Point, Surface};
use crate::consts::COLLISION_NUDGE;
use crate::error::{Result, SimError};
use crate::perpendicular;

/// Unit normal of a surface: the start→end direction rotated (-dy, dx)
///
/// Fails on a zero-length surface instead of producing NaNs.
pub fn surface_normal(surface: &Surface) -> Result<Point> {
    let normal = perpendicular(surface.direction());
    normal.try_normalize().ok_or(SimError::DegenerateGeometry {
        what: "surface normal",
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Point, normal: Point) -> Point {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect `velocity` off the infinite line through `surface`
pub fn reflect(velocity: Point, surface: &Surface) -> Result<Point> {
    let normal = surface_normal(surface)?;
    Ok(reflect_velocity(velocity, normal))
}

/// Bounce the ball off a surface
///
/// Returns the ball with reflected velocity, moved `COLLISION_NUDGE` along the
/// surface normal so the next step doesn't start inside the line.
pub fn collision_response(ball: &Ball, surface: &Surface) -> Result<Ball> {
    let normal = surface_normal(surface)?;
    Ok(Ball {
        position: ball.position + normal * COLLISION_NUDGE,
        velocity: reflect_velocity(ball.velocity, normal),
        radius: ball.radius,
    })
}

/// Closest point on a surface segment to `point`
///
/// A zero-length segment collapses to its start point.
pub fn closest_point_on_segment(point: Point, surface: &Surface) -> Point {
    let line_vec = surface.direction();
    let len_sq = line_vec.length_squared();
    if len_sq == 0.0 {
        return surface.start;
    }
    let t = ((point - surface.start).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    surface.start + line_vec * t
}

/// Shortest distance from a point to a surface segment
#[inline]
pub fn distance_to_segment(point: Point, surface: &Surface) -> f64 {
    point.distance(closest_point_on_segment(point, surface))
}
