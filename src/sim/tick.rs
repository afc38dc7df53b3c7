//! Fixed timestep kinematics
//!
//! Advances one ball under constant gravity between two scheduled impacts,
//! reflecting off the horizontal walls, then bounces it off a freshly
//! generated surface.

use super::collision::collision_response;
use super::state::{Ball, Bounds, Point, Surface};
use super::surface::synthesize_surface;
use crate::consts::{GRAVITY, MAX_SAMPLES};
use crate::direction_of;
use crate::error::{Result, SimError};

/// Output of one leg of travel
#[derive(Debug, Clone)]
pub struct Motion {
    /// Sampled position after every step, in order
    pub positions: Vec<Point>,
    /// Ball after bouncing off `surface`
    pub final_ball: Ball,
    /// Surface generated where the leg ended
    pub surface: Surface,
}

/// Advance a ball by one fixed timestep
///
/// Semi-implicit Euler: gravity updates velocity first, then position moves
/// with the new velocity. Wall checks run after the move, so a ball pressed
/// against a wall may flip every step.
#[inline]
pub fn step(ball: &Ball, dt: f64, bounds: &Bounds) -> Ball {
    let mut next = *ball;
    next.velocity.y += GRAVITY * dt;
    next.position += next.velocity * dt;

    if bounds.is_outside(&next) {
        next.velocity.x = -next.velocity.x;
    }
    next
}

/// Rough number of samples a leg will produce, for preallocation
fn expected_samples(duration: f64, dt: f64) -> usize {
    if duration > 0.0 {
        ((duration / dt).ceil() as usize).saturating_add(1)
    } else {
        0
    }
}

/// Simulate from `ball` until `duration` seconds have elapsed
///
/// Elapsed time accumulates in whole steps and is not clamped, so the last
/// sample may land up to one step past `duration`. A zero or negative
/// duration produces no samples but still generates a surface. Legs longer
/// than `MAX_SAMPLES` steps are rejected before any stepping.
pub fn motion_until_impact(
    ball: &Ball,
    duration: f64,
    frame_rate: f64,
    bounds: &Bounds,
    surface_length: f64,
) -> Result<Motion> {
    let dt = 1.0 / frame_rate;
    if duration / dt > MAX_SAMPLES {
        return Err(SimError::InvalidParameter {
            name: "duration",
            value: duration,
        });
    }
    let mut positions = Vec::with_capacity(expected_samples(duration, dt));
    let mut current = *ball;
    let mut elapsed = 0.0;

    while elapsed < duration {
        current = step(&current, dt, bounds);
        positions.push(current.position);
        elapsed += dt;
    }

    let surface = synthesize_surface(
        current.position,
        direction_of(current.velocity),
        surface_length,
        current.radius,
    );
    let final_ball = collision_response(&current, &surface)?;

    Ok(Motion {
        positions,
        final_ball,
        surface,
    })
}
