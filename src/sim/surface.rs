//! Impact surface synthesis
//!
//! A fresh horizontal line is generated at every scheduled impact, placed just
//! outside the ball on the side it is travelling toward.

use glam::DVec2;

use super::state::{Point, Surface};
use crate::consts::SURFACE_CLEARANCE;

/// Build the next impact surface for a ball at `impact_point`
///
/// Falling balls (`velocity.y > 0`) get a surface below them, rising or
/// stationary balls one above. The gap of `radius + SURFACE_CLEARANCE` keeps
/// the new line clear of the ball at the moment it appears.
pub fn synthesize_surface(impact_point: Point, velocity: Point, length: f64, radius: f64) -> Surface {
    let half_length = length / 2.0;

    let offset = radius + SURFACE_CLEARANCE;
    let y_offset = if velocity.y > 0.0 { offset } else { -offset };
    let y = impact_point.y + y_offset;

    Surface::new(
        DVec2::new(impact_point.x - half_length, y),
        DVec2::new(impact_point.x + half_length, y),
    )
}
