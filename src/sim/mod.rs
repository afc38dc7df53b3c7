//! Deterministic simulation module
//!
//! All trajectory logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Balls passed by value, never shared
//! - No rendering or I/O dependencies

pub mod collision;
pub mod planner;
pub mod state;
pub mod surface;
pub mod tick;

pub use collision::{
    closest_point_on_segment, collision_response, distance_to_segment,
    reflect, reflect_velocity, surface_normal,
};
pub use planner::{Planner, simulate_ball_motion, validate_ball, validate_schedule};
pub use state::{Ball, Bounds, Point, Surface, Trajectory};
pub use surface::synthesize_surface;
pub use tick::{Motion, motion_until_impact, step};
