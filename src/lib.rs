//! Bounce Sim - A ball bouncing between generated impact lines, timed to music
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stepper, surfaces, collision, planner)
//! - `settings`: Simulation configuration (JSON)
//! - `tracks`: Per-instrument note schedules driving one ball each
//! - `playback`: Read-only frame cursor for renderers

pub mod error;
pub mod playback;
pub mod settings;
pub mod sim;
pub mod tracks;

pub use error::{Result, SimError};
pub use playback::Playback;
pub use settings::SimSettings;
pub use sim::{Ball, Bounds, Planner, Point, Surface, Trajectory, simulate_ball_motion};
pub use tracks::{Track, TrackSim, TrackSims, simulate_tracks};

use glam::DVec2;

/// Simulation constants
pub mod consts {
    /// Gravity (acceleration along +y, units/s²). +y points down the screen.
    pub const GRAVITY: f64 = 9.8;

    /// Distance the ball is pushed along the surface normal after a bounce
    pub const COLLISION_NUDGE: f64 = 0.1;

    /// Gap between the ball's edge and a freshly generated surface
    pub const SURFACE_CLEARANCE: f64 = 1.0;

    /// Default generated surface length
    pub const DEFAULT_SURFACE_LENGTH: f64 = 100.0;

    /// Default sample rate (frames per simulated second)
    pub const DEFAULT_FRAME_RATE: f64 = 60.0;

    /// Most samples a single trajectory may produce (10M points, ~160 MB)
    pub const MAX_SAMPLES: f64 = 10_000_000.0;

    /// Default horizontal walls
    pub const DEFAULT_X_MIN: f64 = -3000.0;
    pub const DEFAULT_X_MAX: f64 = 3000.0;
}

/// Unit vector in the direction of `v`, or zero for a zero vector
#[inline]
pub fn direction_of(v: DVec2) -> DVec2 {
    v.normalize_or_zero()
}

/// Perpendicular of `v` rotated a quarter turn: (-y, x)
#[inline]
pub fn perpendicular(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}
