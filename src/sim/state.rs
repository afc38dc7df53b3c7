//! Simulation value types
//!
//! Everything here is plain data. Balls are `Copy` and threaded through the
//! stepper by value, so no caller ever observes a half-updated ball.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A 2D coordinate, used for both positions and velocities
pub type Point = DVec2;

/// Serde adapter writing points as `{"x": .., "y": ..}` objects
mod xy {
    use super::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xy {
        x: f64,
        y: f64,
    }

    impl From<&Point> for Xy {
        fn from(p: &Point) -> Self {
            Self { x: p.x, y: p.y }
        }
    }

    impl From<Xy> for Point {
        fn from(p: Xy) -> Self {
            Point::new(p.x, p.y)
        }
    }

    pub fn serialize<S: Serializer>(point: &Point, s: S) -> Result<S::Ok, S::Error> {
        Xy::from(point).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
        Xy::deserialize(d).map(Point::from)
    }

    pub mod seq {
        use super::*;

        pub fn serialize<S: Serializer>(points: &[Point], s: S) -> Result<S::Ok, S::Error> {
            s.collect_seq(points.iter().map(Xy::from))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Point>, D::Error> {
            let raw = Vec::<Xy>::deserialize(d)?;
            Ok(raw.into_iter().map(Point::from).collect())
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    #[serde(with = "xy")]
    pub position: Point,
    #[serde(with = "xy")]
    pub velocity: Point,
    /// Constant for the whole simulation
    pub radius: f64,
}

impl Ball {
    pub fn new(position: Point, velocity: Point, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Leftmost extent of the ball
    #[inline]
    pub fn left(&self) -> f64 {
        self.position.x - self.radius
    }

    /// Rightmost extent of the ball
    #[inline]
    pub fn right(&self) -> f64 {
        self.position.x + self.radius
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            position: DVec2::new(50.0, 50.0),
            velocity: DVec2::new(15.0, 0.0),
            radius: 10.0,
        }
    }
}

/// Horizontal walls the ball reflects off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, x_max: f64) -> Self {
        Self { x_min, x_max }
    }

    /// True when any part of the ball lies past a wall
    #[inline]
    pub fn is_outside(&self, ball: &Ball) -> bool {
        ball.left() < self.x_min || ball.right() > self.x_max
    }
}

/// A generated impact line
///
/// `start_frame`/`end_frame` index into the trajectory's `points` and mark
/// when this surface is the ball's current target. They drive highlighting
/// only; physics never reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    #[serde(with = "xy")]
    pub start: Point,
    #[serde(with = "xy")]
    pub end: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<usize>,
    /// `None` means the surface stays active until playback ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_frame: Option<usize>,
}

impl Surface {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            start_frame: None,
            end_frame: None,
        }
    }

    /// Vector from start to end
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    pub fn midpoint(&self) -> Point {
        (self.start + self.end) * 0.5
    }

    /// Whether `frame` falls inside this surface's tagged range
    pub fn is_active(&self, frame: usize) -> bool {
        let Some(start) = self.start_frame else {
            return false;
        };
        frame >= start && self.end_frame.is_none_or(|end| frame < end)
    }
}

/// Output of a full simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trajectory {
    /// One position per frame, in order
    #[serde(with = "xy::seq")]
    pub points: Vec<Point>,
    /// One per scheduled impact (the start of that impact's surface)
    #[serde(with = "xy::seq")]
    pub impact_points: Vec<Point>,
    /// One per scheduled impact
    pub lines: Vec<Surface>,
}

impl Trajectory {
    pub fn frame_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty()
    }
}
