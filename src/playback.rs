//! Frame-by-frame playback of a precomputed trajectory
//!
//! Renderers advance one frame per animation tick and loop back to the start.
//! Playback only borrows the trajectory; it never changes it.

use crate::sim::{Point, Surface, Trajectory, distance_to_segment};

/// Looping cursor over a trajectory's frames
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    trajectory: &'a Trajectory,
    frame: usize,
}

impl<'a> Playback<'a> {
    pub fn new(trajectory: &'a Trajectory) -> Self {
        Self {
            trajectory,
            frame: 0,
        }
    }

    /// Current frame index (always below the frame count when non-empty)
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Position at any frame, wrapping past the end
    pub fn position(&self, frame: usize) -> Option<Point> {
        let points = &self.trajectory.points;
        if points.is_empty() {
            return None;
        }
        Some(points[frame % points.len()])
    }

    /// Position at the cursor
    pub fn current(&self) -> Option<Point> {
        self.position(self.frame)
    }

    /// Move to the next frame and return its position
    pub fn advance(&mut self) -> Option<Point> {
        let len = self.trajectory.points.len();
        if len == 0 {
            return None;
        }
        self.frame = (self.frame + 1) % len;
        self.current()
    }

    /// Jump to a frame (wrapped into range)
    pub fn seek(&mut self, frame: usize) {
        let len = self.trajectory.points.len();
        self.frame = if len == 0 { 0 } else { frame % len };
    }

    /// Surfaces to highlight at `frame`
    pub fn active_surfaces(&self, frame: usize) -> impl Iterator<Item = (usize, &'a Surface)> + '_ {
        self.trajectory
            .lines
            .iter()
            .enumerate()
            .filter(move |(_, line)| line.is_active(frame))
    }

    /// Index and distance of the surface closest to `point`
    pub fn nearest_surface(&self, point: Point) -> Option<(usize, f64)> {
        self.trajectory
            .lines
            .iter()
            .map(|line| distance_to_segment(point, line))
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
