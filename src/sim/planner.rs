//! Trajectory planner
//!
//! Chains stepper legs across a schedule of absolute impact times into one
//! continuous position sequence plus the surfaces generated along the way.

use super::state::{Ball, Bounds, Trajectory};
use super::tick::motion_until_impact;
use crate::consts::{DEFAULT_SURFACE_LENGTH, MAX_SAMPLES};
use crate::error::{Result, SimError};
use crate::settings::SimSettings;

/// Check that impact times are finite, non-negative and non-decreasing
///
/// Repeated times are fine (chords produce them); they become zero-length legs.
pub fn validate_schedule(times: &[f64]) -> Result<()> {
    let mut previous = 0.0;
    for (index, &time) in times.iter().enumerate() {
        let reason = if time.is_nan() {
            Some("time is NaN")
        } else if time.is_infinite() {
            Some("time is infinite")
        } else if time < 0.0 {
            Some("time is negative")
        } else if time < previous {
            Some("times must be ascending")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SimError::InvalidSchedule {
                index,
                time,
                reason,
            });
        }
        previous = time;
    }
    Ok(())
}

fn check_param(name: &'static str, value: f64, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}

/// Reject a ball whose radius is negative or not finite
pub fn validate_ball(ball: &Ball) -> Result<()> {
    let r = ball.radius;
    check_param("radius", r, r.is_finite() && r >= 0.0)
}

/// Fixed inputs shared by every leg of a trajectory
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    pub frame_rate: f64,
    pub bounds: Bounds,
    pub surface_length: f64,
}

impl Planner {
    pub fn new(frame_rate: f64, bounds: Bounds) -> Self {
        Self {
            frame_rate,
            bounds,
            surface_length: DEFAULT_SURFACE_LENGTH,
        }
    }

    pub fn with_settings(settings: &SimSettings) -> Self {
        Self {
            frame_rate: settings.frame_rate,
            bounds: settings.bounds(),
            surface_length: settings.surface_length,
        }
    }

    /// Reject parameters the stepper can't run with
    ///
    /// A zero surface length passes here and fails later as degenerate geometry.
    pub fn validate(&self) -> Result<()> {
        let fr = self.frame_rate;
        check_param("frame_rate", fr, fr.is_finite() && fr > 0.0)?;

        let Bounds { x_min, x_max } = self.bounds;
        check_param("x_min", x_min, x_min.is_finite())?;
        check_param("x_max", x_max, x_max.is_finite() && x_max > x_min)?;

        let len = self.surface_length;
        check_param("surface_length", len, len.is_finite() && len >= 0.0)
    }

    /// Reject schedules that would sample more than `MAX_SAMPLES` frames
    ///
    /// Times are absolute, so the last one bounds the total frame count.
    fn check_sample_budget(&self, times: &[f64]) -> Result<()> {
        let Some(&last) = times.last() else {
            return Ok(());
        };
        if last * self.frame_rate > MAX_SAMPLES {
            return Err(SimError::InvalidSchedule {
                index: times.len() - 1,
                time: last,
                reason: "too many frames at this frame rate",
            });
        }
        Ok(())
    }

    /// Simulate `ball` through every scheduled impact
    ///
    /// Each surface becomes active at the frame where its leg starts and stays
    /// active until the *following* leg finishes; the last surface is left
    /// open-ended. Any error aborts the whole trajectory.
    pub fn simulate(&self, ball: &Ball, times_of_impact: &[f64]) -> Result<Trajectory> {
        self.validate()?;
        validate_ball(ball)?;
        validate_schedule(times_of_impact)?;
        self.check_sample_budget(times_of_impact)?;

        let mut trajectory = Trajectory {
            points: Vec::new(),
            impact_points: Vec::with_capacity(times_of_impact.len()),
            lines: Vec::with_capacity(times_of_impact.len()),
        };
        let mut current_ball = *ball;
        let mut current_time = 0.0;

        for &time_of_impact in times_of_impact {
            let interval = time_of_impact - current_time;
            let motion = motion_until_impact(
                &current_ball,
                interval,
                self.frame_rate,
                &self.bounds,
                self.surface_length,
            )?;

            let mut surface = motion.surface;
            surface.start_frame = Some(trajectory.points.len());
            trajectory.points.extend(motion.positions);

            if let Some(previous) = trajectory.lines.last_mut() {
                previous.end_frame = Some(trajectory.points.len());
            }

            log::debug!(
                "impact at t={:.3}s: {} frames, surface y={:.2}",
                time_of_impact,
                trajectory.points.len(),
                surface.start.y
            );

            trajectory.impact_points.push(surface.start);
            trajectory.lines.push(surface);
            current_ball = motion.final_ball;
            current_time = time_of_impact;
        }

        Ok(trajectory)
    }
}

/// Simulate a ball through a schedule of absolute impact times
///
/// Uses the default surface length; see [`Planner`] to configure it.
pub fn simulate_ball_motion(
    ball: &Ball,
    times_of_impact: &[f64],
    frame_rate: f64,
    bounds: Bounds,
) -> Result<Trajectory> {
    Planner::new(frame_rate, bounds).simulate(ball, times_of_impact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use proptest::prelude::*;

    fn ball() -> Ball {
        Ball::new(DVec2::ZERO, DVec2::new(0.0, 1.0), 1.0)
    }

    fn bounds() -> Bounds {
        Bounds::new(-100.0, 100.0)
    }

    #[test]
    fn test_validate_schedule() {
        assert!(validate_schedule(&[]).is_ok());
        assert!(validate_schedule(&[0.0, 0.0, 1.5, 1.5, 3.0]).is_ok());

        let err = validate_schedule(&[1.0, 0.5]).unwrap_err();
        assert!(matches!(err, SimError::InvalidSchedule { index: 1, .. }));

        let err = validate_schedule(&[-1.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidSchedule { index: 0, .. }));

        let err = validate_schedule(&[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SimError::InvalidSchedule { index: 1, .. }));

        assert!(validate_schedule(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        let b = ball();
        for fr in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = simulate_ball_motion(&b, &[1.0], fr, bounds()).unwrap_err();
            assert!(matches!(err, SimError::InvalidParameter { name: "frame_rate", .. }));
        }

        let err = simulate_ball_motion(&b, &[1.0], 20.0, Bounds::new(5.0, 5.0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "x_max", .. }));

        let mut negative = b;
        negative.radius = -1.0;
        let err = simulate_ball_motion(&negative, &[1.0], 20.0, bounds()).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "radius", .. }));
    }

    #[test]
    fn test_schedule_over_sample_budget() {
        let err = simulate_ball_motion(&ball(), &[1.0, 1e18], 60.0, bounds()).unwrap_err();
        assert!(matches!(err, SimError::InvalidSchedule { index: 1, .. }));

        // Same length is fine at a rate that keeps it under the budget
        let fr = MAX_SAMPLES / 1000.0;
        assert!(Planner::new(fr, bounds()).check_sample_budget(&[1000.0]).is_ok());
        assert!(Planner::new(fr, bounds()).check_sample_budget(&[1000.5]).is_err());
    }

    #[test]
    fn test_validate_ball() {
        assert!(validate_ball(&ball()).is_ok());
        let mut b = ball();
        b.radius = f64::NAN;
        assert!(validate_ball(&b).is_err());
        b.radius = 0.0;
        assert!(validate_ball(&b).is_ok());
    }

    #[test]
    fn test_empty_schedule() {
        let traj = simulate_ball_motion(&ball(), &[], 20.0, bounds()).unwrap();
        assert!(traj.is_empty());
        assert!(traj.impact_points.is_empty());
    }

    #[test]
    fn test_single_zero_time() {
        let traj = simulate_ball_motion(&ball(), &[0.0], 20.0, bounds()).unwrap();
        assert!(traj.points.is_empty());
        assert_eq!(traj.lines.len(), 1);
        assert_eq!(traj.impact_points.len(), 1);
        assert_eq!(traj.lines[0].start_frame, Some(0));
        assert_eq!(traj.lines[0].end_frame, None);
        assert_eq!(traj.impact_points[0], traj.lines[0].start);
    }

    #[test]
    fn test_frame_tags_overlap_following_leg() {
        let traj = simulate_ball_motion(&ball(), &[1.0, 2.0, 3.5], 10.0, bounds()).unwrap();
        let lines = &traj.lines;

        // Recover per-leg cumulative counts from the start tags
        let starts: Vec<usize> = lines.iter().map(|l| l.start_frame.unwrap()).collect();
        assert_eq!(starts[0], 0);
        assert!(starts[1] > starts[0] && starts[2] > starts[1]);

        // Surface i ends where leg i+1 ends, i.e. at surface i+2's start
        assert_eq!(lines[0].end_frame, Some(starts[2]));
        assert_eq!(lines[1].end_frame, Some(traj.points.len()));
        assert_eq!(lines[2].end_frame, None);
    }

    #[test]
    fn test_zero_length_surface_aborts() {
        let planner = Planner {
            frame_rate: 20.0,
            bounds: bounds(),
            surface_length: 0.0,
        };
        let err = planner.simulate(&ball(), &[0.5, 1.0]).unwrap_err();
        assert!(matches!(err, SimError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_custom_surface_length() {
        let planner = Planner {
            surface_length: 12.0,
            ..Planner::new(20.0, bounds())
        };
        let traj = planner.simulate(&ball(), &[0.5]).unwrap();
        assert!((traj.lines[0].length() - 12.0).abs() < 1e-9);
    }

    fn schedule() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.0f64..2.0, 0..12).prop_map(|gaps| {
            let mut t = 0.0;
            gaps.into_iter()
                .map(|g| {
                    t += g;
                    t
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_one_line_per_impact(times in schedule(), fr in 1.0f64..120.0) {
            let traj = simulate_ball_motion(&ball(), &times, fr, bounds()).unwrap();
            prop_assert_eq!(traj.lines.len(), times.len());
            prop_assert_eq!(traj.impact_points.len(), times.len());
        }

        #[test]
        fn prop_surfaces_horizontal(times in schedule(), r in 0.0f64..20.0) {
            let start = Ball::new(DVec2::ZERO, DVec2::new(3.0, -2.0), r);
            let traj = simulate_ball_motion(&start, &times, 30.0, bounds()).unwrap();
            for line in &traj.lines {
                prop_assert_eq!(line.start.y, line.end.y);
                prop_assert!((line.length() - DEFAULT_SURFACE_LENGTH).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_deterministic(times in schedule()) {
            let a = simulate_ball_motion(&ball(), &times, 24.0, bounds()).unwrap();
            let b = simulate_ball_motion(&ball(), &times, 24.0, bounds()).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_start_frames_non_decreasing(times in schedule()) {
            let traj = simulate_ball_motion(&ball(), &times, 15.0, bounds()).unwrap();
            for pair in traj.lines.windows(2) {
                prop_assert!(pair[0].start_frame <= pair[1].start_frame);
            }
        }
    }
}
