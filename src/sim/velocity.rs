//! Ball velocity
//!
//! Angles are in degrees, 0 pointing up and increasing clockwise
//! (screen y grows downward).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Point;
use crate::approx_eq;

/// Axis selector for [`Velocity::invert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Per-tick displacement
///
/// A plain value: every operation returns a new velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }

    /// Build a velocity from a heading and a speed
    pub fn from_angle_and_speed(angle: f64, speed: f64) -> Self {
        let radians = (angle % 360.0).to_radians();
        Self::new(radians.sin() * speed, -radians.cos() * speed)
    }

    /// Heading in degrees, in [0, 360)
    pub fn angle(self) -> f64 {
        let degrees = self.dx.atan2(-self.dy).to_degrees();
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }

    /// Magnitude of the velocity
    #[inline]
    pub fn angled_speed(self) -> f64 {
        self.as_dvec2().length()
    }

    /// Same heading, different speed (zero stays zero)
    pub fn with_speed(self, speed: f64) -> Self {
        Self::from(self.as_dvec2().normalize_or_zero() * speed)
    }

    /// Negate one component
    #[must_use]
    pub fn invert(self, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::new(-self.dx, self.dy),
            Axis::Vertical => Self::new(self.dx, -self.dy),
        }
    }

    /// Negate both components
    #[must_use]
    pub fn reversed(self) -> Self {
        self.invert(Axis::Horizontal).invert(Axis::Vertical)
    }

    /// Move a point by one tick of this velocity
    pub fn apply_to_point(self, point: Point) -> Point {
        Point::from(point.as_dvec2() + self.as_dvec2())
    }

    /// Both components equal within tolerance
    pub fn approx_eq(self, other: Velocity) -> bool {
        approx_eq(self.dx, other.dx) && approx_eq(self.dy, other.dy)
    }
}

impl From<DVec2> for Velocity {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}
