// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Global shift for large coordinate handling
//!
//! SinusX files commonly carry projected coordinates (UTM, Lambert...) whose
//! magnitude eats most of the available precision. The first vertex of a
//! load decides whether the whole load is recentered; the chosen offset is
//! then subtracted from every vertex read afterwards.

use nalgebra::{Point3, Vector3};

/// Default magnitude above which coordinates are recentered (10km)
pub const DEFAULT_SHIFT_THRESHOLD: f64 = 10_000.0;

/// Offsets are rounded to this step so local coordinates stay readable
const SHIFT_ROUNDING: f64 = 100.0;

/// Offset subtracted from absolute coordinates to obtain local ones
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CoordinateShift {
    /// X offset (subtracted from all X coordinates)
    pub x: f64,
    /// Y offset (subtracted from all Y coordinates)
    pub y: f64,
    /// Z offset (subtracted from all Z coordinates)
    pub z: f64,
}

impl CoordinateShift {
    /// Create a new coordinate shift
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_vector(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    #[inline]
    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Check if shift is zero (no shifting needed)
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    #[inline]
    pub fn to_local(&self, global: &Point3<f64>) -> Point3<f64> {
        *global - self.as_vector()
    }

    #[inline]
    pub fn to_global(&self, local: &Point3<f64>) -> Point3<f64> {
        *local + self.as_vector()
    }
}

/// Recentering decision, consulted once per load with the first raw vertex
pub trait ShiftPolicy {
    fn maybe_compute_shift(&self, first: &Point3<f64>) -> Option<CoordinateShift>;
}

/// How a load handles large coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShiftMode {
    /// Recenter when any coordinate of the first vertex exceeds `threshold`
    Auto { threshold: f64 },
    /// Always apply the given shift
    Fixed(CoordinateShift),
    /// Keep raw coordinates
    Disabled,
}

impl Default for ShiftMode {
    fn default() -> Self {
        ShiftMode::Auto {
            threshold: DEFAULT_SHIFT_THRESHOLD,
        }
    }
}

impl ShiftPolicy for ShiftMode {
    fn maybe_compute_shift(&self, first: &Point3<f64>) -> Option<CoordinateShift> {
        match *self {
            ShiftMode::Auto { threshold } => {
                if !has_large_coordinates(first, threshold) {
                    return None;
                }
                Some(CoordinateShift::new(
                    round_offset(first.x),
                    round_offset(first.y),
                    round_offset(first.z),
                ))
            }
            ShiftMode::Fixed(shift) if !shift.is_zero() => Some(shift),
            ShiftMode::Fixed(_) | ShiftMode::Disabled => None,
        }
    }
}

/// Check if a point has any coordinate farther than `threshold` from the origin
#[inline]
pub fn has_large_coordinates(p: &Point3<f64>, threshold: f64) -> bool {
    p.x.abs() > threshold || p.y.abs() > threshold || p.z.abs() > threshold
}

#[inline]
fn round_offset(value: f64) -> f64 {
    (value / SHIFT_ROUNDING).round() * SHIFT_ROUNDING
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_small_coordinates_are_not_shifted() {
        let policy = ShiftMode::default();
        assert_eq!(policy.maybe_compute_shift(&Point3::new(125.0, -9_999.0, 3.0)), None);
    }

    #[test]
    fn test_large_coordinates_are_recentered() {
        // Swiss LV95 coordinates
        let first = Point3::new(2_679_012.123456, 1_247_892.654321, 432.111);
        let shift = ShiftMode::default()
            .maybe_compute_shift(&first)
            .expect("shift expected");

        assert_eq!(shift, CoordinateShift::new(2_679_000.0, 1_247_900.0, 400.0));

        let local = shift.to_local(&first);
        assert_relative_eq!(local.x, 12.123456, epsilon = 1e-6);
        assert_relative_eq!(local.y, -7.345679, epsilon = 1e-6);
        assert_relative_eq!(local.z, 32.111, epsilon = 1e-9);

        let back = shift.to_global(&local);
        assert_relative_eq!(back.x, first.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, first.y, epsilon = 1e-9);
    }

    #[test]
    fn test_fixed_and_disabled_modes() {
        let p = Point3::new(5_000_000.0, 0.0, 0.0);
        assert_eq!(ShiftMode::Disabled.maybe_compute_shift(&p), None);

        let fixed = CoordinateShift::new(1.0, 2.0, 3.0);
        assert_eq!(ShiftMode::Fixed(fixed).maybe_compute_shift(&p), Some(fixed));
        assert_eq!(
            ShiftMode::Fixed(CoordinateShift::default()).maybe_compute_shift(&p),
            None
        );
    }
}
