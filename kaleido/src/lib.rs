use core::f64::consts::{PI, TAU};

mod engine;
mod formula;
mod nalg;
mod sequence;

pub use engine::*;
pub use formula::*;
pub use nalg::*;
pub use sequence::*;

pub use nalgebra;

pub type Float = f64;

/// The length of the segments used to draw both mirrors, starting from the vertex.
pub const MIRROR_LENGTH: Float = 5.0;

/// Something a [`Hyperplane`] can reflect.
pub trait Vector {}

pub trait Hyperplane {
    type Vector: Vector;

    fn reflect(&self, v: &mut Self::Vector);
}

/// A point in the plane, in polar coordinates around the mirrors' common vertex.
///
/// `angle` is in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarPoint {
    pub radius: Float,
    pub angle: Float,
}

impl Vector for PolarPoint {}

impl PolarPoint {
    #[inline]
    #[must_use]
    pub const fn new(radius: Float, angle: Float) -> Self {
        Self { radius, angle }
    }

    #[inline]
    #[must_use]
    pub fn from_degrees(radius: Float, angle_deg: Float) -> Self {
        Self::new(radius, angle_deg.to_radians())
    }

    /// Returns the same point, with it's angle brought into `(-pi, pi]`.
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut angle = self.angle.rem_euclid(TAU);
        if angle > PI {
            angle -= TAU;
        }
        Self { angle, ..self }
    }
}

/// An infinite reflective line passing through the origin.
///
/// `orientation` is the angle (in radians) it makes with the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMirror {
    pub orientation: Float,
}

impl LineMirror {
    #[inline]
    #[must_use]
    pub const fn new(orientation: Float) -> Self {
        Self { orientation }
    }
}

impl Hyperplane for LineMirror {
    type Vector = PolarPoint;

    /// The radius is left untouched, only the angle is mirrored w.r.t. `self.orientation`
    #[inline]
    fn reflect(&self, v: &mut PolarPoint) {
        v.angle = 2.0 * self.orientation - v.angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflection_is_an_involution() {
        let mirror = LineMirror::new(1.1);
        let original = PolarPoint::new(2.0, 0.3);

        let mut p = original;
        mirror.reflect(&mut p);
        assert!((p.angle - 1.9).abs() < 1e-12);
        assert_eq!(p.radius, 2.0);

        mirror.reflect(&mut p);
        assert!((p.angle - original.angle).abs() < 1e-12);
    }

    #[test]
    fn normalized_angles_land_in_half_open_range() {
        for angle in [-7.0, -PI, -0.5, 0.0, PI, 3.5, 10.0, 4.0 * TAU + 0.25] {
            let p = PolarPoint::new(1.0, angle).normalized();
            assert!(p.angle > -PI && p.angle <= PI, "{angle} -> {}", p.angle);
            assert!((p.angle.cos() - angle.cos()).abs() < 1e-9);
            assert!((p.angle.sin() - angle.sin()).abs() < 1e-9);
        }

        // -pi maps to pi, not the other way around
        assert_eq!(PolarPoint::new(1.0, -PI).normalized().angle, PI);
    }
}
