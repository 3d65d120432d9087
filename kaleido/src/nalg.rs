use super::*;

use nalgebra::SVector;

impl PolarPoint {
    /// The cartesian coordinates of this point.
    #[inline]
    #[must_use]
    pub fn to_cartesian(&self) -> SVector<Float, 2> {
        let (sin, cos) = self.angle.sin_cos();
        SVector::<Float, 2>::new(self.radius * cos, self.radius * sin)
    }
}

impl LineMirror {
    /// The far end of the segment of length `length` drawn from the vertex along this mirror.
    #[inline]
    #[must_use]
    pub fn endpoint(&self, length: Float) -> SVector<Float, 2> {
        PolarPoint::new(length, self.orientation).to_cartesian()
    }

    /// `[vertex, endpoint]`
    #[inline]
    #[must_use]
    pub fn segment(&self, length: Float) -> [SVector<Float, 2>; 2] {
        [SVector::zeros(), self.endpoint(length)]
    }
}

/// Two positions are considered identical if this key is equal for both of them.
///
/// Each coordinate is rounded to 3 decimal places.
#[inline]
#[must_use]
pub fn position_key(p: &SVector<Float, 2>) -> (i64, i64) {
    // `as` saturates, and maps NaN to 0, so this never panics
    let round = |c: Float| (c * 1000.0).round() as i64;
    (round(p.x), round(p.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartesian_coordinates() {
        let p = PolarPoint::from_degrees(3.0, 30.0).to_cartesian();
        assert_eq!(position_key(&p), (2598, 1500));

        let p = PolarPoint::from_degrees(2.0, 90.0).to_cartesian();
        assert_eq!(position_key(&p), (0, 2000));
    }

    #[test]
    fn signed_zero_shares_a_key() {
        let a = SVector::<Float, 2>::new(-0.0001, 1.0);
        let b = SVector::<Float, 2>::new(0.0002, 1.0);
        assert_eq!(position_key(&a), position_key(&b));
    }

    #[test]
    fn mirror_segments_start_at_the_vertex() {
        let [start, end] = LineMirror::new(0.0).segment(MIRROR_LENGTH);
        assert_eq!(start, SVector::<Float, 2>::zeros());
        assert_eq!(end, SVector::<Float, 2>::new(5.0, 0.0));

        let end = LineMirror::new(90f64.to_radians()).endpoint(MIRROR_LENGTH);
        assert!(end.x.abs() < 1e-12);
        assert!((end.y - 5.0).abs() < 1e-12);
    }
}
