use kaleido::*;
use kaleido_json::{KaleidoscopeRequest, MAX_RADIUS, MAX_THETA, MIN_RADIUS, MIN_THETA};

use core::iter;
pub use rand;

use rand::seq::SliceRandom;

/// Mirror angles, in `[MIN_THETA, MAX_THETA]`, that divide 360°.
pub const DIVISORS_OF_360: [Float; 23] = [
    1., 2., 3., 4., 5., 6., 8., 9., 10., 12., 15., 18., 20., 24., 30., 36., 40., 45., 60., 72., 90.,
    120., 180.,
];

pub trait Random: Sized {
    /// Generate a randomized value using the provided `rng`
    ///
    /// This method must not fail.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for PolarPoint {
    /// A point at a distance in `[MIN_RADIUS, MAX_RADIUS]` from the origin, at any angle.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::from_degrees(
            rng.gen_range(MIN_RADIUS..=MAX_RADIUS),
            rng.gen_range(0.0..360.0),
        )
    }
}

impl Random for KaleidoscopeRequest {
    /// One time out of four, the mirror angle divides 360°,
    /// otherwise, it's anywhere in `[MIN_THETA, MAX_THETA]`.
    ///
    /// The returned request doesn't need clamping.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let theta = if rng.gen_ratio(1, 4) {
            *DIVISORS_OF_360.choose(rng).unwrap_or(&MIN_THETA)
        } else {
            rng.gen_range(MIN_THETA..=MAX_THETA)
        };

        Self {
            theta,
            radius: rng.gen_range(MIN_RADIUS..=MAX_RADIUS),
            angle: rng.gen_range(0.0..360.0),
        }
    }
}

pub fn random_requests(
    n: usize,
    rng: &mut (impl rand::Rng + ?Sized),
) -> Vec<KaleidoscopeRequest> {
    iter::repeat_with(|| KaleidoscopeRequest::random(rng))
        .take(n)
        .collect()
}
