use super::*;

/// Number of images assumed for parallel mirrors, where there would be infinitely many.
pub const PARALLEL_IMAGE_COUNT: usize = 20;

/// Upper bound on the number of images (object included) ever returned.
pub const IMAGE_CAP: usize = 50;

/// How many images beyond the theoretical count may be searched for.
pub const IMAGE_SLACK: usize = 20;

/// Tolerance when checking whether `360 / theta` is a whole number.
const DIVISOR_EPS: Float = 1e-9;

/// The number of images predicted by the mirror formula `N = 360° / theta - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TheoreticalCount {
    /// Parallel mirrors (`theta == 0`).
    Infinite,
    /// `theta` divides 360°.
    Exact(usize),
    /// `theta` doesn't divide 360°, holds `floor(360° / theta)`.
    Approximate(usize),
}

impl TheoreticalCount {
    #[must_use]
    pub fn new(theta_deg: Float) -> Self {
        if theta_deg == 0.0 {
            return Self::Infinite;
        }

        let q = 360.0 / theta_deg;

        // float -> int `as` casts saturate, negative, NaN or huge quotients can't panic here
        if (q - q.round()).abs() <= DIVISOR_EPS {
            Self::Exact((q.round() as usize).saturating_sub(1))
        } else {
            Self::Approximate(q.floor() as usize)
        }
    }

    /// The count used to size the search, [`PARALLEL_IMAGE_COUNT`] if infinite.
    #[inline]
    #[must_use]
    pub const fn n(&self) -> usize {
        match *self {
            Self::Infinite => PARALLEL_IMAGE_COUNT,
            Self::Exact(n) | Self::Approximate(n) => n,
        }
    }

    /// The maximum number of images (object included) the search may produce.
    #[inline]
    #[must_use]
    pub const fn max_images(&self) -> usize {
        let n = self.n().saturating_add(IMAGE_SLACK);
        if n < IMAGE_CAP {
            n
        } else {
            IMAGE_CAP
        }
    }

    /// A human-readable version of the formula, for mirrors meeting at `theta_deg` degrees.
    #[must_use]
    pub fn formula(&self, theta_deg: Float) -> String {
        match *self {
            Self::Infinite => "parallel mirrors: infinite images".into(),
            Self::Exact(n) => format!("N = 360°/{theta_deg}° - 1 = {n}"),
            Self::Approximate(n) => format!("N ≈ 360°/{theta_deg}° ≈ {n}"),
        }
    }
}
