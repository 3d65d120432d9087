use super::*;

use arrayvec::ArrayVec;
use core::fmt;
use nalgebra::SVector;

/// The maximum number of successive reflections explored for one image.
pub const MAX_DEPTH: usize = 6;

/// One of the two mirrors of a [`MirrorPair`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mirror {
    /// The mirror lying on the x axis.
    A,
    /// The mirror at the dihedral angle.
    B,
}

impl fmt::Display for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mirror::A => "A",
            Mirror::B => "B",
        })
    }
}

/// Two mirrors meeting at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MirrorPair {
    a: LineMirror,
    b: LineMirror,
}

impl MirrorPair {
    /// Mirror `A` sits on the x axis, mirror `B` makes an angle of `theta_deg` degrees with it.
    #[inline]
    #[must_use]
    pub fn new(theta_deg: Float) -> Self {
        Self {
            a: LineMirror::new(0.0),
            b: LineMirror::new(theta_deg.to_radians()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn mirror(&self, mirror: Mirror) -> &LineMirror {
        match mirror {
            Mirror::A => &self.a,
            Mirror::B => &self.b,
        }
    }

    /// The segments to draw for mirrors `A` and `B`, in that order.
    #[inline]
    #[must_use]
    pub fn segments(&self, length: Float) -> [[SVector<Float, 2>; 2]; 2] {
        [self.a.segment(length), self.b.segment(length)]
    }
}

/// An ordered list of mirrors, the path taken by light between the object and an image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReflectionSequence {
    mirrors: ArrayVec<Mirror, MAX_DEPTH>,
}

impl ReflectionSequence {
    /// The `index`-th sequence of length `len`, where the `k`-th mirror
    /// is [`Mirror::B`] iff the `k`-th (least significant first) bit of `index` is set.
    ///
    /// Returns `None` if `len > MAX_DEPTH`.
    #[must_use]
    pub fn from_index(len: usize, index: usize) -> Option<Self> {
        (len <= MAX_DEPTH).then(|| Self {
            mirrors: (0..len)
                .map(|k| if index >> k & 1 == 0 { Mirror::A } else { Mirror::B })
                .collect(),
        })
    }

    /// Every sequence of length `1..=max_len`, shortest first, and
    /// in increasing index order (see [`Self::from_index`]) for a given length.
    ///
    /// `max_len` is capped at [`MAX_DEPTH`].
    pub fn all_up_to(max_len: usize) -> impl Iterator<Item = Self> {
        (1..=max_len.min(MAX_DEPTH))
            .flat_map(|len| (0..1usize << len).filter_map(move |i| Self::from_index(len, i)))
    }

    #[inline]
    #[must_use]
    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Reflect `point` off each mirror of `pair` in turn, first to last.
    #[must_use]
    pub fn apply(&self, pair: &MirrorPair, mut point: PolarPoint) -> PolarPoint {
        for &m in &self.mirrors {
            pair.mirror(m).reflect(&mut point);
        }
        point
    }
}

impl fmt::Display for ReflectionSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.mirrors.iter().try_for_each(|m| fmt::Display::fmt(m, f))
    }
}
