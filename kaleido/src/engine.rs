use super::*;

use nalgebra::SVector;
use std::collections::HashSet;

/// What a point of a [`Kaleidoscope`] stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageKind {
    /// The real object placed between the mirrors.
    Object,
    /// A virtual image.
    Virtual {
        /// Discovery order, the first virtual image has ordinal `1`.
        ordinal: usize,
        /// The first sequence of reflections found to produce this image.
        sequence: ReflectionSequence,
    },
}

impl ImageKind {
    /// The tag identifying this kind of point in serialized output.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Object => "objeto",
            Self::Virtual { .. } => "imagem",
        }
    }

    #[inline]
    #[must_use]
    pub const fn ordinal(&self) -> Option<usize> {
        match self {
            Self::Object => None,
            Self::Virtual { ordinal, .. } => Some(*ordinal),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub position: SVector<Float, 2>,
    pub kind: ImageKind,
}

impl Image {
    #[inline]
    #[must_use]
    pub fn x(&self) -> Float {
        self.position.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> Float {
        self.position.y
    }
}

/// Everything seen when looking into a pair of mirrors.
#[derive(Clone, Debug, PartialEq)]
pub struct Kaleidoscope {
    /// The object first, then every distinct virtual image in discovery order.
    pub images: Vec<Image>,
    pub formula: String,
    pub theory: TheoreticalCount,
}

impl Kaleidoscope {
    /// The number of virtual images found (the object is not counted).
    #[inline]
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len().saturating_sub(1)
    }

    #[inline]
    #[must_use]
    pub fn object(&self) -> Option<&Image> {
        self.images.first()
    }

    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Vec<Image>, String, usize) {
        let count = self.image_count();
        (self.images, self.formula, count)
    }
}

/// Finds the images formed by two mirrors meeting at a given angle.
#[derive(Clone, Debug, PartialEq)]
pub struct ReflectionEngine {
    theta_deg: Float,
    mirrors: MirrorPair,
    theory: TheoreticalCount,
}

impl ReflectionEngine {
    #[must_use]
    pub fn new(theta_deg: Float) -> Self {
        Self {
            theta_deg,
            mirrors: MirrorPair::new(theta_deg),
            theory: TheoreticalCount::new(theta_deg),
        }
    }

    #[inline]
    #[must_use]
    pub const fn mirrors(&self) -> &MirrorPair {
        &self.mirrors
    }

    #[inline]
    #[must_use]
    pub const fn theory(&self) -> TheoreticalCount {
        self.theory
    }

    /// Enumerates the images of an object at `obj_radius` from the vertex,
    /// making an angle of `obj_angle_deg` degrees with mirror `A`.
    ///
    /// Every [`ReflectionSequence`] of up to [`MAX_DEPTH`] reflections is tried,
    /// in canonical order. Images whose positions agree to 3 decimal places
    /// are merged, keeping the first one found, and the search stops once
    /// [`TheoreticalCount::max_images`] points have been collected.
    #[must_use]
    pub fn images_of(&self, obj_radius: Float, obj_angle_deg: Float) -> Kaleidoscope {
        let object = PolarPoint::from_degrees(obj_radius, obj_angle_deg);
        let max_images = self.theory.max_images();

        log::debug!(
            "theta = {}°, object at ({obj_radius}, {obj_angle_deg}°), theory: {:?}, max images: {max_images}",
            self.theta_deg,
            self.theory,
        );

        let object_pos = object.to_cartesian();
        let mut seen = HashSet::from([position_key(&object_pos)]);
        let mut images = vec![Image {
            position: object_pos,
            kind: ImageKind::Object,
        }];

        for sequence in ReflectionSequence::all_up_to(MAX_DEPTH) {
            if images.len() >= max_images {
                break;
            }

            let position = sequence
                .apply(&self.mirrors, object)
                .normalized()
                .to_cartesian();

            if seen.insert(position_key(&position)) {
                log::trace!("image {} at {position:?} via {sequence}", images.len());

                images.push(Image {
                    position,
                    kind: ImageKind::Virtual {
                        ordinal: images.len(),
                        sequence,
                    },
                });
            }
        }

        log::debug!("found {} images", images.len() - 1);

        Kaleidoscope {
            images,
            formula: self.theory.formula(self.theta_deg),
            theory: self.theory,
        }
    }
}

/// Shorthand for [`ReflectionEngine::new`] followed by [`ReflectionEngine::images_of`].
#[inline]
#[must_use]
pub fn generate(theta_deg: Float, obj_radius: Float, obj_angle_deg: Float) -> Kaleidoscope {
    ReflectionEngine::new(theta_deg).images_of(obj_radius, obj_angle_deg)
}
