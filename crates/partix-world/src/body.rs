//! Body taxonomy.

use partix_contact::BoundingPlane;
use partix_solver::SoftVolume;

/// A simulated body.
///
/// Planes are immovable colliders; volumes are integrated, shape-matched
/// and collided against every plane.
#[derive(Debug, Clone)]
pub enum Body {
    Plane(BoundingPlane),
    Volume(SoftVolume),
}

impl Body {
    #[inline]
    pub fn is_plane(&self) -> bool {
        matches!(self, Body::Plane(_))
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        matches!(self, Body::Volume(_))
    }

    pub fn as_plane(&self) -> Option<&BoundingPlane> {
        match self {
            Body::Plane(p) => Some(p),
            Body::Volume(_) => None,
        }
    }

    pub fn as_volume(&self) -> Option<&SoftVolume> {
        match self {
            Body::Volume(v) => Some(v),
            Body::Plane(_) => None,
        }
    }

    pub fn as_volume_mut(&mut self) -> Option<&mut SoftVolume> {
        match self {
            Body::Volume(v) => Some(v),
            Body::Plane(_) => None,
        }
    }

    /// Short name of the variant, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Body::Plane(_) => "plane",
            Body::Volume(_) => "volume",
        }
    }
}

impl From<BoundingPlane> for Body {
    fn from(plane: BoundingPlane) -> Self {
        Body::Plane(plane)
    }
}

impl From<SoftVolume> for Body {
    fn from(volume: SoftVolume) -> Self {
        Body::Volume(volume)
    }
}
