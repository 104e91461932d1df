//! Geometric predicates on points, segments, triangles, planes and boxes.
//!
//! Triangle-based queries return barycentric weights as a `Vec3`
//! `(u, v, w)` for the vertices `(a, b, c)`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_types::constants::EPSILON;

/// Denominator below which barycentric coordinates are undefined.
const BARYCENTRIC_DENOM_EPSILON: f32 = 1.0e-7;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any `grow` call will replace.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    #[inline]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self::new(first, first);
        for p in iter {
            bb.grow(p);
        }
        Some(bb)
    }

    /// Extends the box to contain `p`.
    #[inline]
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Smallest box containing both boxes.
    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.max - self.center()
    }

    /// Returns true if the boxes overlap (touching counts).
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Returns true if `q` lies inside or on the box.
    #[inline]
    pub fn contains(&self, q: Vec3) -> bool {
        self.min.cmple(q).all() && q.cmple(self.max).all()
    }
}

/// Clamps `x` to `[0, 1]`.
#[inline]
pub fn clip01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Barycentric coordinates of `p` with respect to triangle `(a, b, c)`.
///
/// `p` is assumed to lie in the triangle's plane. Returns `None` for a
/// degenerate (zero-area) triangle.
pub fn barycentric(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Option<Vec3> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    if denom < BARYCENTRIC_DENOM_EPSILON {
        return None;
    }
    let inv = 1.0 / denom;
    let v = (d11 * d20 - d01 * d21) * inv;
    let w = (d00 * d21 - d01 * d20) * inv;
    Some(Vec3::new(1.0 - v - w, v, w))
}

/// Closest point on triangle `(a, b, c)` to `p`.
///
/// Returns the point and its barycentric weights. Classifies `p` into the
/// seven Voronoi regions of the triangle (three vertices, three edges,
/// interior).
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (Vec3, Vec3) {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    // Vertex region A
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, Vec3::X);
    }

    // Vertex region B
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (b, Vec3::Y);
    }

    // Edge region AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab * v, Vec3::new(1.0 - v, v, 0.0));
    }

    // Vertex region C
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (c, Vec3::Z);
    }

    // Edge region AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac * w, Vec3::new(1.0 - w, 0.0, w));
    }

    // Edge region BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b) * w, Vec3::new(0.0, 1.0 - w, w));
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (a + ab * v + ac * w, Vec3::new(1.0 - v - w, v, w))
}

/// Intersects segment `s0 → s1` with a plane.
///
/// Returns the segment parameter `t ∈ [0, 1]` of the crossing, or `None`
/// if the segment is parallel to the plane or does not reach it.
pub fn test_plane_segment(
    plane_position: Vec3,
    plane_normal: Vec3,
    s0: Vec3,
    s1: Vec3,
) -> Option<f32> {
    let denom = plane_normal.dot(s1 - s0);
    if denom == 0.0 {
        return None;
    }
    let t = (plane_position.dot(plane_normal) - plane_normal.dot(s0)) / denom;
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Separating-axis test between a box and a segment.
pub fn test_aabb_segment(bb: &Aabb, s0: Vec3, s1: Vec3) -> bool {
    let c = bb.center();
    let e = bb.max - c;

    let mid = (s0 + s1) * 0.5;
    let d = s1 - mid;
    let m = mid - c;

    let mut adx = d.x.abs();
    if m.x.abs() > e.x + adx {
        return false;
    }
    let mut ady = d.y.abs();
    if m.y.abs() > e.y + ady {
        return false;
    }
    let mut adz = d.z.abs();
    if m.z.abs() > e.z + adz {
        return false;
    }

    // Guard the cross-product axes against a near-parallel segment.
    adx += EPSILON;
    ady += EPSILON;
    adz += EPSILON;

    if (m.y * d.z - m.z * d.y).abs() > e.y * adz + e.z * ady {
        return false;
    }
    if (m.z * d.x - m.x * d.z).abs() > e.x * adz + e.z * adx {
        return false;
    }
    if (m.x * d.y - m.y * d.x).abs() > e.x * ady + e.y * adx {
        return false;
    }
    true
}

/// Returns true if the plane passes through the box.
pub fn test_aabb_plane(bb: &Aabb, plane_position: Vec3, plane_normal: Vec3) -> bool {
    let c = bb.center();
    let e = bb.max - c;
    let r = e.dot(plane_normal.abs());
    let s = plane_normal.dot(c) - plane_normal.dot(plane_position);
    s.abs() <= r
}

#[inline]
pub fn test_aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

#[inline]
pub fn test_aabb_point(bb: &Aabb, q: Vec3) -> bool {
    bb.contains(q)
}

/// Shared Möller–Trumbore core. Returns `(u, v, t)` unscaled plus `det`.
fn moller_trumbore(r0: Vec3, r1: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32, f32)> {
    let dir = r1 - r0;
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let pvec = dir.cross(e2);
    let det = e1.dot(pvec);

    // Back faces and rays parallel to the triangle are rejected.
    if det < EPSILON {
        return None;
    }

    let tvec = r0 - v0;
    let u = tvec.dot(pvec);
    if u < 0.0 || u > det {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = dir.dot(qvec);
    if v < 0.0 || u + v > det {
        return None;
    }

    let t = e2.dot(qvec);
    Some((u, v, t, det))
}

/// Segment `r0 → r1` against the front side of triangle `(v0, v1, v2)`.
///
/// Returns `(u, v, t)`: barycentric weights of `v1`, `v2` and the
/// segment parameter `t ∈ [0, 1]`.
pub fn test_segment_triangle(r0: Vec3, r1: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Vec3> {
    let (u, v, t, det) = moller_trumbore(r0, r1, v0, v1, v2)?;
    if t < 0.0 || det < t {
        return None;
    }
    Some(Vec3::new(u, v, t) / det)
}

/// Half-line from `r0` through `r1` against the front side of a triangle.
///
/// Same as [`test_segment_triangle`] but `t` is unbounded above.
pub fn test_ray_triangle(r0: Vec3, r1: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Vec3> {
    let (u, v, t, det) = moller_trumbore(r0, r1, v0, v1, v2)?;
    if t < 0.0 {
        return None;
    }
    Some(Vec3::new(u, v, t) / det)
}

/// Sphere against triangle. Returns the barycentric weights of the
/// closest point when they touch.
pub fn test_sphere_triangle(center: Vec3, radius: f32, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Vec3> {
    let (q, uvw) = closest_point_on_triangle(center, v0, v1, v2);
    (q.distance_squared(center) <= radius * radius).then_some(uvw)
}

/// Signed volume of tetrahedron `(a, b, c, d)`.
#[inline]
pub fn tetrahedron_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> f32 {
    (b - a).dot((c - a).cross(d - a)) / 6.0
}
