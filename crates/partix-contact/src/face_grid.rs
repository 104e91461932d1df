//! Uniform grid over boundary faces for segment queries.
//!
//! Each face is binned into every cell its bounding box overlaps. A
//! segment query walks the cells along the segment in order with
//! [`VoxelTraverser`] and tests only the faces binned there, stopping as
//! soon as the nearest hit found lies in an already visited cell.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use partix_math::geometry::test_segment_triangle;
use partix_math::{Aabb, VoxelTraverser};
use partix_mesh::{Face, Point};
use partix_types::FaceId;

/// Nearest face hit by a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub face: FaceId,
    /// Segment parameter in `[0, 1]`.
    pub t: f32,
    /// Barycentric weights of the face's three points.
    pub barycentric: Vec3,
    /// World-space hit point.
    pub point: Vec3,
}

/// Face grid built from current point positions.
#[derive(Debug, Clone)]
pub struct FaceGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cells: HashMap<IVec3, Vec<u32>>,
    /// Union of the binned faces' boxes, padded by half a cell.
    bounds: Option<Aabb>,
    /// `None` for faces whose points are missing.
    triangles: Vec<Option<[Vec3; 3]>>,
}

impl FaceGrid {
    /// Bins `faces` by the current positions of `points`.
    ///
    /// Faces referencing missing points are skipped; meshes that passed
    /// `setup()` never have any.
    pub fn build(points: &[Point], faces: &[Face], cell_size: f32) -> Self {
        let cell_size = cell_size.max(1e-6);
        let inv_cell_size = 1.0 / cell_size;
        let mut cells: HashMap<IVec3, Vec<u32>> = HashMap::new();
        let mut triangles = Vec::with_capacity(faces.len());
        let mut bounds: Option<Aabb> = None;

        for face in faces {
            let corners = face.indices.map(|i| points.get(i as usize).map(|p| p.position));
            let id = triangles.len() as u32;
            let [Some(a), Some(b), Some(c)] = corners else {
                triangles.push(None);
                continue;
            };
            triangles.push(Some([a, b, c]));

            let Some(bb) = Aabb::from_points([a, b, c]) else {
                continue;
            };
            bounds = Some(bounds.map_or(bb, |b| b.union(&bb)));
            let lo = (bb.min * inv_cell_size).floor().as_ivec3();
            let hi = (bb.max * inv_cell_size).floor().as_ivec3();
            for z in lo.z..=hi.z {
                for y in lo.y..=hi.y {
                    for x in lo.x..=hi.x {
                        cells.entry(IVec3::new(x, y, z)).or_default().push(id);
                    }
                }
            }
        }

        Self {
            cell_size,
            inv_cell_size,
            cells,
            bounds: bounds.map(|b| {
                let pad = Vec3::splat(cell_size * 0.5);
                Aabb::new(b.min - pad, b.max + pad)
            }),
            triangles,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Nearest front-facing face crossed by segment `r0 → r1`.
    ///
    /// The walk covers only the part of the segment inside the grid's
    /// bounds, so far-away endpoints cost nothing extra.
    pub fn raycast(&self, r0: Vec3, r1: Vec3) -> Option<RayHit> {
        let (t0, t1) = clip_segment(&self.bounds?, r0, r1)?;
        let d = r1 - r0;
        let mut best: Option<RayHit> = None;

        for cell in VoxelTraverser::new(r0 + d * t0, r0 + d * t1, self.cell_size) {
            if let Some(ids) = self.cells.get(&cell) {
                for &id in ids {
                    let Some([v0, v1, v2]) = self.triangles[id as usize] else {
                        continue;
                    };
                    let Some(uvt) = test_segment_triangle(r0, r1, v0, v1, v2) else {
                        continue;
                    };
                    if best.map_or(true, |b| uvt.z < b.t) {
                        let barycentric = Vec3::new(1.0 - uvt.x - uvt.y, uvt.x, uvt.y);
                        best = Some(RayHit {
                            face: FaceId(id),
                            t: uvt.z,
                            barycentric,
                            point: r0 + (r1 - r0) * uvt.z,
                        });
                    }
                }
            }

            if let Some(hit) = best {
                if self.cell_of(hit.point) == cell {
                    break;
                }
            }
        }

        best
    }

    /// Same query without the grid, testing every face.
    pub fn raycast_brute_force(&self, r0: Vec3, r1: Vec3) -> Option<RayHit> {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(id, tri)| {
                let [v0, v1, v2] = (*tri)?;
                let uvt = test_segment_triangle(r0, r1, v0, v1, v2)?;
                Some(RayHit {
                    face: FaceId(id as u32),
                    t: uvt.z,
                    barycentric: Vec3::new(1.0 - uvt.x - uvt.y, uvt.x, uvt.y),
                    point: r0 + (r1 - r0) * uvt.z,
                })
            })
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    fn cell_of(&self, p: Vec3) -> IVec3 {
        (p * self.inv_cell_size).floor().as_ivec3()
    }
}

/// Parameter range of `r0 → r1` inside `bb` (slab method).
fn clip_segment(bb: &Aabb, r0: Vec3, r1: Vec3) -> Option<(f32, f32)> {
    let d = r1 - r0;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for axis in 0..3 {
        if d[axis] == 0.0 {
            if r0[axis] < bb.min[axis] || r0[axis] > bb.max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d[axis];
        let mut near = (bb.min[axis] - r0[axis]) * inv;
        let mut far = (bb.max[axis] - r0[axis]) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t0 = t0.max(near);
        t1 = t1.min(far);
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}
