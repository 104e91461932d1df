//! Tetrahedral mesh topology.
//!
//! Topology is accumulated with `add_point` / `add_face` /
//! `add_tetrahedron` and then frozen by [`TetrahedralMesh::setup`], which
//! validates every index and derives:
//! - the deduplicated undirected edge set,
//! - the sorted list of points referenced by tetrahedra,
//! - the average rest-pose edge length.

use std::collections::{BTreeSet, HashSet};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_math::geometry::tetrahedron_volume;
use partix_math::Aabb;
use partix_types::{FaceId, PartixError, PartixResult, PointId, TetrahedronId};

use crate::cloud::Cloud;
use crate::point::Point;

/// Boundary triangle. Used for picking and rendering export only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: [u32; 3],
}

/// Four point indices forming one volume element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tetrahedron {
    pub indices: [u32; 4],
}

impl Tetrahedron {
    /// The six vertex pairs of the tetrahedron.
    pub fn edge_pairs(&self) -> [(u32, u32); 6] {
        let [i0, i1, i2, i3] = self.indices;
        [(i0, i1), (i0, i2), (i0, i3), (i1, i2), (i1, i3), (i2, i3)]
    }
}

/// Undirected edge derived by `setup()`.
///
/// `t`, `u`, `v`, `w` and `collision_normal` are scratch space for a
/// single collision pass and carry no meaning between steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// `[low, high]` point indices.
    pub indices: [u32; 2],
    /// Never set: boundary edges are not distinguished from interior ones.
    pub border: bool,
    pub t: f32,
    pub u: f32,
    pub v: f32,
    pub w: f32,
    pub collision_normal: Vec3,
}

impl Edge {
    fn new(i0: u32, i1: u32) -> Self {
        Self {
            indices: [i0, i1],
            border: false,
            t: 0.0,
            u: 0.0,
            v: 0.0,
            w: 0.0,
            collision_normal: Vec3::ZERO,
        }
    }

    /// Clears the per-pass collision scratch values.
    pub fn reset_scratch(&mut self) {
        self.t = 0.0;
        self.u = 0.0;
        self.v = 0.0;
        self.w = 0.0;
        self.collision_normal = Vec3::ZERO;
    }
}

/// Points, boundary faces and tetrahedra of one deformable volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TetrahedralMesh {
    cloud: Cloud,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    tetrahedra: Vec<Tetrahedron>,
    indices: Vec<u32>,
    average_edge_length: Option<f32>,
}

impl TetrahedralMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point. `mass == 0.0` pins it.
    pub fn add_point(&mut self, position: Vec3, mass: f32) -> PointId {
        self.invalidate();
        self.cloud.add_point(position, mass)
    }

    /// Appends a boundary face. Indices are validated by `setup()`.
    pub fn add_face(&mut self, i0: u32, i1: u32, i2: u32) -> FaceId {
        self.invalidate();
        let id = FaceId(self.faces.len() as u32);
        self.faces.push(Face {
            indices: [i0, i1, i2],
        });
        id
    }

    /// Appends a tetrahedron. Indices are validated by `setup()`.
    pub fn add_tetrahedron(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) -> TetrahedronId {
        self.invalidate();
        let id = TetrahedronId(self.tetrahedra.len() as u32);
        self.tetrahedra.push(Tetrahedron {
            indices: [i0, i1, i2, i3],
        });
        id
    }

    /// Validates topology and derives edges, used indices and the average
    /// edge length.
    ///
    /// Fails on:
    /// - no tetrahedra (there would be no edges to average),
    /// - any face or tetrahedron index outside the cloud,
    /// - a tetrahedron that repeats a point (it would produce a self-loop),
    /// - a negative or non-finite point mass.
    ///
    /// On failure the mesh stays un-set-up.
    pub fn setup(&mut self) -> PartixResult<()> {
        self.invalidate();

        if self.tetrahedra.is_empty() {
            return Err(PartixError::EmptyMesh);
        }
        self.cloud.validate_masses()?;

        let len = self.cloud.len();
        for tet in &self.tetrahedra {
            for &i in &tet.indices {
                check_index("tetrahedron", i, len)?;
            }
        }
        for face in &self.faces {
            for &i in &face.indices {
                check_index("face", i, len)?;
            }
        }

        // Edges, in first-seen order.
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        let mut edges = Vec::new();
        for (t, tet) in self.tetrahedra.iter().enumerate() {
            for (a, b) in tet.edge_pairs() {
                if a == b {
                    return Err(PartixError::InvalidMesh(format!(
                        "tetrahedron {t} repeats point {a}"
                    )));
                }
                let key = if a < b { (a, b) } else { (b, a) };
                if seen.insert(key) {
                    edges.push(Edge::new(key.0, key.1));
                }
            }
        }

        // Points actually referenced by tetrahedra.
        let used: BTreeSet<u32> = self
            .tetrahedra
            .iter()
            .flat_map(|t| t.indices)
            .collect();

        // Average rest-pose edge length.
        let points = self.cloud.points();
        let mut total = 0.0f32;
        for e in &edges {
            let [i0, i1] = e.indices;
            let p0 = points
                .get(i0 as usize)
                .ok_or(PartixError::IndexOutOfRange { kind: "edge", index: i0, len })?;
            let p1 = points
                .get(i1 as usize)
                .ok_or(PartixError::IndexOutOfRange { kind: "edge", index: i1, len })?;
            total += p0.source_position.distance(p1.source_position);
        }
        let average = total / edges.len() as f32;

        tracing::debug!(
            points = len,
            used_points = used.len(),
            tetrahedra = self.tetrahedra.len(),
            faces = self.faces.len(),
            edges = edges.len(),
            average_edge_length = average,
            "tetrahedral mesh set up"
        );

        self.edges = edges;
        self.indices = used.into_iter().collect();
        self.average_edge_length = Some(average);
        Ok(())
    }

    /// Returns true once `setup()` has succeeded and topology has not
    /// changed since.
    #[inline]
    pub fn is_set_up(&self) -> bool {
        self.average_edge_length.is_some()
    }

    /// Mean rest-pose edge length, defined only after `setup()`.
    #[inline]
    pub fn average_edge_length(&self) -> Option<f32> {
        self.average_edge_length
    }

    #[inline]
    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        self.cloud.points()
    }

    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point] {
        self.cloud.points_mut()
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    /// Sorted indices of the points referenced by tetrahedra.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Current-position bounding box, `None` for an empty cloud.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.points().iter().map(|p| p.position))
    }

    /// Rest-pose signed volume of tetrahedron `t`.
    pub fn rest_volume(&self, t: TetrahedronId) -> Option<f32> {
        let tet = self.tetrahedra.get(t.index())?;
        let p = self.points();
        let [a, b, c, d] = tet.indices.map(|i| p.get(i as usize).map(|pt| pt.source_position));
        Some(tetrahedron_volume(a?, b?, c?, d?))
    }

    fn invalidate(&mut self) {
        self.average_edge_length = None;
    }
}

fn check_index(kind: &'static str, index: u32, len: usize) -> PartixResult<()> {
    if (index as usize) < len {
        Ok(())
    } else {
        Err(PartixError::IndexOutOfRange { kind, index, len })
    }
}
