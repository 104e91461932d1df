//! Per-tetrahedron rest-state data for shape matching.
//!
//! Each tetrahedron caches its rest offsets `qᵢ = x⁰ᵢ − c⁰` from the
//! weighted rest centroid and the inverse of `Aqq = Σ wᵢ qᵢ qᵢᵀ`, so the
//! per-step work is one covariance accumulation and one polar
//! decomposition.
//!
//! ## Weights
//!
//! Free points weigh their mass. A pinned point has no usable mass, so it
//! takes the mean mass of the free points of its tetrahedron (or 1.0 when
//! the whole tetrahedron is pinned).

use glam::{Mat3, Vec3};

use partix_math::decomposition::{inverse_or_unit_det, outer};
use partix_math::geometry::tetrahedron_volume;
use partix_mesh::{Point, TetrahedralMesh};
use partix_types::constants::DEGENERATE_VOLUME_THRESHOLD;

/// Precomputed rest-state data for a single tetrahedron.
#[derive(Debug, Clone, Copy)]
pub struct RestTetrahedron {
    /// Point indices into the owning cloud.
    pub indices: [usize; 4],
    /// Shape-matching weights, normalised to sum to 1.
    pub weights: [f32; 4],
    /// Rest offsets from the weighted rest centroid.
    pub offsets: [Vec3; 4],
    /// `(Σ wᵢ qᵢ qᵢᵀ)⁻¹`.
    pub aqq_inv: Mat3,
    /// Signed rest volume.
    pub rest_volume: f32,
}

impl RestTetrahedron {
    /// Weighted centroid of the current positions.
    #[inline]
    pub fn current_centroid(&self, points: &[Point]) -> Vec3 {
        let mut c = Vec3::ZERO;
        for (&i, &w) in self.indices.iter().zip(&self.weights) {
            c += points[i].position * w;
        }
        c
    }

    /// `Apq = Σ wᵢ (pᵢ − c) qᵢᵀ` for the current positions.
    pub fn covariance(&self, points: &[Point], centroid: Vec3) -> Mat3 {
        let mut apq = Mat3::ZERO;
        for k in 0..4 {
            let p = points[self.indices[k]].position - centroid;
            apq += outer(p * self.weights[k], self.offsets[k]);
        }
        apq
    }
}

/// All tetrahedra of one volume plus per-point incidence counts.
#[derive(Debug, Clone, Default)]
pub struct RestShape {
    pub elements: Vec<RestTetrahedron>,
    /// Number of tetrahedra sharing each point.
    pub incidence: Vec<u32>,
}

impl RestShape {
    /// Computes rest-state data from the mesh's rest positions.
    ///
    /// Degenerate tetrahedra are kept; their singular `Aqq` falls back
    /// through [`inverse_or_unit_det`].
    pub fn from_mesh(mesh: &TetrahedralMesh) -> Self {
        let points = mesh.points();
        let mut incidence = vec![0u32; points.len()];
        let mut elements = Vec::with_capacity(mesh.tetrahedra().len());
        let mut degenerate = 0usize;

        for tet in mesh.tetrahedra() {
            let indices = tet.indices.map(|i| i as usize);
            let rest = indices.map(|i| points[i].source_position);
            let weights = tetrahedron_weights(indices.map(|i| &points[i]));

            let c0 = rest
                .iter()
                .zip(&weights)
                .fold(Vec3::ZERO, |acc, (&q, &w)| acc + q * w);
            let offsets = rest.map(|q| q - c0);

            let mut aqq = Mat3::ZERO;
            for k in 0..4 {
                aqq += outer(offsets[k] * weights[k], offsets[k]);
            }

            let rest_volume = tetrahedron_volume(rest[0], rest[1], rest[2], rest[3]);
            if rest_volume.abs() < DEGENERATE_VOLUME_THRESHOLD {
                degenerate += 1;
            }

            for &i in &indices {
                incidence[i] += 1;
            }

            elements.push(RestTetrahedron {
                indices,
                weights,
                offsets,
                aqq_inv: inverse_or_unit_det(aqq),
                rest_volume,
            });
        }

        if degenerate > 0 {
            tracing::warn!(
                degenerate,
                tetrahedra = elements.len(),
                "degenerate tetrahedra in rest pose"
            );
        }

        Self {
            elements,
            incidence,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Sum of the absolute rest volumes.
    pub fn total_rest_volume(&self) -> f32 {
        self.elements.iter().map(|e| e.rest_volume.abs()).sum()
    }
}

fn tetrahedron_weights(points: [&Point; 4]) -> [f32; 4] {
    let (free_mass, free_count) = points
        .iter()
        .filter(|p| !p.is_pinned())
        .fold((0.0f32, 0u32), |(m, n), p| (m + p.mass, n + 1));
    let pinned_weight = if free_count > 0 {
        free_mass / free_count as f32
    } else {
        1.0
    };

    let raw = points.map(|p| if p.is_pinned() { pinned_weight } else { p.mass });
    let total: f32 = raw.iter().sum();
    if total > 0.0 {
        raw.map(|w| w / total)
    } else {
        [0.25; 4]
    }
}
