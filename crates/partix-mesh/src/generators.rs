//! Procedural tetrahedral meshes for benchmarks and testing.
//!
//! Generated meshes carry outward-facing, counter-clockwise boundary
//! faces and positively oriented tetrahedra, and are already set up.

use std::collections::HashMap;

use glam::Vec3;

use partix_math::geometry::tetrahedron_volume;
use partix_types::PartixResult;

use crate::tetrahedral::TetrahedralMesh;

/// A regular tetrahedron with the given edge length, centred at the origin.
///
/// # Example
/// ```
/// use partix_mesh::generators::regular_tetrahedron;
/// let mesh = regular_tetrahedron(1.0, 0.5).unwrap();
/// assert_eq!(mesh.edges().len(), 6);
/// assert_eq!(mesh.faces().len(), 4);
/// ```
pub fn regular_tetrahedron(edge_length: f32, point_mass: f32) -> PartixResult<TetrahedralMesh> {
    // Alternate cube corners; their pairwise distance is 2√2.
    let scale = edge_length / (2.0 * std::f32::consts::SQRT_2);
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];

    let mut mesh = TetrahedralMesh::new();
    for c in corners {
        mesh.add_point(c * scale, point_mass);
    }
    mesh.add_tetrahedron(0, 1, 2, 3);
    for [a, b, c] in outward_faces([0, 1, 2, 3]) {
        mesh.add_face(a, b, c);
    }
    mesh.setup()?;
    Ok(mesh)
}

/// A box of `nx × ny × nz` cubes of edge `cell_size`, each split into five
/// tetrahedra, with its minimum corner at the origin.
///
/// Neighbouring cubes alternate between the two mirror-image
/// decompositions so that shared faces are split along the same diagonal.
pub fn box_block(
    nx: usize,
    ny: usize,
    nz: usize,
    cell_size: f32,
    point_mass: f32,
) -> PartixResult<TetrahedralMesh> {
    let (px, py) = (nx + 1, ny + 1);
    let index = |i: usize, j: usize, k: usize| (i + px * (j + py * k)) as u32;

    let mut mesh = TetrahedralMesh::new();
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                let p = Vec3::new(i as f32, j as f32, k as f32) * cell_size;
                mesh.add_point(p, point_mass);
            }
        }
    }

    // Corner c of a cube has offset (c & 1, (c >> 1) & 1, (c >> 2) & 1).
    const EVEN: [[usize; 4]; 5] = [[1, 2, 4, 7], [0, 1, 2, 4], [3, 1, 2, 7], [5, 1, 4, 7], [6, 2, 4, 7]];
    const ODD: [[usize; 4]; 5] = [[0, 3, 5, 6], [1, 0, 3, 5], [2, 0, 3, 6], [4, 0, 5, 6], [7, 3, 5, 6]];

    let mut tetrahedra = Vec::with_capacity(nx * ny * nz * 5);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let corner = |c: usize| index(i + (c & 1), j + ((c >> 1) & 1), k + ((c >> 2) & 1));
                let pattern = if (i + j + k) % 2 == 0 { &EVEN } else { &ODD };
                for tet in pattern {
                    tetrahedra.push(tet.map(corner));
                }
            }
        }
    }

    for tet in &mut tetrahedra {
        let p = tet.map(|i| mesh.points()[i as usize].position);
        if tetrahedron_volume(p[0], p[1], p[2], p[3]) < 0.0 {
            tet.swap(1, 2);
        }
    }

    for [a, b, c] in boundary_faces(&tetrahedra) {
        mesh.add_face(a, b, c);
    }
    for [a, b, c, d] in tetrahedra {
        mesh.add_tetrahedron(a, b, c, d);
    }
    mesh.setup()?;
    Ok(mesh)
}

/// Outward faces of a positively oriented tetrahedron.
fn outward_faces([p0, p1, p2, p3]: [u32; 4]) -> [[u32; 3]; 4] {
    [[p0, p2, p1], [p0, p1, p3], [p1, p2, p3], [p0, p3, p2]]
}

/// Faces that belong to exactly one tetrahedron, wound outward.
fn boundary_faces(tetrahedra: &[[u32; 4]]) -> Vec<[u32; 3]> {
    let mut count: HashMap<[u32; 3], ([u32; 3], u32)> = HashMap::new();
    let mut order = Vec::new();
    for tet in tetrahedra {
        for face in outward_faces(*tet) {
            let mut key = face;
            key.sort_unstable();
            let entry = count.entry(key).or_insert_with(|| {
                order.push(key);
                (face, 0)
            });
            entry.1 += 1;
        }
    }
    order
        .into_iter()
        .filter_map(|key| match count.get(&key) {
            Some(&(face, 1)) => Some(face),
            _ => None,
        })
        .collect()
}
