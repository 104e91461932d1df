//! Scene files: a world config plus the bodies to populate it with.
//!
//! ```toml
//! ground = 0.0
//!
//! [world]
//! tick = 0.02
//!
//! [[body]]
//! kind = "tetrahedron"
//! edge_length = 1.0
//! position = [0.0, 2.0, 0.0]
//!
//! [[body]]
//! kind = "mesh"
//! path = "jelly.json"
//! ```

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_contact::BoundingPlane;
use partix_mesh::generators::{box_block, regular_tetrahedron};
use partix_mesh::TetrahedralMesh;
use partix_types::{BodyId, PartixError, PartixResult};
use partix_world::{World, WorldConfig};

fn unit_mass() -> f32 {
    1.0
}

/// One volume to add to the world, moved by `position` after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodySpec {
    Tetrahedron {
        edge_length: f32,
        #[serde(default = "unit_mass")]
        point_mass: f32,
        #[serde(default)]
        position: Vec3,
    },
    Block {
        cells: [usize; 3],
        cell_size: f32,
        #[serde(default = "unit_mass")]
        point_mass: f32,
        #[serde(default)]
        position: Vec3,
    },
    /// A [`MeshFile`], relative to the scene file.
    Mesh {
        path: PathBuf,
        #[serde(default)]
        position: Vec3,
    },
}

/// Top-level scene description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub world: WorldConfig,
    /// Height of a ground plane, if any.
    pub ground: Option<f32>,
    /// Half extent of a closed room around the origin, if any.
    pub room: Option<f32>,
    #[serde(rename = "body")]
    pub bodies: Vec<BodySpec>,
}

impl SceneFile {
    pub fn load(path: &Path) -> PartixResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| PartixError::Serialization(e.to_string()))
    }

    /// Builds the world. Mesh paths resolve against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> PartixResult<World> {
        let mut world = World::new(self.world.clone())?;
        if let Some(height) = self.ground {
            world.add_plane(BoundingPlane::ground(height));
        }
        if let Some(half_extent) = self.room {
            world.add_room(half_extent)?;
        }

        for spec in &self.bodies {
            let (mesh, position) = match spec {
                BodySpec::Tetrahedron {
                    edge_length,
                    point_mass,
                    position,
                } => (regular_tetrahedron(*edge_length, *point_mass)?, *position),
                BodySpec::Block {
                    cells: [nx, ny, nz],
                    cell_size,
                    point_mass,
                    position,
                } => (box_block(*nx, *ny, *nz, *cell_size, *point_mass)?, *position),
                BodySpec::Mesh { path, position } => {
                    (MeshFile::load(&base_dir.join(path))?.into_mesh()?, *position)
                }
            };
            let id = world.add_mesh(mesh)?;
            place(&mut world, id, position);
        }
        Ok(world)
    }
}

fn place(world: &mut World, id: BodyId, position: Vec3) {
    if position != Vec3::ZERO {
        if let Some(v) = world.volume_mut(id) {
            v.teleport(position);
        }
    }
}

/// A point of a [`MeshFile`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    pub position: Vec3,
    /// Zero pins the point.
    #[serde(default = "unit_mass")]
    pub mass: f32,
}

/// Raw tetrahedral mesh in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshFile {
    pub points: Vec<MeshPoint>,
    #[serde(default)]
    pub faces: Vec<[u32; 3]>,
    pub tetrahedra: Vec<[u32; 4]>,
}

impl MeshFile {
    pub fn load(path: &Path) -> PartixResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| PartixError::Serialization(e.to_string()))
    }

    /// Builds and sets up the mesh.
    pub fn into_mesh(self) -> PartixResult<TetrahedralMesh> {
        let mut mesh = TetrahedralMesh::new();
        for p in &self.points {
            mesh.add_point(p.position, p.mass);
        }
        for [a, b, c] in self.faces {
            mesh.add_face(a, b, c);
        }
        for [a, b, c, d] in self.tetrahedra {
            mesh.add_tetrahedron(a, b, c, d);
        }
        mesh.setup()?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
        ground = 0.0

        [world]
        tick = 0.01

        [[body]]
        kind = "tetrahedron"
        edge_length = 1.0
        position = [0.0, 2.0, 0.0]

        [[body]]
        kind = "block"
        cells = [2, 1, 1]
        cell_size = 0.5
        point_mass = 0.2
    "#;

    #[test]
    fn scene_builds_world() {
        let scene: SceneFile = toml::from_str(SCENE).unwrap();
        assert_eq!(scene.world.tick, 0.01);
        assert_eq!(scene.bodies.len(), 2);

        let world = scene.build(Path::new(".")).unwrap();
        assert_eq!(world.bodies().len(), 3);
        let tet = world.volume(BodyId(1)).unwrap();
        assert!(tet.center_of_mass().y > 1.9);
        assert_eq!(world.volume(BodyId(2)).unwrap().points().len(), 12);
    }

    #[test]
    fn unknown_body_kind_rejected() {
        let text = "[[body]]\nkind = \"sphere\"\nradius = 1.0\n";
        assert!(toml::from_str::<SceneFile>(text).is_err());
    }

    #[test]
    fn mesh_file_sets_up() {
        let json = r#"{
            "points": [
                {"position": [0, 0, 0]},
                {"position": [1, 0, 0]},
                {"position": [0, 1, 0]},
                {"position": [0, 0, 1], "mass": 0.0}
            ],
            "tetrahedra": [[0, 1, 2, 3]]
        }"#;
        let file: MeshFile = serde_json::from_str(json).unwrap();
        let mesh = file.clone().into_mesh().unwrap();
        assert!(mesh.is_set_up());
        assert!(mesh.points()[3].is_pinned());

        let mut bad = file;
        bad.tetrahedra.push([0, 1, 2, 9]);
        assert!(bad.into_mesh().is_err());
    }
}
